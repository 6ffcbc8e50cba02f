//! Integer helpers used when sizing kernel launches and tiles.

use crate::error::MathError;

const POWER_OF_TWO_LIMIT: u64 = 1 << 32;

/// Ceiling division with floor-division semantics for negative operands:
/// `ceildiv(n, d) == -(n.floor_div(-d))`.
///
/// Panics when `denom` is zero, like `/`.
pub fn ceildiv(numer: i64, denom: i64) -> i64 {
    let q = numer / denom;
    let r = numer % denom;
    if r != 0 && ((r > 0) == (denom > 0)) {
        q + 1
    } else {
        q
    }
}

/// Smallest power of two greater than or equal to `n`. Zero maps to zero.
pub fn next_power_of_2(n: u64) -> Result<u64, MathError> {
    if n > POWER_OF_TWO_LIMIT {
        return Err(MathError::PowerOfTwoOutOfRange { value: n });
    }
    if n == 0 {
        return Ok(0);
    }
    Ok(n.next_power_of_two())
}

/// Indices that put `seq` in ascending order.
///
/// Ties come out in reverse order of appearance: strides that compare equal
/// keep the innermost dimension last.
pub fn argsort<T: Ord>(seq: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..seq.len()).collect();
    // Stable descending sort, then reverse.
    order.sort_by(|&a, &b| seq[b].cmp(&seq[a]));
    order.reverse();
    order
}
