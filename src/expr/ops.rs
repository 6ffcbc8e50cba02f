use super::Expr;
use crate::error::ExprError;

/// Product of `factors`, with nested products flattened and integer
/// factors folded into one leading coefficient.
///
/// An empty product is `1`; a zero coefficient collapses the result to `0`.
pub fn product(factors: impl IntoIterator<Item = Expr>) -> Expr {
    let mut coeff: i64 = 1;
    let mut rest = Vec::new();
    for factor in factors {
        flatten_into(factor, &mut rest, &mut coeff, Fold::Mul);
    }
    if coeff == 0 {
        return Expr::Integer(0);
    }
    if coeff != 1 || rest.is_empty() {
        rest.insert(0, Expr::Integer(coeff));
    }
    Expr::mul(rest)
}

/// Sum of `terms`, with nested sums flattened and integer terms folded into
/// one trailing constant.
///
/// An empty sum is `0`.
pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Expr {
    let mut constant: i64 = 0;
    let mut rest = Vec::new();
    for term in terms {
        flatten_into(term, &mut rest, &mut constant, Fold::Add);
    }
    if constant != 0 || rest.is_empty() {
        rest.push(Expr::Integer(constant));
    }
    Expr::add(rest)
}

/// `sum(a[i] * b[i])`. Products are built with [`product`]; nothing is
/// expanded.
pub fn dot(lhs: &[Expr], rhs: &[Expr]) -> Result<Expr, ExprError> {
    if lhs.len() != rhs.len() {
        return Err(ExprError::LengthMismatch {
            left: lhs.len(),
            right: rhs.len(),
        });
    }
    Ok(sum(lhs
        .iter()
        .zip(rhs)
        .map(|(a, b)| product([a.clone(), b.clone()]))))
}

#[derive(Clone, Copy)]
enum Fold {
    Add,
    Mul,
}

fn flatten_into(expr: Expr, rest: &mut Vec<Expr>, acc: &mut i64, fold: Fold) {
    match (fold, expr) {
        (Fold::Add, Expr::Add(terms)) | (Fold::Mul, Expr::Mul(terms)) => {
            for term in terms {
                flatten_into(term, rest, acc, fold);
            }
        }
        (fold, Expr::Integer(v)) => {
            let folded = match fold {
                Fold::Add => acc.checked_add(v),
                Fold::Mul => acc.checked_mul(v),
            };
            match folded {
                Some(value) => *acc = value,
                // Keep overflowing constants as separate operands.
                None => rest.push(Expr::Integer(v)),
            }
        }
        (_, other) => rest.push(other),
    }
}
