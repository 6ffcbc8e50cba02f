use thiserror::Error;

/// Errors raised by the expression engine.
///
/// Every variant is a caller contract violation; nothing here is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A raw name used as a substitution term starts with the prefix
    /// reserved for shape/stride symbols. Those symbols must be created
    /// upstream as typed nodes and passed as expressions.
    #[error("symbol name '{name}' is reserved for shape/stride symbols; pass the symbol itself")]
    ReservedSymbolName { name: String },
    /// A raw name used as a substitution term is empty.
    #[error("cannot promote an empty name to a symbol")]
    EmptySymbolName,
    /// `dot` received sequences of different lengths.
    #[error("dot product of sequences with different lengths ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
}

/// Errors raised by the integer helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("next_power_of_2 supports inputs up to 2^32, got {value}")]
    PowerOfTwoOutOfRange { value: u64 },
}
