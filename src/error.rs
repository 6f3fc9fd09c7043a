use thiserror::Error;

/// Everything that can go wrong across both representations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid decimal integer {0:?}")]
    Parse(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("square root of a negative value")]
    SqrtOfNegative,

    /// Decimal-string subtraction with a minuend smaller than the
    /// subtrahend. Internal: the signed dispatch layer orders operands
    /// before magnitudes ever reach the string kernel.
    #[error("decimal subtraction would be negative")]
    Underflow,

    #[error("value exceeds the range of the target integer type")]
    Overflow,

    #[error("coefficient index {0} exceeds the addressable range")]
    IndexOutOfRange(u64),

    #[error("coefficient {value} exceeds its base at index {index}")]
    CoefficientTooLarge { index: u64, value: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
