use thiserror::Error;

/// `RuntimeError` in §7's error taxonomy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("unbound identifier `{name}`")]
    UnboundIdentifier { name: String },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("tuple index {index} out of bounds for tuple of length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    #[error("arity mismatch: lambda expects {expected} parameter(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("unknown builtin `{name}`")]
    UnknownBuiltin { name: String },

    #[error("execution timed out")]
    Timeout,
}
