use thiserror::Error;

/// Errors raised while building or validating a [`crate::Tree`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("malformed tree listing at line {line}: {reason}")]
    MalformedListing { line: usize, reason: String },

    #[error("empty listing")]
    EmptyListing,
}
