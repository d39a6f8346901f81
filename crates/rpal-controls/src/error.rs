use thiserror::Error;

/// `ControlError` in §7's error taxonomy.
///
/// A standardized tree (§4.1) only ever contains the canonical vocabulary the
/// factory knows how to flatten; seeing anything else means standardization
/// was skipped or incomplete, not a user-facing condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("unexpected node `{0}` in standardized tree")]
    UnexpectedTag(String),

    #[error("malformed `{tag}`: expected {expected} child(ren), found {found}")]
    MalformedTree {
        tag: String,
        expected: String,
        found: usize,
    },
}
