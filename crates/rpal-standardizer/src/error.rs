use thiserror::Error;

/// `StandardizeError` in §7's error taxonomy.
///
/// Each rewrite rule in §4.1 assumes a fixed child-count shape for the tag
/// it matches against; a violation can only arise from a parser or
/// tree-builder bug, never from user input the parser already accepted, so
/// this is treated as fatal rather than recoverable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StandardizeError {
    #[error("malformed tree: `{tag}` expected {expected} child(ren), found {found}")]
    MalformedTree {
        tag: String,
        expected: String,
        found: usize,
    },
}
