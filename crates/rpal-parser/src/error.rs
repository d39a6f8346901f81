use rpal_lexer::LexError;
use thiserror::Error;

/// `ParseError` in §7's error taxonomy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("lexical error: {0:?}")]
    Lex(Vec<LexError>),

    #[error("line {line}: unexpected {found}, expected {expected}")]
    UnexpectedToken {
        line: usize,
        found: String,
        expected: String,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
}
