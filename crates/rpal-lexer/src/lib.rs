pub mod token;

use logos::Logos;
use thiserror::Error;
use token::{LexerExtras, Token};

/// A token paired with its source text and line number.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub text: String,
    pub line: usize,
}

/// Lex the input source, returning all meaningful tokens with line numbers.
///
/// Hidden tokens (newlines, comments) are consumed for line tracking
/// but not included in the output.
pub fn lex(source: &str) -> Result<Vec<SpannedToken>, Vec<LexError>> {
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while let Some(result) = lexer.next() {
        let line = lexer.extras.line;
        let text = lexer.slice().to_string();

        match result {
            Ok(tok) if tok.is_hidden() => continue,
            Ok(tok) => {
                tokens.push(SpannedToken { token: tok, text, line });
            }
            Err(_) => {
                errors.push(LexError::Unrecognized { line, text });
            }
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// A lexical error with location info (`LexicalError` in §7's error taxonomy).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("line {line}: unrecognized character: {text:?}")]
    Unrecognized { line: usize, text: String },

    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use token::Token;

    #[test]
    fn lexes_keywords_and_identifier() {
        let source = "let x = 5 in x + 3";
        let tokens = lex(source).expect("lexing should succeed");

        assert_eq!(tokens[0].token, Token::Let);
        assert_eq!(tokens[1].token, Token::Identifier);
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[2].token, Token::Equals);
        assert_eq!(tokens[3].token, Token::IntLit);
        assert_eq!(tokens[3].text, "5");
        assert_eq!(tokens[4].token, Token::In);
    }

    #[test]
    fn lexes_string_literal_with_escaped_quote() {
        let source = r"'it\'s'";
        let tokens = lex(source).expect("lexing should succeed");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, Token::StringLit);
        assert_eq!(tokens[0].text, r"'it\'s'");
    }

    #[test]
    fn line_comment_is_skipped() {
        let source = "// a comment\nlet x = 1 in x";
        let tokens = lex(source).expect("lexing should succeed");
        assert_eq!(tokens[0].token, Token::Let);
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn multi_char_operators_before_single_char() {
        let tokens = lex("2 ** 3 -> 1").expect("lexing should succeed");
        assert_eq!(tokens[1].token, Token::Power);
        assert_eq!(tokens[3].token, Token::Arrow);
    }

    #[test]
    fn unrecognized_character_is_reported() {
        let errors = lex("let x = 1 in x # y").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LexError::Unrecognized { .. }));
    }
}
