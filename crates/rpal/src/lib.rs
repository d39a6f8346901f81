//! Wires the RPAL pipeline end to end: lex/parse → tree listing → tree →
//! standardize → control structures → CSE machine execution.

use std::time::Duration;

use thiserror::Error;

use rpal_controls::ControlProgram;
use rpal_parser::ParseError;
use rpal_standardizer::StandardizeError;
use rpal_tree::{parse_listing, render_listing, Tree, TreeError};
pub use rpal_values::Value;
pub use rpal_vm::printer;
pub use rpal_vm::RuntimeError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Standardize(#[from] StandardizeError),
    #[error(transparent)]
    Control(#[from] rpal_controls::ControlError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// The `-ast` listing: the parser's tree, dotted-indent rendered, before
/// standardization.
pub fn ast_listing(source: &str) -> Result<String, PipelineError> {
    let listing = rpal_parser::parse(source)?;
    let tree = parse_listing(&listing)?;
    Ok(render_listing(&tree))
}

/// The `-sast` listing: the same tree after standardization (§4.1).
pub fn sast_listing(source: &str) -> Result<String, PipelineError> {
    let mut tree = build_tree(source)?;
    rpal_standardizer::standardize(&mut tree)?;
    Ok(render_listing(&tree))
}

/// Runs `source` to its final value, subject to `timeout` wall-clock time
/// (§4.4, §6).
pub fn run(source: &str, timeout: Duration) -> Result<Value, PipelineError> {
    let mut tree = build_tree(source)?;
    let root = rpal_standardizer::standardize(&mut tree)?;
    let program: ControlProgram = rpal_controls::build(&tree, root)?;
    Ok(rpal_vm::execute(&program, timeout)?)
}

fn build_tree(source: &str) -> Result<Tree, PipelineError> {
    let listing = rpal_parser::parse(source)?;
    Ok(parse_listing(&listing)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_a_let_expression() {
        assert_eq!(run("let x = 1 in x + 1", Duration::from_secs(1)).unwrap(), Value::Int(2));
    }

    #[test]
    fn ast_listing_contains_the_let_tag() {
        let listing = ast_listing("let x = 1 in x").unwrap();
        assert!(listing.contains("let"));
    }

    #[test]
    fn sast_listing_no_longer_contains_let() {
        let listing = sast_listing("let x = 1 in x").unwrap();
        assert!(!listing.contains("let"));
    }
}
