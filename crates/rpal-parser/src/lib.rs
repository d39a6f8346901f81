pub mod error;
pub mod grammar;

pub use error::ParseError;
use grammar::Parser;

/// Parses RPAL source into the dotted-indent AST listing (§6) that
/// [`rpal_tree::parse_listing`] reconstructs into a [`rpal_tree::Tree`].
///
/// Kept as a text round-trip rather than handing back a tree object
/// directly, mirroring the reference implementation: its driver converts its
/// own parser's AST to this same textual listing and rebuilds the tree
/// object graph from that text before standardizing (§4.2).
pub fn parse(source: &str) -> Result<String, ParseError> {
    let mut parser = Parser::new(source)?;
    let listing = parser.parse_program()?;
    let mut text = String::new();
    for line in listing {
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_let() {
        let listing = parse("let x = 5 in x + 3").unwrap();
        assert!(listing.starts_with("let\n"));
        assert!(listing.contains(".=\n"));
        assert!(listing.contains("..<IDENTIFIER:x>\n"));
        assert!(listing.contains("..<INTEGER:5>\n"));
        assert!(listing.contains(".+\n"));
    }

    #[test]
    fn parses_conditional_and_function_form() {
        let listing =
            parse("let rec F n = n eq 0 -> 1 | n * F(n-1) in F 5").unwrap();
        assert!(listing.contains("rec\n"));
        assert!(listing.contains("function_form\n"));
        assert!(listing.contains("->\n"));
        assert!(listing.contains("eq\n"));
    }

    #[test]
    fn parses_where_clause() {
        let listing = parse(
            "let Sum(A) = Psum(A, Order A) where rec Psum(T,N) = N eq 0 -> 0 | Psum(T,N-1) + T N in Print(Sum(1,2,3,4,5))",
        )
        .unwrap();
        assert!(listing.contains("where\n"));
        assert!(listing.contains("tau\n"));
    }

    #[test]
    fn parses_string_literal_and_aug() {
        let listing = parse("Print ( (1,2,3) aug 4 )").unwrap();
        assert!(listing.contains("aug\n"));
        assert!(listing.contains("tau\n"));
    }

    #[test]
    fn parses_tuple_and_true_literal() {
        let listing = parse("let t = (1, 'two', true) in Order t").unwrap();
        assert!(listing.contains("<STRING:'two'>\n"));
        assert!(listing.contains("<TRUE_VALUE:true>\n"));
    }

    #[test]
    fn parses_lambda_with_multiple_params() {
        let listing = parse("fn a b . a + b").unwrap();
        assert!(listing.starts_with("lambda\n"));
        assert!(listing.contains("..<IDENTIFIER:a>\n"));
        assert!(listing.contains("..<IDENTIFIER:b>\n"));
    }

    #[test]
    fn reports_unexpected_token() {
        let err = parse("let x = in x").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn round_trips_through_tree_builder() {
        let listing = parse("let x = 5 in x + 3").unwrap();
        let tree = rpal_tree::parse_listing(&listing).unwrap();
        let rendered = rpal_tree::render_listing(&tree);
        assert_eq!(listing, rendered);
    }
}
