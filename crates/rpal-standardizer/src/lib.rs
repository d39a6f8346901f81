pub mod error;
mod rules;

pub use error::StandardizeError;

use rpal_tree::{NodeId, Tree};

/// Standardizes `tree` in place, starting from its root, and returns the
/// (possibly retagged) root id.
///
/// Traversal is bottom-up post-order (§4.1): a node is rewritten only after
/// every one of its children has already been standardized, so a rule never
/// has to look through an un-canonicalized subtree.
pub fn standardize(tree: &mut Tree) -> Result<NodeId, StandardizeError> {
    let root = tree.root().expect("tree has no root");
    standardize_node(tree, root)?;
    Ok(root)
}

fn standardize_node(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    if tree.is_standardized(id) {
        return Ok(());
    }
    let children: Vec<NodeId> = tree.children(id).to_vec();
    for child in children {
        standardize_node(tree, child)?;
    }
    rules::apply(tree, id)?;
    tree.set_standardized(id, true);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpal_tree::{parse_listing, render_listing};

    fn standardized_listing(source: &str) -> String {
        let listing = rpal_parser::parse(source).unwrap();
        let mut tree = parse_listing(&listing).unwrap();
        standardize(&mut tree).unwrap();
        render_listing(&tree)
    }

    #[test]
    fn let_becomes_gamma_lambda() {
        let rendered = standardized_listing("let x = 5 in x + 3");
        assert!(rendered.starts_with("gamma\n"));
        assert!(rendered.contains(".lambda\n"));
        assert!(!rendered.contains("let\n"));
    }

    #[test]
    fn where_becomes_gamma_lambda() {
        let rendered = standardized_listing("Print(A) where A = 5");
        assert!(rendered.starts_with("gamma\n"));
        assert!(!rendered.contains("where\n"));
    }

    #[test]
    fn rec_introduces_ystar() {
        let rendered =
            standardized_listing("let rec F n = n eq 0 -> 1 | n * F(n-1) in F 5");
        assert!(rendered.contains("<Y*>\n"));
        assert!(!rendered.contains("rec\n"));
        assert!(!rendered.contains("function_form\n"));
    }

    #[test]
    fn multi_param_lambda_is_right_nested() {
        let rendered = standardized_listing("fn a b . a + b");
        // Outer lambda binds `a`; its second child is another lambda binding `b`.
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "lambda");
        assert_eq!(lines[1], ".<IDENTIFIER:a>");
        assert_eq!(lines[2], ".lambda");
        assert_eq!(lines[3], "..<IDENTIFIER:b>");
    }

    #[test]
    fn at_operator_becomes_nested_gamma() {
        let rendered = standardized_listing("Print ((1,2,3) @ Conc 'x')");
        assert!(rendered.contains("gamma\n"));
        assert!(!rendered.contains("@\n"));
    }

    #[test]
    fn is_idempotent() {
        let listing =
            rpal_parser::parse("let rec F n = n eq 0 -> 1 | n * F(n-1) in F 5").unwrap();
        let mut tree = parse_listing(&listing).unwrap();
        standardize(&mut tree).unwrap();
        let once = render_listing(&tree);
        standardize(&mut tree).unwrap();
        let twice = render_listing(&tree);
        assert_eq!(once, twice);
    }

    #[test]
    fn accepted_programs_standardize_without_error() {
        let programs = [
            "let x = 5 in x + 3",
            "let rec F n = n eq 0 -> 1 | n * F(n-1) in F 5",
            "let Sum(A) = Psum(A, Order A) where rec Psum(T,N) = N eq 0 -> 0 | Psum(T,N-1) + T N in Print(Sum(1,2,3,4,5))",
            "let rev s = s eq '' -> '' | Conc (rev (Stern s)) (Stem s) in Print (rev 'abc')",
            "let t = (1, 'two', true) in Print (Order t)",
            "Print ( (1,2,3) aug 4 )",
        ];
        for source in programs {
            let listing = rpal_parser::parse(source).unwrap();
            let mut tree = parse_listing(&listing).unwrap();
            standardize(&mut tree).unwrap();
        }
    }

    proptest::proptest! {
        /// Standardization is idempotent on any `let`-bound arithmetic expression
        /// built from a handful of integer literals and operators (§4.1, §8).
        #[test]
        fn let_expressions_standardize_idempotently(
            a in 0i64..1000,
            b in 0i64..1000,
            c in 0i64..1000,
        ) {
            let source = format!("let x = {a} in let y = {b} in x + y * {c}");
            let listing = rpal_parser::parse(&source).unwrap();
            let mut tree = parse_listing(&listing).unwrap();
            standardize(&mut tree).unwrap();
            let once = render_listing(&tree);
            standardize(&mut tree).unwrap();
            let twice = render_listing(&tree);
            proptest::prop_assert_eq!(once, twice);
        }
    }
}
