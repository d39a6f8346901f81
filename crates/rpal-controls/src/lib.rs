pub mod error;

pub use error::ControlError;

use rpal_tree::{NodeId, Tree};
use rpal_values::{BinaryOp, ControlSymbol, Literal, UnaryOp, Value};

/// One numbered control segment (δ), the unit the CSE machine's `Delta`
/// symbol refers to (§4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub symbols: Vec<ControlSymbol>,
}

/// The flattened form of a standardized tree: every control segment the
/// program's lambdas and conditionals needed, segment 0 being the program
/// body itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlProgram {
    pub segments: Vec<Segment>,
}

impl ControlProgram {
    pub fn segment(&self, index: usize) -> &[ControlSymbol] {
        &self.segments[index].symbols
    }

    /// The control stream a fresh CSE machine starts with (§4.3).
    pub fn initial_control(&self) -> Vec<ControlSymbol> {
        vec![ControlSymbol::EnvMarker(0), ControlSymbol::Delta(0)]
    }

    /// The value stack a fresh CSE machine starts with (§4.3).
    pub fn initial_value_stack(&self) -> Vec<Value> {
        vec![Value::EnvMarker(0)]
    }
}

/// Builds the control program for a standardized tree rooted at `root`
/// (§4.3).
pub fn build(tree: &Tree, root: NodeId) -> Result<ControlProgram, ControlError> {
    let mut segments = Vec::new();
    build_segment(tree, root, &mut segments)?;
    Ok(ControlProgram { segments })
}

/// Reserves a fresh segment slot, flattens `node` into it, and returns the
/// slot's index. The slot is reserved before recursion so nested `Delta`
/// references (lambda bodies, conditional branches) know their target index
/// up front even though the target segment isn't filled until the recursive
/// call below returns.
fn build_segment(
    tree: &Tree,
    node: NodeId,
    segments: &mut Vec<Segment>,
) -> Result<usize, ControlError> {
    let index = segments.len();
    segments.push(Segment {
        index,
        symbols: Vec::new(),
    });
    let mut symbols = Vec::new();
    flatten(tree, node, &mut symbols, segments)?;
    segments[index].symbols = symbols;
    Ok(index)
}

fn flatten(
    tree: &Tree,
    node: NodeId,
    out: &mut Vec<ControlSymbol>,
    segments: &mut Vec<Segment>,
) -> Result<(), ControlError> {
    let tag = tree.tag(node);
    match tag {
        "lambda" => {
            if tree.child_count(node) != 2 {
                return Err(ControlError::MalformedTree {
                    tag: "lambda".to_string(),
                    expected: "2".to_string(),
                    found: tree.child_count(node),
                });
            }
            let param_node = tree.nth_child(node, 0);
            let body = tree.nth_child(node, 1);
            let parameters = extract_parameters(tree, param_node)?;
            let body_index = build_segment(tree, body, segments)?;
            out.push(ControlSymbol::Lambda {
                control_index: body_index,
                parameters,
            });
        }
        "->" => {
            if tree.child_count(node) != 3 {
                return Err(ControlError::MalformedTree {
                    tag: "->".to_string(),
                    expected: "3".to_string(),
                    found: tree.child_count(node),
                });
            }
            let cond = tree.nth_child(node, 0);
            let then_branch = tree.nth_child(node, 1);
            let else_branch = tree.nth_child(node, 2);

            let then_index = build_segment(tree, then_branch, segments)?;
            let else_index = build_segment(tree, else_branch, segments)?;
            let mut cond_symbols = Vec::new();
            flatten(tree, cond, &mut cond_symbols, segments)?;

            out.push(ControlSymbol::Delta(then_index));
            out.push(ControlSymbol::Delta(else_index));
            out.push(ControlSymbol::Beta);
            out.push(ControlSymbol::B(cond_symbols));
        }
        other => {
            out.push(leaf_symbol(tree, node, other)?);
            for &child in tree.children(node) {
                flatten(tree, child, out, segments)?;
            }
        }
    }
    Ok(())
}

/// Maps a non-`lambda`/`->` node's own tag to its control symbol. Does not
/// recurse into children — the caller does that, in pre-order, right after.
fn leaf_symbol(tree: &Tree, node: NodeId, tag: &str) -> Result<ControlSymbol, ControlError> {
    if let Some(op) = UnaryOp::from_tag(tag) {
        return Ok(ControlSymbol::Unary(op));
    }
    if let Some(op) = BinaryOp::from_tag(tag) {
        return Ok(ControlSymbol::Binary(op));
    }
    match tag {
        "gamma" => Ok(ControlSymbol::Gamma),
        "tau" => Ok(ControlSymbol::Tau(tree.child_count(node))),
        "<Y*>" => Ok(ControlSymbol::Ystar),
        "IDENTIFIER" => Ok(ControlSymbol::Identifier(
            tree.payload(node).unwrap_or_default().to_string(),
        )),
        "INTEGER" => {
            let payload = tree.payload(node).unwrap_or_default();
            let n: i64 = payload.parse().map_err(|_| ControlError::MalformedTree {
                tag: "INTEGER".to_string(),
                expected: "integer payload".to_string(),
                found: 0,
            })?;
            Ok(ControlSymbol::Literal(Literal::Int(n)))
        }
        "STRING" => Ok(ControlSymbol::Literal(Literal::Str(
            tree.payload(node).unwrap_or_default().to_string(),
        ))),
        "TRUE_VALUE" => {
            let payload = tree.payload(node).unwrap_or_default();
            Ok(ControlSymbol::Literal(Literal::Bool(payload == "true")))
        }
        "NIL" => Ok(ControlSymbol::Literal(Literal::Nil)),
        "dummy" => Ok(ControlSymbol::Literal(Literal::Dummy)),
        other => Err(ControlError::UnexpectedTag(other.to_string())),
    }
}

/// A standardized `lambda`'s parameter node is either a bare identifier (one
/// parameter) or a `,` node whose children are the parameter identifiers
/// (tuple-destructuring, e.g. `fn (a, b) . E`), per §4.3.
fn extract_parameters(tree: &Tree, param_node: NodeId) -> Result<Vec<String>, ControlError> {
    if tree.tag(param_node) == "," {
        tree.children(param_node)
            .iter()
            .map(|&id| identifier_name(tree, id))
            .collect()
    } else {
        Ok(vec![identifier_name(tree, param_node)?])
    }
}

fn identifier_name(tree: &Tree, id: NodeId) -> Result<String, ControlError> {
    if tree.tag(id) != "IDENTIFIER" {
        return Err(ControlError::UnexpectedTag(tree.tag(id).to_string()));
    }
    Ok(tree.payload(id).unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpal_tree::parse_listing;

    fn build_from_source(source: &str) -> ControlProgram {
        let listing = rpal_parser::parse(source).unwrap();
        let mut tree = parse_listing(&listing).unwrap();
        let root = rpal_standardizer::standardize(&mut tree).unwrap();
        build(&tree, root).unwrap()
    }

    #[test]
    fn simple_let_produces_gamma_and_lambda_segment() {
        let program = build_from_source("let x = 5 in x + 3");
        assert_eq!(program.segments.len(), 2);
        assert!(matches!(program.segment(0)[0], ControlSymbol::Gamma));
        assert!(matches!(
            program.segment(0)[1],
            ControlSymbol::Lambda { control_index: 1, .. }
        ));
        assert!(matches!(program.segment(1)[0], ControlSymbol::Binary(BinaryOp::Add)));
    }

    #[test]
    fn conditional_emits_two_deltas_then_beta_then_b() {
        let program = build_from_source("(1 eq 1) -> 2 | 3");
        let symbols = program.segment(0);
        assert!(matches!(symbols[0], ControlSymbol::Delta(_)));
        assert!(matches!(symbols[1], ControlSymbol::Delta(_)));
        assert!(matches!(symbols[2], ControlSymbol::Beta));
        assert!(matches!(symbols[3], ControlSymbol::B(_)));
    }

    #[test]
    fn tuple_destructuring_parameter_list() {
        let program = build_from_source("fn (a, b) . a + b");
        let lambda = &program.segment(0)[0];
        match lambda {
            ControlSymbol::Lambda { parameters, .. } => {
                assert_eq!(parameters, &vec!["a".to_string(), "b".to_string()]);
            }
            _ => panic!("expected a Lambda symbol"),
        }
    }

    #[test]
    fn initial_control_and_value_stack() {
        let program = build_from_source("5");
        assert_eq!(
            program.initial_control(),
            vec![ControlSymbol::EnvMarker(0), ControlSymbol::Delta(0)]
        );
        assert_eq!(program.initial_value_stack(), vec![Value::EnvMarker(0)]);
    }
}
