use crate::error::TreeError;
use crate::tree::{NodeId, Tree};

/// Leaf tags whose listing form carries an inline payload, `<TAG:payload>`.
/// `STRING` also carries a payload but is handled separately since its
/// payload is additionally single-quote-wrapped (`<STRING:'hello'>`).
const PAYLOAD_LEAVES: &[&str] = &["IDENTIFIER", "INTEGER", "TRUE_VALUE"];

/// Renders one node's own label (not its subtree) the way it appears on a
/// listing line, per §6 "Tree listing format".
fn render_label(tree: &Tree, id: NodeId) -> String {
    let tag = tree.tag(id);
    if let Some(payload) = tree.payload(id) {
        if tag == "STRING" {
            return format!("<STRING:'{payload}'>");
        }
        if PAYLOAD_LEAVES.contains(&tag) {
            return format!("<{tag}:{payload}>");
        }
    }
    match tag {
        "NIL" => "<NIL>".to_string(),
        "dummy" => "<dummy>".to_string(),
        other => other.to_string(),
    }
}

/// Renders the whole tree as the dotted-indent listing described in §6 and
/// §4.2: one node per line, leading dots equal to depth, pre-order.
pub fn render_listing(tree: &Tree) -> String {
    let mut out = String::new();
    if let Some(root) = tree.root() {
        render_node(tree, root, &mut out);
    }
    out
}

fn render_node(tree: &Tree, id: NodeId, out: &mut String) {
    for _ in 0..tree.depth(id) {
        out.push('.');
    }
    out.push_str(&render_label(tree, id));
    out.push('\n');
    for &child in tree.children(id) {
        render_node(tree, child, out);
    }
}

/// Parses one listing line's label (with the leading dots already stripped)
/// into `(tag, payload)`.
fn parse_label(label: &str) -> (String, Option<String>) {
    if let Some(rest) = label.strip_prefix("<STRING:") {
        if let Some(quoted) = rest.strip_suffix('>') {
            let content = quoted.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')).unwrap_or(quoted);
            return ("STRING".to_string(), Some(content.to_string()));
        }
    }
    for leaf in PAYLOAD_LEAVES {
        let prefix = format!("<{leaf}:");
        if let Some(rest) = label.strip_prefix(&prefix) {
            if let Some(payload) = rest.strip_suffix('>') {
                return (leaf.to_string(), Some(payload.to_string()));
            }
        }
    }
    if label == "<NIL>" {
        return ("NIL".to_string(), None);
    }
    if label == "<dummy>" {
        return ("dummy".to_string(), None);
    }
    (label.to_string(), None)
}

/// Reconstructs a [`Tree`] from its dotted-indent listing (§4.2).
///
/// Maintains the most recently created node and its depth; a line whose
/// depth is greater than the previous one becomes a child of the previous
/// node, otherwise the algorithm walks up parent pointers until it finds a
/// node at `depth - 1` to attach under.
pub fn parse_listing(text: &str) -> Result<Tree, TreeError> {
    let mut tree = Tree::new();
    let mut prev: Option<(NodeId, usize)> = None;

    for (line_no, raw_line) in text.lines().enumerate() {
        if raw_line.trim().is_empty() {
            continue;
        }
        let depth = raw_line.chars().take_while(|&c| c == '.').count();
        let label = &raw_line[depth..];
        let (tag, payload) = parse_label(label);
        let id = tree.new_leaf(tag, payload);

        match prev {
            None => {
                if depth != 0 {
                    return Err(TreeError::MalformedListing {
                        line: line_no + 1,
                        reason: "root line must have depth 0".to_string(),
                    });
                }
                tree.set_root(id);
            }
            Some((prev_id, prev_depth)) => {
                if depth > prev_depth {
                    if depth != prev_depth + 1 {
                        return Err(TreeError::MalformedListing {
                            line: line_no + 1,
                            reason: format!(
                                "depth jumped from {prev_depth} to {depth}, expected at most {}",
                                prev_depth + 1
                            ),
                        });
                    }
                    tree.append_child(prev_id, id);
                } else {
                    let mut ancestor = prev_id;
                    loop {
                        match tree.parent(ancestor) {
                            Some(p) => {
                                ancestor = p;
                                if tree.depth(ancestor) == depth.saturating_sub(1) {
                                    break;
                                }
                            }
                            None => {
                                return Err(TreeError::MalformedListing {
                                    line: line_no + 1,
                                    reason: "no ancestor at the required depth".to_string(),
                                });
                            }
                        }
                    }
                    tree.append_child(ancestor, id);
                }
            }
        }
        prev = Some((id, depth));
    }

    if tree.root().is_none() {
        return Err(TreeError::EmptyListing);
    }
    Ok(tree)
}
