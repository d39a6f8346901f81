use std::fmt;

/// An index into a [`Tree`]'s arena.
///
/// Indices are never reused and never dangle: a `NodeId` is valid for the
/// lifetime of the `Tree` that produced it. This stands in for the
/// `Rc<RefCell<Weak<..>>>` parent/child wiring a non-arena tree would need,
/// per the "parent back-pointer" design note — there is nothing here to leak
/// or cycle.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

struct Node {
    tag: String,
    payload: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    depth: usize,
    standardized: bool,
}

/// An arena-backed syntax tree (AST or standardized tree, §3).
///
/// A `Tree` owns every node it has ever allocated; a node's "parent" field is
/// a plain index, so moving a subtree is just rewriting a few indices rather
/// than juggling reference counts.
#[derive(Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Allocates a fresh, detached leaf node (no parent, no children, depth 0).
    pub fn new_leaf(&mut self, tag: impl Into<String>, payload: Option<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.into(),
            payload,
            children: Vec::new(),
            parent: None,
            depth: 0,
            standardized: false,
        });
        id
    }

    /// Allocates a fresh internal node with the given children, in order.
    /// Each child's parent/depth is updated (recursively, through its own
    /// descendants) to reflect its new position.
    pub fn new_internal(&mut self, tag: impl Into<String>, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.into(),
            payload: None,
            children: Vec::new(),
            parent: None,
            depth: 0,
            standardized: false,
        });
        self.set_children(id, children);
        id
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.nodes[id.0].parent = None;
        self.nodes[id.0].depth = 0;
        self.fix_descendant_depths(id);
        self.root = Some(id);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    pub fn set_tag(&mut self, id: NodeId, tag: impl Into<String>) {
        self.nodes[id.0].tag = tag.into();
    }

    pub fn payload(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].payload.as_deref()
    }

    pub fn set_payload(&mut self, id: NodeId, payload: Option<String>) {
        self.nodes[id.0].payload = payload;
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    pub fn nth_child(&self, id: NodeId, n: usize) -> NodeId {
        self.nodes[id.0].children[n]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id.0].depth
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    pub fn is_standardized(&self, id: NodeId) -> bool {
        self.nodes[id.0].standardized
    }

    pub fn set_standardized(&mut self, id: NodeId, value: bool) {
        self.nodes[id.0].standardized = value;
    }

    /// Replaces `parent`'s child list wholesale. Every node in `children` has
    /// its parent pointer and depth (and, transitively, its own descendants'
    /// depths) rewritten to match its new position — this is the operation
    /// the standardizer's rewrite rules use to splice subtrees around.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        let parent_depth = self.nodes[parent.0].depth;
        for &child in &children {
            self.nodes[child.0].parent = Some(parent);
            self.nodes[child.0].depth = parent_depth + 1;
            self.fix_descendant_depths(child);
        }
        self.nodes[parent.0].children = children;
    }

    /// Appends a single child to `parent`'s existing child list.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let parent_depth = self.nodes[parent.0].depth;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].depth = parent_depth + 1;
        self.fix_descendant_depths(child);
        self.nodes[parent.0].children.push(child);
    }

    fn fix_descendant_depths(&mut self, id: NodeId) {
        let depth = self.nodes[id.0].depth;
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.nodes[child.0].depth = depth + 1;
            self.fix_descendant_depths(child);
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_internal_sets_depths() {
        let mut t = Tree::new();
        let a = t.new_leaf("IDENTIFIER", Some("x".into()));
        let b = t.new_leaf("INTEGER", Some("1".into()));
        let plus = t.new_internal("+", vec![a, b]);
        t.set_root(plus);

        assert_eq!(t.depth(plus), 0);
        assert_eq!(t.depth(a), 1);
        assert_eq!(t.depth(b), 1);
        assert_eq!(t.parent(a), Some(plus));
    }

    #[test]
    fn set_children_fixes_grandchild_depths() {
        let mut t = Tree::new();
        let leaf = t.new_leaf("IDENTIFIER", Some("x".into()));
        let inner = t.new_internal("tau", vec![leaf]);
        let outer = t.new_internal("gamma", vec![]);
        // Reparent `inner` under `outer` at a different depth than it was built at.
        t.set_children(outer, vec![inner]);

        assert_eq!(t.depth(outer), 0);
        assert_eq!(t.depth(inner), 1);
        assert_eq!(t.depth(leaf), 2);
    }

    #[test]
    fn append_child_updates_single_node() {
        let mut t = Tree::new();
        let root = t.new_internal("let", vec![]);
        t.set_root(root);
        let child = t.new_leaf("dummy", None);
        t.append_child(root, child);
        assert_eq!(t.children(root), &[child]);
        assert_eq!(t.depth(child), 1);
    }
}
