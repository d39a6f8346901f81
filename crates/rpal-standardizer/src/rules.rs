use rpal_tree::{NodeId, Tree};

use crate::error::StandardizeError;

fn malformed(tag: &str, expected: &str, found: usize) -> StandardizeError {
    StandardizeError::MalformedTree {
        tag: tag.to_string(),
        expected: expected.to_string(),
        found,
    }
}

/// Builds a right-nested chain of `lambda` nodes binding `params` in order
/// around `body`: `lambda(params[0], lambda(params[1], ... body))`.
///
/// `params` must be non-empty; this is the shared tail of the
/// `function_form` and multi-parameter `lambda` rules (§4.1).
fn nest_lambdas(tree: &mut Tree, params: &[NodeId], body: NodeId) -> NodeId {
    let mut acc = body;
    for &param in params.iter().rev() {
        acc = tree.new_internal("lambda", vec![param, acc]);
    }
    acc
}

/// Applies the one rewrite rule matching `id`'s current tag, in place.
/// Nodes whose tag is already canonical (including a `lambda`/`=` produced
/// by an earlier rule) are left untouched — this is what makes repeated
/// application idempotent.
pub fn apply(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    match tree.tag(id) {
        "let" => rewrite_let(tree, id),
        "where" => rewrite_where(tree, id),
        "function_form" => rewrite_function_form(tree, id),
        "lambda" => rewrite_lambda(tree, id),
        "within" => rewrite_within(tree, id),
        "@" => rewrite_at(tree, id),
        "and" => rewrite_and(tree, id),
        "rec" => rewrite_rec(tree, id),
        _ => Ok(()),
    }
}

/// `let(=(X, E), P)` -> `gamma(lambda(X, P), E)`
fn rewrite_let(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    if tree.child_count(id) != 2 {
        return Err(malformed("let", "2", tree.child_count(id)));
    }
    let eq = tree.nth_child(id, 0);
    let p = tree.nth_child(id, 1);
    if tree.tag(eq) != "=" || tree.child_count(eq) != 2 {
        return Err(malformed("let.=", "2", tree.child_count(eq)));
    }
    let x = tree.nth_child(eq, 0);
    let e = tree.nth_child(eq, 1);

    let lambda = tree.new_internal("lambda", vec![x, p]);
    tree.set_tag(id, "gamma");
    tree.set_children(id, vec![lambda, e]);
    Ok(())
}

/// `where(P, =(X, E))` -> standardized as `let(=(X,E), P)`.
fn rewrite_where(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    if tree.child_count(id) != 2 {
        return Err(malformed("where", "2", tree.child_count(id)));
    }
    let p = tree.nth_child(id, 0);
    let eq = tree.nth_child(id, 1);
    tree.set_tag(id, "let");
    tree.set_children(id, vec![eq, p]);
    rewrite_let(tree, id)
}

/// `function_form(F, V1..Vn, E)` (n>=1) -> `=(F, lambda(V1, lambda(V2, ... lambda(Vn, E)...)))`
fn rewrite_function_form(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    let count = tree.child_count(id);
    if count < 3 {
        return Err(malformed("function_form", ">= 3", count));
    }
    let children = tree.children(id).to_vec();
    let f = children[0];
    let params = &children[1..children.len() - 1];
    let e = children[children.len() - 1];

    let nested = nest_lambdas(tree, params, e);
    tree.set_tag(id, "=");
    tree.set_children(id, vec![f, nested]);
    Ok(())
}

/// `lambda(V1..Vn, E)` with n>1 -> `lambda(V1, lambda(V2, ... lambda(Vn, E)...))`
fn rewrite_lambda(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    let count = tree.child_count(id);
    if count < 2 {
        return Err(malformed("lambda", ">= 2", count));
    }
    if count == 2 {
        // Already a single-parameter lambda; canonical as-is.
        return Ok(());
    }
    let children = tree.children(id).to_vec();
    let params = &children[..children.len() - 1];
    let e = children[children.len() - 1];
    let nested = nest_lambdas(tree, params, e);

    // `nested`'s root reuses a fresh id distinct from `id`; splice its shape
    // (tag + children) onto `id` itself so callers holding `id` still see
    // the rewritten lambda chain.
    let nested_children = tree.children(nested).to_vec();
    tree.set_children(id, nested_children);
    Ok(())
}

/// `within(=(X1,E1), =(X2,E2))` -> `=(X2, gamma(lambda(X1, E2), E1))`
fn rewrite_within(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    if tree.child_count(id) != 2 {
        return Err(malformed("within", "2", tree.child_count(id)));
    }
    let eq1 = tree.nth_child(id, 0);
    let eq2 = tree.nth_child(id, 1);
    if tree.tag(eq1) != "=" || tree.child_count(eq1) != 2 {
        return Err(malformed("within.=1", "2", tree.child_count(eq1)));
    }
    if tree.tag(eq2) != "=" || tree.child_count(eq2) != 2 {
        return Err(malformed("within.=2", "2", tree.child_count(eq2)));
    }
    let x1 = tree.nth_child(eq1, 0);
    let e1 = tree.nth_child(eq1, 1);
    let x2 = tree.nth_child(eq2, 0);
    let e2 = tree.nth_child(eq2, 1);

    let lambda = tree.new_internal("lambda", vec![x1, e2]);
    let gamma = tree.new_internal("gamma", vec![lambda, e1]);
    tree.set_tag(id, "=");
    tree.set_children(id, vec![x2, gamma]);
    Ok(())
}

/// `@(E1, N, E2)` -> `gamma(gamma(N, E1), E2)`
fn rewrite_at(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    if tree.child_count(id) != 3 {
        return Err(malformed("@", "3", tree.child_count(id)));
    }
    let e1 = tree.nth_child(id, 0);
    let n = tree.nth_child(id, 1);
    let e2 = tree.nth_child(id, 2);

    let inner = tree.new_internal("gamma", vec![n, e1]);
    tree.set_tag(id, "gamma");
    tree.set_children(id, vec![inner, e2]);
    Ok(())
}

/// `and(=(X1,E1), ..., =(Xn,En))` -> `=( ,(X1,...,Xn), tau(E1,...,En))`
fn rewrite_and(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    let count = tree.child_count(id);
    if count < 1 {
        return Err(malformed("and", ">= 1", count));
    }
    let children = tree.children(id).to_vec();
    let mut xs = Vec::with_capacity(children.len());
    let mut es = Vec::with_capacity(children.len());
    for &eq in &children {
        if tree.tag(eq) != "=" || tree.child_count(eq) != 2 {
            return Err(malformed("and.=", "2", tree.child_count(eq)));
        }
        xs.push(tree.nth_child(eq, 0));
        es.push(tree.nth_child(eq, 1));
    }

    let comma = tree.new_internal(",", xs);
    let tau = tree.new_internal("tau", es);
    tree.set_tag(id, "=");
    tree.set_children(id, vec![comma, tau]);
    Ok(())
}

/// `rec(=(X, E))` -> `=(X, gamma(<Y*>, lambda(X, E)))`
fn rewrite_rec(tree: &mut Tree, id: NodeId) -> Result<(), StandardizeError> {
    if tree.child_count(id) != 1 {
        return Err(malformed("rec", "1", tree.child_count(id)));
    }
    let eq = tree.nth_child(id, 0);
    if tree.tag(eq) != "=" || tree.child_count(eq) != 2 {
        return Err(malformed("rec.=", "2", tree.child_count(eq)));
    }
    let x = tree.nth_child(eq, 0);
    let e = tree.nth_child(eq, 1);

    let ystar = tree.new_leaf("<Y*>", None);
    let lambda = tree.new_internal("lambda", vec![x, e]);
    let gamma = tree.new_internal("gamma", vec![ystar, lambda]);
    tree.set_tag(id, "=");
    tree.set_children(id, vec![x, gamma]);
    Ok(())
}
