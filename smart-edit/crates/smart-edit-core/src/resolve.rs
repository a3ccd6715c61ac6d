//! Node resolution: which syntactic node a caret or selection means.
//!
//! Duplication uses [`find_matching_nodes`]; debug logging uses
//! [`find_smallest_node`] followed by [`find_expression_node`].
//! All intervals are closed, and the first matching child in document
//! order wins a tie.

use crate::syntax::{NodeKind, NodeRef, Role, SyntaxTree};

/// Nodes a duplicate command operates on.
///
/// For a caret (`start == end`) this is the deepest node containing the
/// caret, if any. For a selection it is every node fully inside the
/// selection, without descending into the nodes collected.
pub fn find_matching_nodes(tree: &SyntaxTree, start: usize, end: usize) -> Vec<NodeRef<'_>> {
    if start == end {
        return deepest_containing(tree.root(), start).into_iter().collect();
    }

    let mut matches = Vec::new();
    collect_within(tree.root(), start, end, &mut matches);
    matches
}

fn deepest_containing(node: NodeRef<'_>, offset: usize) -> Option<NodeRef<'_>> {
    let child = node.children().find(|c| c.contains(offset))?;
    Some(deepest_containing(child, offset).unwrap_or(child))
}

fn collect_within<'t>(node: NodeRef<'t>, start: usize, end: usize, out: &mut Vec<NodeRef<'t>>) {
    for child in node.children() {
        if child.within(start, end) {
            out.push(child);
        } else {
            collect_within(child, start, end, out);
        }
    }
}

/// Deepest node whose range covers the whole of `[start, end]`.
pub fn find_smallest_node(tree: &SyntaxTree, start: usize, end: usize) -> Option<NodeRef<'_>> {
    smallest_covering(tree.root(), start, end)
}

fn smallest_covering(node: NodeRef<'_>, start: usize, end: usize) -> Option<NodeRef<'_>> {
    let child = node.children().find(|c| c.covers(start, end))?;
    Some(smallest_covering(child, start, end).unwrap_or(child))
}

/// Widen `node` to the nearest loggable expression.
///
/// Returns `None` for loop and condition headers and for anything that
/// climbs to the root without finding an expression.
pub fn find_expression_node(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    let parent = node.parent()?;

    // `0` in `array[0]` means the element
    if node.kind() == NodeKind::Literal
        && parent.kind() == NodeKind::ElementAccess
        && node.role() == Role::Index
    {
        return Some(parent);
    }

    if node.is_expression() {
        // `field` in `object.field` means the whole access
        if parent.kind() == NodeKind::PropertyAccess && node.role() == Role::Property {
            return find_expression_node(parent);
        }

        // `delegate` in `delegate(...args)` means the call
        if matches!(
            parent.kind(),
            NodeKind::CallExpression | NodeKind::NewExpression
        ) && node.role() == Role::Callee
        {
            return Some(parent);
        }

        return Some(node);
    }

    if node.is_parameter() {
        return Some(node.child(Role::Name).unwrap_or(node));
    }

    match node.kind() {
        NodeKind::VariableDeclaration => return node.child(Role::Name),
        NodeKind::VariableStatement => {
            return node
                .child(Role::Declarator)
                .and_then(|declaration| declaration.child(Role::Name));
        }
        NodeKind::ReturnStatement => return node.child(Role::Operand),
        NodeKind::ExpressionStatement => return Some(node),
        _ => {}
    }

    if node.is_statement() {
        tracing::trace!(kind = ?node.kind(), "statement is not loggable");
        return None;
    }

    find_expression_node(parent)
}
