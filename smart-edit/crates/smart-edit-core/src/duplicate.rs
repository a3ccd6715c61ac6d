//! Syntax-aware duplication.
//!
//! Clones a resolved node in place, adding whatever punctuation its role
//! needs: a comma for list elements, an operator for binary operands, a
//! `.` for property chains, an `else` for conditionals, a statement
//! delimiter for statements. Every edit is a point insertion in front of
//! (or around) the original, so the original text is never rewritten.

use crate::edit::{dedup_edits, TextEdit};
use crate::resolve::find_matching_nodes;
use crate::syntax::{NodeKind, NodeRef, Role, SyntaxTree};
use crate::text;

/// Binary operators whose operands can be repeated: `a + b` → `a + b + b`.
const DUPLICABLE_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "&", "|", "^", "<<", ">>", ">>>", "&&", "||",
];

/// Resolve `[start, end]` and synthesize the deduplicated duplication edits.
///
/// An empty result means no syntax-aware duplication applies and the
/// caller should fall back to plain line or selection duplication.
pub fn duplicate_edits(tree: &SyntaxTree, start: usize, end: usize) -> Vec<TextEdit> {
    let nodes = find_matching_nodes(tree, start, end);
    tracing::debug!(matched = nodes.len(), start, end, "resolved nodes to duplicate");
    dedup_edits(nodes.into_iter().flat_map(create_edits).collect())
}

/// Point insertions that duplicate `node`, or nothing if no rule applies
/// anywhere up the tree.
pub fn create_edits(node: NodeRef<'_>) -> Vec<TextEdit> {
    let Some(parent) = node.parent() else {
        return Vec::new();
    };

    if let Some(edits) = parenthesize_arrow_parameter(node, parent) {
        return edits;
    }

    if is_list_element(node, parent) {
        let space = if node.leading_whitespace().is_empty() { " " } else { "" };
        return vec![TextEdit::insert(
            node.full_start(),
            format!("{},{}", node.full_text(), space),
            "duplicate list element",
        )];
    }

    if parent.kind() == NodeKind::BinaryExpression {
        if let Some(operator) = parent.child(Role::Operator) {
            if DUPLICABLE_OPERATORS.contains(&operator.text()) {
                let operand = match node.role() {
                    Role::Left | Role::Right => Some(node),
                    _ => parent.child(Role::Right),
                };
                if let Some(operand) = operand {
                    return vec![duplicate_operand(operand, operator.text())];
                }
            }
        }
    }

    if parent.kind() == NodeKind::PropertyAccess && node.role() == Role::Property {
        let call_text = parent
            .parent()
            .filter(|call| call.kind() == NodeKind::CallExpression)
            .filter(|_| parent.role() == Role::Callee)
            .map(|call| {
                let arguments: Vec<&str> =
                    call.children_with(Role::Argument).map(|a| a.full_text()).collect();
                format!("({})", arguments.join(","))
            })
            .unwrap_or_default();
        return vec![TextEdit::insert(
            node.start(),
            format!("{}{}.", node.text(), call_text),
            "extend property chain",
        )];
    }

    if parent.kind() == NodeKind::IfStatement {
        return match node.role() {
            Role::Condition => vec![TextEdit::insert(
                node.start(),
                format!("{} && ", node.text()),
                "extend condition",
            )],
            Role::Else => vec![TextEdit::insert(
                node.start(),
                format!("if () {} else ", node.text()),
                "add else-if arm",
            )],
            _ => create_edits(parent),
        };
    }

    if node.kind() == NodeKind::IfStatement {
        let condition = node.child(Role::Condition).map(|c| c.text()).unwrap_or_default();
        let then = node.child(Role::Then).map(|t| t.text()).unwrap_or_default();
        return vec![TextEdit::insert(
            node.start(),
            format!("if ({}) {} else ", condition, then),
            "chain conditional",
        )];
    }

    // A block serving as the body of `if`/loops/functions is never cloned
    // on its own; the construct owning it is.
    if node.kind() == NodeKind::Block && parent.kind() != NodeKind::Block {
        return create_edits(parent);
    }

    // Only a statement of its own is cloned; one embedded in an `export` or
    // a `for` header stands for the construct around it.
    if node.is_statement() && node.in_statement_position() {
        return vec![TextEdit::insert(
            node.start(),
            format!("{}{}", node.text(), statement_delimiter(node, parent)),
            "duplicate statement",
        )];
    }

    create_edits(parent)
}

/// `x => x` becomes `(x, x) => x`.
fn parenthesize_arrow_parameter(node: NodeRef<'_>, parent: NodeRef<'_>) -> Option<Vec<TextEdit>> {
    if !node.is_parameter() || parent.kind() != NodeKind::ArrowFunction {
        return None;
    }
    if parent.children_with(Role::Parameter).count() != 1 {
        return None;
    }

    let arrow_at = parent
        .child(Role::Body)
        .map(|body| body.full_start())
        .unwrap_or(parent.end())
        .max(node.end());
    let between = &node.source()[node.end()..arrow_at];
    if between.trim_start().starts_with(')') {
        return None;
    }

    Some(vec![
        TextEdit::insert(node.start(), format!("({}, ", node.text()), "parenthesize parameter"),
        TextEdit::insert(node.end(), ")", "parenthesize parameter"),
    ])
}

fn is_list_element(node: NodeRef<'_>, parent: NodeRef<'_>) -> bool {
    node.is_parameter()
        || parent.kind() == NodeKind::ArrayLiteral
        || (node.is_expression() && node.role() == Role::Argument)
        || node.kind() == NodeKind::PropertyAssignment
        || (node.kind() == NodeKind::VariableDeclaration
            && parent.children_with(Role::Declarator).count() > 1)
}

fn duplicate_operand(operand: NodeRef<'_>, operator: &str) -> TextEdit {
    let space = if operand.leading_whitespace().is_empty() { " " } else { "" };
    TextEdit::insert(
        operand.full_start(),
        format!("{} {}{}", operand.full_text(), operator, space),
        "duplicate operand",
    )
}

/// `; ` keeps a statement sharing its line with a sibling on that line;
/// otherwise the copy goes on its own line with the same indentation.
fn statement_delimiter(node: NodeRef<'_>, parent: NodeRef<'_>) -> String {
    let source = node.source();

    if parent.is_block_like() {
        let siblings: Vec<NodeRef<'_>> = parent.children_with(Role::Statement).collect();
        if let Some(index) = siblings.iter().position(|s| *s == node) {
            let prev_inline = index
                .checked_sub(1)
                .and_then(|i| siblings.get(i))
                .is_some_and(|prev| text::same_line(source, prev.end(), node.start()));
            let next_inline = siblings
                .get(index + 1)
                .is_some_and(|next| text::same_line(source, node.end(), next.start()));
            if prev_inline || next_inline {
                return if node.text().ends_with(';') { " " } else { "; " }.to_string();
            }
        }
    }

    format!("\n{}", text::line_indent(source, node.start()))
}
