//! Debug-log placement.
//!
//! A loggable node is first mapped to an [`EditSite`], a description of
//! where a new statement may legally go. The site only becomes a concrete
//! [`TextEdit`] once the statement text is known, wrapping bare statement
//! bodies in a fresh `{ ... }` block when needed.

use crate::caption::caption;
use crate::edit::TextEdit;
use crate::format::{reindent, IndentStyle};
use crate::resolve::{find_expression_node, find_smallest_node};
use crate::snippet::Snippet;
use crate::syntax::{NodeKind, NodeRef, Role, SyntaxTree};
use crate::text;

/// Where a statement goes relative to an anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSite<'t> {
    /// Immediately before `node`, followed by `prefix` (e.g. `return `) in
    /// front of the node's own text.
    Before {
        node: NodeRef<'t>,
        prefix: Option<&'static str>,
    },
    After {
        node: NodeRef<'t>,
    },
    /// At the top of a block-like node.
    Inside {
        node: NodeRef<'t>,
    },
}

impl<'t> EditSite<'t> {
    /// Climb from `node` to the nearest place a statement can be inserted.
    pub fn resolve(node: NodeRef<'t>) -> Option<Self> {
        let Some(parent) = node.parent() else {
            tracing::trace!("reached the root without an insertion site");
            return None;
        };

        if parent.kind() == NodeKind::ArrowFunction
            && node.role() == Role::Body
            && node.is_expression()
        {
            return Some(Self::before(node, Some("return ")));
        }

        if node.is_parameter() && parent.is_function_like() {
            if let Some(body) = parent.child(Role::Body) {
                return Some(if body.is_expression() {
                    Self::before(body, Some("return "))
                } else {
                    Self::Inside { node: body }
                });
            }
        }

        match parent.kind() {
            NodeKind::IfStatement if node.role() == Role::Condition => {
                return Some(Self::before(parent, None));
            }
            NodeKind::WhileStatement | NodeKind::DoStatement => {
                if let Some(body) = parent.child(Role::Body) {
                    return Some(if body.kind() == NodeKind::Block {
                        Self::Inside { node: body }
                    } else {
                        Self::before(body, None)
                    });
                }
            }
            NodeKind::ForInStatement => match node.role() {
                Role::Left => return Self::loop_body(parent),
                Role::Right => return Some(Self::before(parent, None)),
                _ => {}
            },
            NodeKind::ForStatement => {
                if let Some(site) = Self::loop_body(parent) {
                    return Some(site);
                }
            }
            _ => {}
        }

        if node.kind() == NodeKind::ReturnStatement {
            return Some(Self::before(node, None));
        }
        if node.is_statement() && node.in_statement_position() {
            return Some(Self::After { node });
        }

        Self::resolve(parent)
    }

    fn before(node: NodeRef<'t>, prefix: Option<&'static str>) -> Self {
        Self::Before { node, prefix }
    }

    fn loop_body(parent: NodeRef<'t>) -> Option<Self> {
        let body = parent.child(Role::Body)?;
        Some(if body.is_block_like() {
            Self::Inside { node: body }
        } else {
            Self::before(body, None)
        })
    }

    /// Turn the site into an edit inserting `text`.
    pub fn materialize(&self, text: &str) -> TextEdit {
        match *self {
            Self::Before { node, prefix } => {
                let prefix = prefix.unwrap_or_default();
                if in_block_like(node) {
                    TextEdit::insert(node.start(), format!("{text}\n{prefix}"), "log before")
                } else {
                    TextEdit::replace(
                        node.full_start(),
                        node.end(),
                        format!(" {{\n{text}\n{prefix}{}\n}}", node.text()),
                        "wrap in block, log before",
                    )
                }
            }
            Self::After { node } => {
                if in_block_like(node) {
                    TextEdit::insert(node.end(), format!("\n{text}"), "log after")
                } else {
                    TextEdit::replace(
                        node.full_start(),
                        node.end(),
                        format!(" {{\n{}\n{text}\n}}", node.text()),
                        "wrap in block, log after",
                    )
                }
            }
            Self::Inside { node } => match node.child(Role::Statement) {
                Some(first) => Self::before(first, None).materialize(text),
                None => {
                    // right after the opening brace of an empty block
                    let at = if node.kind() == NodeKind::Block {
                        node.start() + 1
                    } else {
                        node.end()
                    };
                    TextEdit::insert(at, format!("\n{text}"), "log inside")
                }
            },
        }
    }
}

fn in_block_like(node: NodeRef<'_>) -> bool {
    node.parent().is_some_and(|parent| parent.is_block_like())
}

/// `console.debug('*** <caption> »', <expression>)` for a loggable node.
///
/// The value of a `key: value` pair is captioned with the key.
pub fn debug_statement(node: NodeRef<'_>) -> String {
    let named_pair = node
        .parent()
        .filter(|parent| parent.kind() == NodeKind::PropertyAssignment)
        .and_then(|pair| Some((pair.child(Role::Key)?, pair.child(Role::Value)?)))
        .filter(|(key, _)| key.raw_kind() != "computed_property_name");

    let (label, expression) = match named_pair {
        Some((key, value)) => (caption(key.text()), value.text()),
        None => {
            let expression = node.text();
            let expression = expression.strip_suffix(';').unwrap_or(expression);
            (caption(expression), expression)
        }
    };
    format!("console.debug('*** {label} »', {expression})")
}

/// Resolve `[start, end]` to a log statement edit, re-indented for its
/// anchor line, or `None` if nothing there is loggable.
pub fn log_edit(tree: &SyntaxTree, start: usize, end: usize, style: IndentStyle) -> Option<TextEdit> {
    let smallest = find_smallest_node(tree, start, end)?;
    let Some(expression) = find_expression_node(smallest) else {
        tracing::debug!(kind = ?smallest.kind(), "nothing loggable at selection");
        return None;
    };
    let site = EditSite::resolve(expression)?;
    tracing::debug!(?site, "resolved log site");

    let mut edit = site.materialize(&debug_statement(expression));
    let anchor_indent = text::line_indent(tree.source(), edit.start);
    edit.replacement = reindent(&edit.replacement, anchor_indent, style);
    Some(edit)
}

/// Interactive log template for a blank line.
///
/// With clipboard text, the caption and the logged value default to the
/// clip; when the caption equals the clip both fields are linked.
pub fn log_snippet(clipboard: Option<&str>) -> Snippet {
    let mut snippet = Snippet::new();
    snippet.append_text("console.debug('*** ");

    match clipboard.map(str::trim).filter(|clip| !clip.is_empty()) {
        Some(clip) => {
            let label = caption(clip);
            let value_index = if label == clip { 1 } else { 2 };
            snippet
                .append_placeholder(1, label)
                .append_text(" »', ")
                .append_placeholder(value_index, clip);
        }
        None => {
            snippet
                .append_placeholder(1, "")
                .append_text(" »', ")
                .append_placeholder(1, "");
        }
    }

    snippet.append_text(")").append_tabstop(0);
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::EditSet;
    use crate::syntax::tests::parse_ts;

    const STYLE: IndentStyle = IndentStyle::Spaces(2);

    fn log_at(source: &str, start: usize, end: usize) -> Option<String> {
        let tree = parse_ts(source);
        let edit = log_edit(&tree, start, end, STYLE)?;
        Some(EditSet::new(vec![edit], source.len()).unwrap().apply(source))
    }

    fn caret(source: &str, marker: &str) -> usize {
        source.find(marker).unwrap()
    }

    #[test]
    fn test_for_of_variable_goes_inside_empty_block() {
        let source = "for (const item of items) { }";
        let tree = parse_ts(source);
        let at = caret(source, "item");
        let edit = log_edit(&tree, at, at, STYLE).unwrap();
        assert!(edit.is_insertion());
        assert_eq!(edit.start, caret(source, "{") + 1);
        assert_eq!(edit.replacement, "\nconsole.debug('*** item »', item)");
    }

    #[test]
    fn test_iterated_expression_goes_before_loop() {
        let source = "for (const item of items) { }";
        let at = caret(source, "items");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            "console.debug('*** items »', items)\nfor (const item of items) { }"
        );
    }

    #[test]
    fn test_arrow_body_becomes_return_block() {
        let source = "const f = x => x + 1";
        let start = caret(source, "x + 1");
        assert_eq!(
            log_at(source, start, source.len()).unwrap(),
            "const f = x => {\n  console.debug('*** x + 1 »', x + 1)\n  return x + 1\n}"
        );
    }

    #[test]
    fn test_if_condition_at_top_level_inserts_before() {
        let source = "if (x) doThing()";
        let at = caret(source, "x");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            "console.debug('*** x »', x)\nif (x) doThing()"
        );
    }

    #[test]
    fn test_bare_if_body_is_wrapped_in_block() {
        let source = "while (y) if (x) doThing()";
        let tree = parse_ts(source);
        let at = caret(source, "x");
        let edit = log_edit(&tree, at, at, STYLE).unwrap();
        assert!(!edit.is_insertion());
        assert_eq!(edit.start, caret(source, " if"));
        assert_eq!(edit.end, source.len());

        let result = EditSet::new(vec![edit], source.len()).unwrap().apply(source);
        assert_eq!(
            result,
            "while (y) {\n  console.debug('*** x »', x)\n  if (x) doThing()\n}"
        );
    }

    #[test]
    fn test_return_operand_logs_before_return() {
        let source = "function f() {\n  return total\n}";
        let at = caret(source, "total");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            "function f() {\n  console.debug('*** total »', total)\n  return total\n}"
        );
    }

    #[test]
    fn test_declaration_logs_after_statement() {
        let source = "const a = compute(b)\nnext()";
        let at = caret(source, "compute");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            "const a = compute(b)\nconsole.debug('*** compute(b) »', compute(b))\nnext()"
        );
    }

    #[test]
    fn test_exported_declaration_logs_after_export() {
        let source = "export const a = compute(b)\nnext()";
        let at = caret(source, "compute");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            "export const a = compute(b)\nconsole.debug('*** compute(b) »', compute(b))\nnext()"
        );
    }

    #[test]
    fn test_for_header_logs_at_top_of_body() {
        let source = "for (let i = 0; i < n; i++) {\n  run(i)\n}";
        let expected = "for (let i = 0; i < n; i++) {\n  console.debug('*** n »', n)\n  run(i)\n}";
        let at = caret(source, "n;");
        assert_eq!(log_at(source, at, at).unwrap(), expected);

        let at = caret(source, "i =");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            expected.replace("'*** n »', n", "'*** i »', i")
        );
    }

    #[test]
    fn test_do_condition_logs_inside_block_body() {
        let source = "do {\n  i++\n} while (i < max)";
        let at = caret(source, "max");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            "do {\n  console.debug('*** max »', max)\n  i++\n} while (i < max)"
        );
    }

    #[test]
    fn test_switch_case_statement_logs_after() {
        let source = "switch (k) {\n  case 1:\n    const v = read(k)\n}";
        let at = caret(source, "v =");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            "switch (k) {\n  case 1:\n    const v = read(k)\n    console.debug('*** v »', v)\n}"
        );
    }

    #[test]
    fn test_parameter_logs_at_top_of_body() {
        let source = "function f(a, b) {\n  run()\n}";
        let at = caret(source, "b)");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            "function f(a, b) {\n  console.debug('*** b »', b)\n  run()\n}"
        );
    }

    #[test]
    fn test_pair_value_is_captioned_with_key() {
        let source = "const o = { size: area(w) }";
        let at = caret(source, "area");
        assert_eq!(
            log_at(source, at, at).unwrap(),
            "const o = { size: area(w) }\nconsole.debug('*** size »', area(w))"
        );
    }

    #[test]
    fn test_expression_statement_drops_semicolon() {
        let source = "run(task);";
        let tree = parse_ts(source);
        let node = tree.root().child(Role::Statement).unwrap();
        assert_eq!(debug_statement(node), "console.debug('*** run(task) »', run(task))");
    }

    #[test]
    fn test_loop_header_is_skipped() {
        let source = "while (running) tick()";
        assert!(log_at(source, 0, 3).is_none());
    }

    #[test]
    fn test_snippet_with_clipboard() {
        let snippet = log_snippet(Some("  user.name  "));
        assert_eq!(
            snippet.to_snippet_string(),
            "console.debug('*** ${1:user.name} »', ${1:user.name})$0"
        );

        let snippet = log_snippet(Some("get('id')"));
        assert_eq!(
            snippet.to_snippet_string(),
            "console.debug('*** ${1:get(\"id\")} »', ${2:get('id')})$0"
        );
    }

    #[test]
    fn test_snippet_without_clipboard() {
        assert_eq!(
            log_snippet(None).to_snippet_string(),
            "console.debug('*** $1 »', $1)$0"
        );
        assert_eq!(log_snippet(Some("   ")), log_snippet(None));
    }
}
