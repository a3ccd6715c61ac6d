use proptest::prelude::*;
use smart_edit_core::duplicate::duplicate_edits;
use smart_edit_core::insert_log::log_edit;
use smart_edit_core::resolve::{find_matching_nodes, find_smallest_node};
use smart_edit_core::{EditSet, IndentStyle, SyntaxTree};
use tree_sitter::Parser;

const SOURCES: &[&str] = &[
    "const arr = [1, 2, 3]",
    "const f = x => x + 1",
    "function sum(a, b = 2) {\n  if (a > b) { return a } else return b\n}",
    "let a = 1, b = a * 2;\nwhile (b) b--\n",
    "for (const item of items) {\n  log(item.name, item['id'])\n}",
    "const o = { size: area(w, h), [key]: value }\nswitch (o.size) {\n  case 1: run(); break\n  default:\n}",
    "user.profile.get(id).then(r => r.ok && r.json())",
    "do { i += step } while (i < max && !done)",
    "for (let i = 0; i < n; i++) {\n  total += i\n}",
    "export const x = compute(a, b)\nexport function f(p) { return p }",
    "do {\n  i++\n} while (i < max)",
    "switch (k) {\n  case 1:\n    run(k)\n    break\n  default:\n    stop()\n}",
    "outer: for (const row of rows) if (row.ok) seen.push(row); else skip(row)",
];

fn parse_raw(source: &str) -> tree_sitter::Tree {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
        .unwrap();
    parser.parse(source, None).unwrap()
}

fn parse(source: &str) -> SyntaxTree {
    SyntaxTree::from_tree_sitter(source, &parse_raw(source))
}

fn count_errors(node: tree_sitter::Node<'_>) -> usize {
    let own = usize::from(node.is_error() || node.is_missing());
    let mut cursor = node.walk();
    let nested: usize = node.children(&mut cursor).map(count_errors).sum();
    own + nested
}

fn syntax_errors(source: &str) -> usize {
    count_errors(parse_raw(source).root_node())
}

fn source_and_range() -> impl Strategy<Value = (&'static str, usize, usize)> {
    prop::sample::select(SOURCES).prop_flat_map(|source| {
        let len = source.len();
        (Just(source), 0..=len, 0..=len).prop_map(|(source, a, b)| (source, a.min(b), a.max(b)))
    })
}

proptest! {
    /// Property: Resolution depends only on the text and the range.
    #[test]
    fn prop_resolution_is_deterministic((source, start, end) in source_and_range()) {
        let first = parse(source);
        let second = parse(source);
        let spans = |tree: &SyntaxTree| -> Vec<_> {
            find_matching_nodes(tree, start, end)
                .iter()
                .map(|n| (n.kind(), n.start(), n.end()))
                .collect()
        };
        prop_assert_eq!(spans(&first), spans(&second));

        let smallest = |tree: &SyntaxTree| find_smallest_node(tree, start, end).map(|n| (n.start(), n.end()));
        prop_assert_eq!(smallest(&first), smallest(&second));
    }

    /// Property: Duplication only inserts and its edits never overlap.
    #[test]
    fn prop_duplication_edits_form_a_valid_set((source, start, end) in source_and_range()) {
        let tree = parse(source);
        let edits = duplicate_edits(&tree, start, end);
        prop_assert!(edits.iter().all(|e| e.is_insertion()));

        let count = edits.len();
        let edit_set = EditSet::new(edits, source.len()).unwrap();
        prop_assert_eq!(edit_set.len(), count);

        let result = edit_set.apply(source);
        let inserted: usize = edit_set.iter().map(|e| e.replacement.len()).sum();
        prop_assert_eq!(result.len(), source.len() + inserted);
    }

    /// Property: A log edit always lands inside the document and carries the statement.
    #[test]
    fn prop_log_edit_is_applicable((source, start, end) in source_and_range()) {
        let tree = parse(source);
        if let Some(edit) = log_edit(&tree, start, end, IndentStyle::Spaces(2)) {
            prop_assert!(edit.replacement.contains("console.debug('*** "));
            let edit_set = EditSet::new(vec![edit], source.len()).unwrap();
            let result = edit_set.apply(source);
            prop_assert!(result.len() > source.len());
        }
    }

    /// Property: Logging never leaves the document less well-formed than it was.
    #[test]
    fn prop_log_edit_keeps_source_parseable((source, start, end) in source_and_range()) {
        let tree = parse(source);
        if let Some(edit) = log_edit(&tree, start, end, IndentStyle::Spaces(2)) {
            let result = EditSet::new(vec![edit], source.len()).unwrap().apply(source);
            prop_assert!(
                syntax_errors(&result) <= syntax_errors(source),
                "log edit broke the syntax:\n{}",
                result
            );
        }
    }
}
