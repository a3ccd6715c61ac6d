//! Language registry: detect languages and load grammars.

use crate::{LangError, SupportedLanguage};
use smart_edit_core::SyntaxTree;
use std::path::Path;
use tree_sitter::Parser;

/// Create a parser configured for the given language.
pub fn parser_for_language(lang: SupportedLanguage) -> Result<Parser, LangError> {
    let mut parser = Parser::new();
    parser
        .set_language(&lang.ts_language()?)
        .map_err(|_| LangError::LanguageVersion(lang))?;
    Ok(parser)
}

/// Detect the language of a document, by editor language id first and by
/// file name extension second.
pub fn detect_language(language_id: &str, file_name: &str) -> Result<SupportedLanguage, LangError> {
    SupportedLanguage::from_language_id(language_id).or_else(|_| {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        SupportedLanguage::from_extension(ext)
            .map_err(|_| LangError::Unsupported(language_id.to_string()))
    })
}

/// Parse `source` into a lowered syntax tree.
///
/// The parser is error tolerant: malformed input still yields a best-effort
/// tree. `file_name` only labels diagnostics.
pub fn parse(file_name: &str, source: &str, lang: SupportedLanguage) -> Result<SyntaxTree, LangError> {
    let mut parser = parser_for_language(lang)?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| LangError::ParseFailed(file_name.to_string()))?;

    if tree.root_node().has_error() {
        tracing::debug!(file_name, ?lang, "source has syntax errors, using recovered tree");
    }

    Ok(SyntaxTree::from_tree_sitter(source, &tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_edit_core::NodeKind;

    #[test]
    fn test_detect_by_language_id() {
        assert_eq!(
            detect_language("typescript", "untitled").unwrap(),
            SupportedLanguage::TypeScript
        );
    }

    #[test]
    fn test_language_id_wins_over_extension() {
        assert_eq!(
            detect_language("javascriptreact", "src/App.ts").unwrap(),
            SupportedLanguage::Jsx
        );
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            detect_language("plaintext", "src/components/App.tsx").unwrap(),
            SupportedLanguage::Tsx
        );
        assert_eq!(
            detect_language("", "config.mjs").unwrap(),
            SupportedLanguage::JavaScript
        );
        assert_eq!(
            detect_language("", "tsconfig.jsonc").unwrap(),
            SupportedLanguage::Jsonc
        );
    }

    #[test]
    fn test_detect_unsupported() {
        assert!(matches!(
            detect_language("css", "styles.css"),
            Err(LangError::Unsupported(id)) if id == "css"
        ));
    }

    #[test]
    fn test_parse_typescript() {
        let tree = parse("a.ts", "let x: number = 1;\n", SupportedLanguage::TypeScript).unwrap();
        let first = tree.root().children().next().unwrap();
        assert_eq!(first.kind(), NodeKind::VariableStatement);
    }

    #[test]
    fn test_parse_jsx() {
        let source = "const el = <div>{name}</div>;";
        let tree = parse("App.jsx", source, SupportedLanguage::Jsx).unwrap();
        assert_eq!(tree.root().children().count(), 1);
    }

    #[test]
    fn test_parse_jsonc_with_comments() {
        let source = "{\n  // comment\n  \"a\": 1\n}";
        let tree = parse("settings.jsonc", source, SupportedLanguage::Jsonc).unwrap();
        let object = tree.root().children().next().unwrap();
        assert_eq!(object.kind(), NodeKind::ObjectLiteral);
        assert_eq!(object.children().count(), 1);
    }

    #[test]
    fn test_parse_malformed_source_is_tolerated() {
        let tree = parse("broken.js", "function (", SupportedLanguage::JavaScript).unwrap();
        assert_eq!(tree.root().kind(), NodeKind::SourceFile);
    }
}
