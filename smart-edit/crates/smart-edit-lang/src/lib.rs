//! smart-edit-lang: Language-specific intelligence.
//!
//! This crate knows which tree-sitter grammar handles which editor language
//! and turns a document into a lowered [`smart_edit_core::SyntaxTree`].

pub mod registry;

pub use registry::{detect_language, parse, parser_for_language};

use serde::Serialize;
use thiserror::Error;
use tree_sitter::Language;

#[derive(Debug, Clone, Error)]
pub enum LangError {
    #[error("Unsupported language: {0}")]
    Unsupported(String),
    #[error("Grammar for {0:?} is not compiled in")]
    MissingGrammar(SupportedLanguage),
    #[error("Grammar version mismatch for {0:?}")]
    LanguageVersion(SupportedLanguage),
    #[error("Parser returned no tree for {0}")]
    ParseFailed(String),
}

/// How a document is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScriptKind {
    Js,
    Jsx,
    Ts,
    Tsx,
    /// JSON, comments allowed.
    Json,
}

/// Supported language identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SupportedLanguage {
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
    Json,
    Jsonc,
}

impl SupportedLanguage {
    /// Map an editor language identifier (`typescriptreact`, `jsonc`, ...).
    pub fn from_language_id(id: &str) -> Result<Self, LangError> {
        match id {
            "typescript" => Ok(Self::TypeScript),
            "typescriptreact" => Ok(Self::Tsx),
            "javascript" => Ok(Self::JavaScript),
            "javascriptreact" => Ok(Self::Jsx),
            "json" => Ok(Self::Json),
            "jsonc" => Ok(Self::Jsonc),
            other => Err(LangError::Unsupported(other.to_string())),
        }
    }

    /// Detect language from a file extension.
    pub fn from_extension(ext: &str) -> Result<Self, LangError> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "ts" | "mts" | "cts" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            "js" | "mjs" | "cjs" => Ok(Self::JavaScript),
            "jsx" => Ok(Self::Jsx),
            "json" => Ok(Self::Json),
            "jsonc" => Ok(Self::Jsonc),
            other => Err(LangError::Unsupported(other.to_string())),
        }
    }

    pub fn script_kind(&self) -> ScriptKind {
        match self {
            Self::TypeScript => ScriptKind::Ts,
            Self::Tsx => ScriptKind::Tsx,
            Self::JavaScript => ScriptKind::Js,
            Self::Jsx => ScriptKind::Jsx,
            Self::Json | Self::Jsonc => ScriptKind::Json,
        }
    }

    pub fn is_json(&self) -> bool {
        self.script_kind() == ScriptKind::Json
    }

    /// Get the tree-sitter Language for this language.
    pub fn ts_language(&self) -> Result<Language, LangError> {
        match self {
            #[cfg(feature = "typescript")]
            Self::TypeScript => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            #[cfg(feature = "typescript")]
            Self::Tsx | Self::Jsx => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
            #[cfg(feature = "javascript")]
            Self::JavaScript => Ok(tree_sitter_javascript::LANGUAGE.into()),
            #[cfg(all(not(feature = "javascript"), feature = "typescript"))]
            Self::JavaScript => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            #[cfg(feature = "json")]
            Self::Json | Self::Jsonc => Ok(tree_sitter_json::LANGUAGE.into()),
            #[allow(unreachable_patterns)]
            _ => Err(LangError::MissingGrammar(*self)),
        }
    }
}
