//! smart-edit-core: syntax-aware edit site resolution.
//!
//! This crate is parser-agnostic past the lowering step. It takes a
//! tree-sitter tree, lowers it into a [`SyntaxTree`], resolves what a caret
//! or selection refers to and computes text edits. Language detection and
//! parser construction live in `smart-edit-lang`.
//!
//! Two edit engines sit on top of the resolver:
//! - [`duplicate`] clones a node with the punctuation its role needs;
//! - [`insert_log`] finds a legal place for a debug statement, wrapping
//!   bare statement bodies in a block.
//!
//! Both return plain [`TextEdit`]s against the original source; callers
//! validate them with [`EditSet`] and apply them in one pass.
//!
//! [`case`] holds the identifier case conversions, which need no tree.

pub mod caption;
pub mod case;
pub mod duplicate;
pub mod edit;
pub mod format;
pub mod insert_log;
pub mod resolve;
pub mod snippet;
pub mod syntax;
pub mod text;

pub use case::TextCase;
pub use edit::{EditConflict, EditSet, TextEdit};
pub use format::IndentStyle;
pub use snippet::Snippet;
pub use syntax::{NodeKind, NodeRef, Role, SyntaxTree};
