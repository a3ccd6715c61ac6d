//! Core text editing engine.
//!
//! Edits are point insertions (`start == end`) or range replacements,
//! expressed in byte offsets into the ORIGINAL source. They are validated
//! as a non-overlapping set and applied from the highest offset down so
//! earlier offsets stay valid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single text replacement. Replaces bytes `[start..end)` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Byte offset of the first byte to replace (inclusive).
    pub start: usize,
    /// Byte offset past the last byte to replace (exclusive).
    pub end: usize,
    /// The replacement text.
    pub replacement: String,
    /// Human-readable label for diagnostics.
    pub label: String,
    /// Lower priority values appear earlier in output for same-position inserts.
    #[serde(default)]
    pub priority: i32,
}

impl TextEdit {
    /// Point insertion of `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            start: offset,
            end: offset,
            replacement: text.into(),
            label: label.into(),
            priority: 0,
        }
    }

    /// Replacement of `[start..end)` by `text`.
    pub fn replace(
        start: usize,
        end: usize,
        text: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            replacement: text.into(),
            label: label.into(),
            priority: 0,
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }
}

/// Describes what went wrong when building an EditSet.
#[derive(Debug, Clone, Error, Serialize)]
pub enum EditConflict {
    #[error("Edits overlap: '{a_label}' [{a_start}..{a_end}) and '{b_label}' [{b_start}..{b_end})")]
    Overlapping {
        a_label: String,
        a_start: usize,
        a_end: usize,
        b_label: String,
        b_start: usize,
        b_end: usize,
    },
    #[error("Edit '{label}' byte range [{start}..{end}) exceeds source length {source_len}")]
    OutOfBounds {
        label: String,
        start: usize,
        end: usize,
        source_len: usize,
    },
}

/// Drop edits identical in range and text to an earlier one.
///
/// Survivors are numbered by generation order through `priority`, so
/// several insertions at one offset come out in the order they were made.
pub fn dedup_edits(edits: Vec<TextEdit>) -> Vec<TextEdit> {
    let mut unique: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits {
        let seen = unique.iter().any(|kept| {
            kept.start == edit.start && kept.end == edit.end && kept.replacement == edit.replacement
        });
        if !seen {
            unique.push(edit);
        }
    }
    for (rank, edit) in unique.iter_mut().enumerate() {
        edit.priority = rank as i32;
    }
    unique
}

/// A validated, non-overlapping set of edits for a single source string.
///
/// Edits are stored sorted by `(start, end, priority)` ascending.
/// The `apply` method processes them in REVERSE order so byte offsets
/// remain valid throughout.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    edits: Vec<TextEdit>,
}

impl EditSet {
    /// Create a new EditSet, validating against the given source length.
    ///
    /// Returns `Err` if any edits overlap or are out of bounds.
    pub fn new(mut edits: Vec<TextEdit>, source_len: usize) -> Result<Self, EditConflict> {
        edits.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(a.end.cmp(&b.end))
                .then(a.priority.cmp(&b.priority))
        });

        for edit in &edits {
            if edit.start > edit.end || edit.end > source_len {
                return Err(EditConflict::OutOfBounds {
                    label: edit.label.clone(),
                    start: edit.start,
                    end: edit.end,
                    source_len,
                });
            }
        }

        // edit[i].end must be <= edit[i+1].start; an insertion may sit on a
        // replacement's boundary but never strictly inside it.
        for pair in edits.windows(2) {
            let a = &pair[0];
            let b = &pair[1];
            if a.is_insertion() && b.is_insertion() && a.start == b.start {
                continue;
            }
            if a.end > b.start {
                return Err(EditConflict::Overlapping {
                    a_label: a.label.clone(),
                    a_start: a.start,
                    a_end: a.end,
                    b_label: b.label.clone(),
                    b_start: b.start,
                    b_end: b.end,
                });
            }
        }

        Ok(Self { edits })
    }

    /// Apply all edits to `source` and return the new text.
    pub fn apply(&self, source: &str) -> String {
        let mut result = source.to_string();
        for edit in self.descending() {
            result.replace_range(edit.start..edit.end, &edit.replacement);
        }
        result
    }

    /// Edits in application order: highest offset first.
    pub fn descending(&self) -> impl Iterator<Item = &TextEdit> {
        self.edits.iter().rev()
    }

    /// Returns the number of edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns true if there are no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Returns an iterator over edits (sorted ascending by start offset).
    pub fn iter(&self) -> impl Iterator<Item = &TextEdit> {
        self.edits.iter()
    }
}
