//! Indentation helpers: the document's indent unit and re-indentation of
//! inserted multi-line text.
//!
//! This only approximates indentation well enough to produce valid
//! intermediate text; the host's formatter runs afterwards.

use serde::{Deserialize, Serialize};

/// Indentation unit of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    Spaces(u8),
    Tabs,
}

impl IndentStyle {
    /// Style from editor options (tab size, spaces-vs-tabs).
    pub fn from_options(tab_size: u8, insert_spaces: bool) -> Self {
        if insert_spaces {
            Self::Spaces(tab_size.max(1))
        } else {
            Self::Tabs
        }
    }

    /// One level of indentation.
    pub fn unit(&self) -> String {
        match self {
            Self::Spaces(n) => " ".repeat(*n as usize),
            Self::Tabs => "\t".to_string(),
        }
    }
}

/// Re-indent `text` for insertion on a line whose indentation is `anchor_indent`.
///
/// The first line is emitted as is, since it lands after the anchor line's
/// existing indentation. Depth starts at the anchor's depth, grows after a
/// line ending in `{` and shrinks before a line starting with `}`.
pub fn reindent(text: &str, anchor_indent: &str, style: IndentStyle) -> String {
    let unit = style.unit();
    let unit_width = unit.chars().count().max(1);
    let mut depth = anchor_indent.chars().count() / unit_width;

    let lines: Vec<&str> = text.split('\n').collect();
    let mut result = String::with_capacity(text.len() + lines.len() * unit.len());
    for (rank, line) in lines.iter().enumerate() {
        if rank == 0 {
            result.push_str(line);
            continue;
        }

        if lines[rank - 1].ends_with('{') {
            depth += 1;
        }
        if line.starts_with('}') {
            depth = depth.saturating_sub(1);
        }

        result.push('\n');
        result.push_str(&unit.repeat(depth));
        result.push_str(line);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_from_options() {
        assert_eq!(IndentStyle::from_options(4, true).unit(), "    ");
        assert_eq!(IndentStyle::from_options(4, false).unit(), "\t");
    }

    #[test]
    fn test_reindent_block() {
        let text = " {\nlog()\nwork()\n}";
        let result = reindent(text, "  ", IndentStyle::Spaces(2));
        assert_eq!(result, " {\n    log()\n    work()\n  }");
    }

    #[test]
    fn test_reindent_first_line_untouched() {
        let result = reindent("log()\n", "\t\t", IndentStyle::Tabs);
        assert_eq!(result, "log()\n\t\t");
    }

    #[test]
    fn test_reindent_clamps_at_zero() {
        let result = reindent("a\n}\n}", "", IndentStyle::Spaces(2));
        assert_eq!(result, "a\n}\n}");
    }
}
