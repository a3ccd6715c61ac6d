//! Line metadata over a source string. All offsets are byte offsets.

/// Byte offset of the start of the line containing `offset`.
pub fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte offset of the end of the line containing `offset`, excluding the
/// line break (`\n` or `\r\n`).
pub fn line_end(source: &str, offset: usize) -> usize {
    let end = source[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(source.len());
    if end > 0 && source[..end].ends_with('\r') {
        end - 1
    } else {
        end
    }
}

/// Text of the line containing `offset`, without its line break.
pub fn line_text(source: &str, offset: usize) -> &str {
    &source[line_start(source, offset)..line_end(source, offset)]
}

/// Whitespace prefix of the line containing `offset`.
pub fn line_indent(source: &str, offset: usize) -> &str {
    let line = line_text(source, offset);
    let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..indent]
}

/// True if the line containing `offset` is empty or whitespace only.
pub fn is_blank_line(source: &str, offset: usize) -> bool {
    line_text(source, offset).trim().is_empty()
}

/// True if both offsets are on the same line.
pub fn same_line(source: &str, a: usize, b: usize) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    !source[lo..hi].contains('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bounds() {
        let source = "one\n  two\r\nthree";
        assert_eq!(line_start(source, 6), 4);
        assert_eq!(line_end(source, 6), 9);
        assert_eq!(line_text(source, 6), "  two");
        assert_eq!(line_text(source, source.len()), "three");
    }

    #[test]
    fn test_line_indent() {
        let source = "  const x = 1;\n\t\tconst y = 2;";
        assert_eq!(line_indent(source, 3), "  ");
        assert_eq!(line_indent(source, 20), "\t\t");
    }

    #[test]
    fn test_blank_lines() {
        let source = "a\n   \nb";
        assert!(is_blank_line(source, 3));
        assert!(!is_blank_line(source, 0));
    }

    #[test]
    fn test_same_line() {
        let source = "a; b;\nc;";
        assert!(same_line(source, 0, 3));
        assert!(!same_line(source, 3, 6));
    }
}
