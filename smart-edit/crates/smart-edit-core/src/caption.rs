//! Short human-readable labels for logged expressions.

const MAX_CAPTION_CHARS: usize = 30;

/// Caption for `text`: line breaks removed, single quotes turned into double
/// quotes, whitespace runs collapsed, then truncated to 30 characters.
pub fn caption(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        match c {
            '\r' | '\n' => continue,
            c if c.is_whitespace() => {
                if !in_space {
                    normalized.push(' ');
                }
                in_space = true;
                continue;
            }
            '\'' => normalized.push('"'),
            c => normalized.push(c),
        }
        in_space = false;
    }
    truncate(&normalized)
}

/// Truncate to 30 characters, ending with `⋯`.
///
/// A call whose first 28 characters leave a parenthesis open keeps a
/// closing `)` after the ellipsis.
pub fn truncate(input: &str) -> String {
    if input.chars().count() <= MAX_CAPTION_CHARS {
        return input.to_string();
    }

    if input.ends_with(')') {
        let head: String = input.chars().take(MAX_CAPTION_CHARS - 2).collect();
        let open = head.chars().fold(0i32, |depth, c| match c {
            '(' => depth + 1,
            ')' => depth - 1,
            _ => depth,
        });
        if open > 0 {
            return head + "⋯)";
        }
    }

    let head: String = input.chars().take(MAX_CAPTION_CHARS - 1).collect();
    head + "⋯"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_chars_unchanged() {
        let input = "a".repeat(30);
        assert_eq!(truncate(&input), input);
    }

    #[test]
    fn test_unbalanced_call_keeps_paren() {
        // 31 chars, one more `(` than `)` in the first 28
        let input = format!("call({})", "x".repeat(25));
        assert_eq!(input.chars().count(), 31);
        assert_eq!(truncate(&input), format!("call({}⋯)", "x".repeat(23)));
    }

    #[test]
    fn test_plain_input_truncates_to_29() {
        let input = "b".repeat(31);
        assert_eq!(truncate(&input), format!("{}⋯", "b".repeat(29)));
    }

    #[test]
    fn test_balanced_call_uses_plain_ellipsis() {
        let input = format!("f(x) + {} + g()", "y".repeat(21));
        let out = truncate(&input);
        assert!(out.ends_with('⋯'));
        assert_eq!(out.chars().count(), 30);
    }

    #[test]
    fn test_caption_normalizes_quotes_and_space() {
        assert_eq!(caption("get('a',\n    'b')"), "get(\"a\", \"b\")");
    }

    #[test]
    fn test_caption_drops_line_breaks() {
        assert_eq!(caption("a\r\nb"), "ab");
        assert_eq!(caption("a \n  b"), "a b");
    }
}
