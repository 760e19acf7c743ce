//! Whitespace and length normalization.

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters. `0` means no limit.
pub fn truncate_chars(text: String, max_chars: usize) -> String {
    if max_chars == 0 {
        return text;
    }
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate_chars("héllo wörld".to_string(), 7), "héllo w");
        assert_eq!(truncate_chars("short".to_string(), 10), "short");
        assert_eq!(truncate_chars("exact".to_string(), 5), "exact");
    }

    #[test]
    fn test_zero_disables_truncation() {
        assert_eq!(truncate_chars("anything".to_string(), 0), "anything");
    }
}
