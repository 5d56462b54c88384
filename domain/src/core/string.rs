//! String helpers for log previews and user input.

/// Shorten `s` to at most `max_len` bytes for display, appending `...` when
/// anything was cut. Never splits a UTF-8 character.
pub fn preview(s: &str, max_len: usize) -> String {
    let flat = collapse_whitespace(s);
    if flat.len() <= max_len {
        return flat;
    }
    let mut end = max_len.saturating_sub(3).min(flat.len());
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &flat[..end])
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the text carries no content at all.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("Oui, un site web", 40), "Oui, un site web");
    }

    #[test]
    fn test_preview_cuts_with_ellipsis() {
        assert_eq!(preview("Nous avons un CRM", 10), "Nous av...");
    }

    #[test]
    fn test_preview_respects_char_boundary() {
        // 'é' is two bytes; cutting inside it must back off
        let s = "ééééé";
        assert_eq!(preview(s, 6), "é...");
    }

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(preview("ligne 1\n\n  ligne 2", 40), "ligne 1 ligne 2");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \n\t"));
        assert!(!is_blank(" ok "));
    }
}
