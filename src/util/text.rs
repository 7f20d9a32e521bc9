use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Truncate `s` to at most `max_width` terminal columns.
///
/// A truncated string ends in `…`. Returns the input borrowed when it
/// already fits. Wide characters (CJK, emoji) count as two columns and are
/// never split.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // Leave one column for the ellipsis
    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(s.len().min(max_width * 4));
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Flatten a server-provided string onto one line for list rendering.
///
/// Line breaks and tabs become single spaces; other control characters
/// (including ANSI escape introducers) are dropped; leading and trailing
/// whitespace is trimmed.
pub fn sanitize_line(s: &str) -> Cow<'_, str> {
    let needs_work = s.chars().any(|c| c.is_control()) || s.trim().len() != s.len();
    if !needs_work {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut last_space = false;
    for c in s.chars() {
        if matches!(c, '\n' | '\r' | '\t') {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else if !c.is_control() {
            out.push(c);
            last_space = c == ' ';
        }
    }
    Cow::Owned(out.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_is_borrowed() {
        let out = truncate_to_width("Lo-fi Beats", 20);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "Lo-fi Beats");
    }

    #[test]
    fn test_exact_width_is_kept() {
        assert_eq!(truncate_to_width("abcde", 5), "abcde");
    }

    #[test]
    fn test_truncates_with_ellipsis() {
        assert_eq!(truncate_to_width("Music Channel", 6), "Music…");
    }

    #[test]
    fn test_zero_and_one_width() {
        assert_eq!(truncate_to_width("abc", 0), "");
        assert_eq!(truncate_to_width("abc", 1), "…");
    }

    #[test]
    fn test_wide_chars_not_split() {
        // Each CJK char is two columns; four columns leave room for one plus the ellipsis
        let out = truncate_to_width("音楽チャンネル", 4);
        assert_eq!(out, "音…");
        assert!(UnicodeWidthStr::width(out.as_ref()) <= 4);
    }

    #[test]
    fn test_sanitize_plain_is_borrowed() {
        assert!(matches!(sanitize_line("Tech Talks"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_sanitize_flattens_newlines() {
        assert_eq!(sanitize_line("Tech\r\nTalks\tDaily"), "Tech Talks Daily");
    }

    #[test]
    fn test_sanitize_drops_escape_sequences_introducer() {
        assert_eq!(sanitize_line("\x1b[31mRed"), "[31mRed");
        assert_eq!(sanitize_line("bell\x07"), "bell");
    }

    #[test]
    fn test_sanitize_trims() {
        assert_eq!(sanitize_line("  padded  "), "padded");
    }
}
