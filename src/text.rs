//! Shared text helpers: brand patterns, context windows and the Yes/No marker.

use once_cell::sync::Lazy;
use regex::Regex;

static YES_NO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(yes|no)\s*$").unwrap());

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whole-word pattern for a brand name, metacharacters escaped. A `\b` is only
/// added on a side that starts or ends with a word character, so names such as
/// `C++` or `.NET` still match.
pub(crate) fn brand_pattern(name: &str) -> String {
    let name = name.trim();
    let lead = if name.chars().next().is_some_and(is_word_char) {
        r"\b"
    } else {
        ""
    };
    let trail = if name.chars().last().is_some_and(is_word_char) {
        r"\b"
    } else {
        ""
    };
    format!("{lead}{}{trail}", regex::escape(name))
}

/// Alternation over brand names, longest first so a longer name wins over a
/// shorter one it contains.
pub(crate) fn brand_alternation<S: AsRef<str>>(names: &[S]) -> Option<String> {
    let mut names: Vec<&str> = names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alt = names
        .iter()
        .map(|n| brand_pattern(n))
        .collect::<Vec<_>>()
        .join("|");
    Some(format!("(?:{alt})"))
}

/// Up to `width` characters either side of `start..end`, without crossing a
/// line break. Offsets must sit on char boundaries (regex match offsets do).
pub(crate) fn line_context(text: &str, start: usize, end: usize, width: usize) -> &str {
    let ctx_start = text[..start]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| c != '\n')
        .take(width)
        .last()
        .map_or(start, |(i, _)| i);
    let ctx_end = text[end..]
        .char_indices()
        .take_while(|&(_, c)| c != '\n')
        .take(width)
        .last()
        .map_or(end, |(i, c)| end + i + c.len_utf8());
    &text[ctx_start..ctx_end]
}

/// `Some(true)` / `Some(false)` when the whole text is a bare Yes or No.
pub fn yes_no_answer(text: &str) -> Option<bool> {
    YES_NO_RE
        .captures(text)
        .map(|caps| caps[1].eq_ignore_ascii_case("yes"))
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_pattern_skips_boundaries_next_to_symbols() {
        assert_eq!(brand_pattern("Acme"), r"\bAcme\b");
        assert_eq!(brand_pattern("C++"), r"\bC\+\+");
        assert_eq!(brand_pattern(".NET"), r"\.NET\b");
    }

    #[test]
    fn alternation_puts_longer_names_first() {
        let alt = brand_alternation(&["Acme", "Acme Cloud", " "]).unwrap();
        assert_eq!(alt, r"(?:\bAcme Cloud\b|\bAcme\b)");
        assert!(brand_alternation::<&str>(&[]).is_none());
    }

    #[test]
    fn line_context_stops_at_width_and_newlines() {
        let text = "first line\nabc Acme xyz\nlast";
        let start = text.find("Acme").unwrap();
        let ctx = line_context(text, start, start + 4, 100);
        assert_eq!(ctx, "abc Acme xyz");

        let ctx = line_context(text, start, start + 4, 2);
        assert_eq!(ctx, "c Acme x");
    }

    #[test]
    fn line_context_is_char_boundary_safe() {
        let text = "ééé Acme ééé";
        let start = text.find("Acme").unwrap();
        let ctx = line_context(text, start, start + 4, 2);
        assert_eq!(ctx, "é Acme é");
    }

    #[test]
    fn yes_no_requires_the_whole_text() {
        assert_eq!(yes_no_answer("Yes"), Some(true));
        assert_eq!(yes_no_answer("  no \n"), Some(false));
        assert_eq!(yes_no_answer("Yes, Acme is good"), None);
        assert_eq!(yes_no_answer(""), None);
    }
}
