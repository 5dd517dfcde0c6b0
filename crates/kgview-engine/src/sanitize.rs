//! Display-safe element ids and text truncation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that break CSS-style element selectors in the renderer.
static UNSAFE_ID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.#\[\]():"'\\]"#).unwrap());

/// Replace selector-breaking characters with `_`.
///
/// Not collision-free: `a.b` and `a#b` map to the same id.
pub fn sanitize_id(name: &str) -> String {
    UNSAFE_ID_CHARS.replace_all(name, "_").into_owned()
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_forbidden_chars() {
        assert_eq!(sanitize_id("node.js"), "node_js");
        assert_eq!(sanitize_id("C#"), "C_");
        assert_eq!(sanitize_id("f(x) [a]: \"q\" 'r' \\"), "f_x_ _a__ _q_ _r_ _");
    }

    #[test]
    fn test_sanitize_keeps_safe_names() {
        assert_eq!(sanitize_id("Graph Neural Network"), "Graph Neural Network");
        assert_eq!(sanitize_id("a-->b"), "a-->b");
        assert_eq!(sanitize_id("x, y"), "x, y");
        assert_eq!(sanitize_id(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["U.S.A.", "x[0]", "plain", "München (city)"] {
            let once = sanitize_id(name);
            assert_eq!(sanitize_id(&once), once);
        }
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("→→→", 2), "→→");
    }
}
