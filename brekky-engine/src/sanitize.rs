//! Input Sanitization
//!
//! Free-text fields are stripped of markup before they reach the store;
//! website fields must be absolute http(s) URLs or they are dropped.

/// Strip all markup (tags and their attributes) from a string and trim it.
///
/// Anything between `<` and the matching `>` is removed; an unterminated
/// tag swallows the rest of the input, so a stray `<` cannot smuggle
/// markup through.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Keep a URL only if it is an absolute http(s) link, else return empty.
pub fn sanitize_url(url: &str) -> String {
    let clean = url.trim();
    if clean.starts_with("http://") || clean.starts_with("https://") {
        clean.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_attributes() {
        assert_eq!(
            sanitize_text("<script src=\"x\">alert(1)</script>hi"),
            "alert(1)hi"
        );
        assert_eq!(sanitize_text("<b>bold</b> sandwich"), "bold sandwich");
        assert_eq!(sanitize_text("  plain text  "), "plain text");
    }

    #[test]
    fn test_unterminated_tag_swallows_rest() {
        assert_eq!(sanitize_text("before <img src=x onerror=alert(1)"), "before");
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(sanitize_url(" https://lous.example/menu "), "https://lous.example/menu");
        assert_eq!(sanitize_url("http://plain.example"), "http://plain.example");
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
        assert_eq!(sanitize_url("ftp://files.example"), "");
        assert_eq!(sanitize_url(""), "");
    }
}
