use url::Url;

/// Turn raw user input into an absolute http(s) URL.
///
/// - Trims surrounding whitespace; empty input yields `None`
/// - Absolute http/https URLs are returned in canonical form (lowercased host)
/// - Bare domains (`example.com/video`) are retried with an `https://` prefix;
///   input that already carries a `scheme://` is not
/// - Scheme-relative input and any other scheme (`ftp://`, `mailto:`) yield `None`
pub fn normalize_input_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") {
        return None;
    }

    let parsed = match Url::parse(trimmed) {
        Ok(url) => url,
        // an explicit scheme that failed to parse is not retried
        Err(_) if has_scheme(trimmed) => return None,
        Err(_) => Url::parse(&format!("https://{trimmed}")).ok()?,
    };

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some_and(|h| !h.is_empty()) => {
            Some(parsed.to_string())
        }
        _ => None,
    }
}

fn has_scheme(input: &str) -> bool {
    input.split_once("://").is_some_and(|(scheme, _)| {
        let mut chars = scheme.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Pick the first http(s) URL out of free-form shared text.
///
/// Share targets usually deliver "Title https://…" rather than a bare link.
pub fn find_url_in_text(text: &str) -> Option<String> {
    normalize_input_url(text).or_else(|| {
        text.split_whitespace()
            .filter(|token| token.contains("://") || token.contains('.'))
            .find_map(normalize_input_url)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_valid_http_urls() {
        assert_eq!(
            normalize_input_url("https://example.com/watch?v=123").as_deref(),
            Some("https://example.com/watch?v=123")
        );
        assert_eq!(
            normalize_input_url("http://example.com/track").as_deref(),
            Some("http://example.com/track")
        );
        assert_eq!(
            normalize_input_url("  https://EXAMPLE.com/a  ").as_deref(),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn test_adds_https_for_bare_domains() {
        assert_eq!(
            normalize_input_url("example.com/video").as_deref(),
            Some("https://example.com/video")
        );
        assert_eq!(
            normalize_input_url("WWW.YOUTUBE.COM/watch?v=abc").as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );
    }

    #[test]
    fn test_rejects_other_schemes_and_garbage() {
        assert_eq!(normalize_input_url("ftp://example.com/file"), None);
        assert_eq!(normalize_input_url("//example.com/video"), None);
        assert_eq!(normalize_input_url("mailto:someone@example.com"), None);
        assert_eq!(normalize_input_url("not a url"), None);
        assert_eq!(normalize_input_url(""), None);
        assert_eq!(normalize_input_url("   \t "), None);
    }

    #[test]
    fn test_malformed_url_with_scheme_is_not_retried() {
        assert_eq!(normalize_input_url("https://exa mple.com"), None);
        assert_eq!(normalize_input_url("http://exa mple.com/video"), None);
        // a scheme-like string inside the query does not count
        assert_eq!(
            normalize_input_url("example.com/watch?next=https://other.com").as_deref(),
            Some("https://example.com/watch?next=https://other.com")
        );
    }

    #[test]
    fn test_find_url_in_shared_text() {
        assert_eq!(
            find_url_in_text("Look at this https://youtu.be/dQw4w9WgXcQ lol").as_deref(),
            Some("https://youtu.be/dQw4w9WgXcQ")
        );
        assert_eq!(find_url_in_text("nothing to see here"), None);
    }
}
