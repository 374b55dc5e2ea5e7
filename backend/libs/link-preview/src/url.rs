//! URL extraction from free text

use regex::Regex;
use std::sync::LazyLock;

/// `http://` or `https://` followed by one or more non-whitespace characters.
///
/// The match is purely syntactic: trailing prose punctuation such as `.` or
/// `)` stays part of the URL.
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("Invalid URL regex"));

/// Return the first URL in `text`, if any.
///
/// # Examples
/// ```
/// use link_preview::extract_first_url;
///
/// assert_eq!(
///     extract_first_url("see https://example.com/page and more"),
///     Some("https://example.com/page")
/// );
/// assert_eq!(extract_first_url("no links here"), None);
/// ```
pub fn extract_first_url(text: &str) -> Option<&str> {
    URL_REGEX.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_url_mid_sentence() {
        assert_eq!(
            extract_first_url("see https://example.com/page and more"),
            Some("https://example.com/page")
        );
    }

    #[test]
    fn test_extract_no_url() {
        assert_eq!(extract_first_url("no links here"), None);
        assert_eq!(extract_first_url(""), None);
    }

    #[test]
    fn test_extract_first_of_many() {
        let text = "http://a.example/1 then https://b.example/2";
        assert_eq!(extract_first_url(text), Some("http://a.example/1"));
    }

    #[test]
    fn test_extract_keeps_trailing_punctuation() {
        assert_eq!(
            extract_first_url("(read https://example.com/x)."),
            Some("https://example.com/x).")
        );
    }

    #[test]
    fn test_extract_requires_scheme_and_body() {
        assert_eq!(extract_first_url("ftp://example.com"), None);
        assert_eq!(extract_first_url("www.example.com"), None);
        assert_eq!(extract_first_url("just https:// alone"), None);
    }

    #[test]
    fn test_extract_inside_markdown_link() {
        assert_eq!(
            extract_first_url("[docs](https://example.com/docs)"),
            Some("https://example.com/docs)")
        );
    }

    #[test]
    fn test_extract_stops_at_newline() {
        assert_eq!(
            extract_first_url("https://example.com/a\nnext line"),
            Some("https://example.com/a")
        );
    }
}
