use percent_encoding::percent_decode_str;
use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_atlas::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the non-empty path segments of a URL, in order
///
/// Segments are percent-decoded; invalid UTF-8 is replaced lossily.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_atlas::url::path_segments;
///
/// let url = Url::parse("https://example.com/docs/guide/setup.html").unwrap();
/// assert_eq!(path_segments(&url), vec!["docs", "guide", "setup.html"]);
/// ```
pub fn path_segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_root_has_no_segments() {
        let url = Url::parse("https://example.com/").unwrap();
        assert!(path_segments(&url).is_empty());
    }

    #[test]
    fn test_trailing_slash_ignored() {
        let url = Url::parse("https://example.com/docs/").unwrap();
        assert_eq!(path_segments(&url), vec!["docs"]);
    }

    #[test]
    fn test_query_not_part_of_segments() {
        let url = Url::parse("https://example.com/api/users?page=2").unwrap();
        assert_eq!(path_segments(&url), vec!["api", "users"]);
    }

    #[test]
    fn test_segments_percent_decoded() {
        let url = Url::parse("https://example.com/user%20guide/caf%C3%A9").unwrap();
        assert_eq!(path_segments(&url), vec!["user guide", "café"]);
    }
}
