use crate::config::DomainPolicy;
use url::Url;

/// File extensions that never lead to a documentation page
const NON_DOCUMENT_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "pdf", "css", "js", "mjs", "map",
    "zip", "gz", "tgz", "tar", "woff", "woff2", "ttf", "eot", "mp3", "mp4", "webm", "xml", "json",
    "txt", "csv", "wasm",
];

/// Checks whether `host` belongs to the same site as `seed_host`
///
/// With [`DomainPolicy::Exact`] the hosts must be equal. With
/// [`DomainPolicy::AllowSubdomains`] any subdomain of the seed host matches as well;
/// a leading `www.` on the seed host is ignored so `www.example.com` admits
/// `docs.example.com`.
///
/// # Examples
///
/// ```
/// use doc_atlas::config::DomainPolicy;
/// use doc_atlas::url::host_in_scope;
///
/// assert!(host_in_scope("example.com", "example.com", DomainPolicy::Exact));
/// assert!(!host_in_scope("example.com", "docs.example.com", DomainPolicy::Exact));
/// assert!(host_in_scope("example.com", "docs.example.com", DomainPolicy::AllowSubdomains));
/// assert!(!host_in_scope("example.com", "badexample.com", DomainPolicy::AllowSubdomains));
/// ```
pub fn host_in_scope(seed_host: &str, host: &str, policy: DomainPolicy) -> bool {
    let seed_host = seed_host.to_lowercase();
    let host = host.to_lowercase();

    match policy {
        DomainPolicy::Exact => host == seed_host,
        DomainPolicy::AllowSubdomains => {
            let base = seed_host.strip_prefix("www.").unwrap_or(&seed_host);
            host == seed_host || host == base || host.ends_with(&format!(".{}", base))
        }
    }
}

/// Checks whether a URL plausibly points at an HTML page
///
/// URLs whose last path segment carries a known asset or archive extension are
/// rejected before they reach the frontier.
pub fn is_document_link(url: &Url) -> bool {
    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }

    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match last.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            !NON_DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_policy() {
        assert!(host_in_scope("docs.example.com", "docs.example.com", DomainPolicy::Exact));
        assert!(host_in_scope("Docs.Example.com", "docs.example.COM", DomainPolicy::Exact));
        assert!(!host_in_scope("example.com", "www.example.com", DomainPolicy::Exact));
        assert!(!host_in_scope("example.com", "other.com", DomainPolicy::Exact));
    }

    #[test]
    fn test_subdomain_policy() {
        let policy = DomainPolicy::AllowSubdomains;
        assert!(host_in_scope("example.com", "example.com", policy));
        assert!(host_in_scope("example.com", "api.v2.example.com", policy));
        assert!(!host_in_scope("example.com", "example.org", policy));
        assert!(!host_in_scope("example.com", "notexample.com", policy));
    }

    #[test]
    fn test_subdomain_policy_with_www_seed() {
        let policy = DomainPolicy::AllowSubdomains;
        assert!(host_in_scope("www.example.com", "docs.example.com", policy));
        assert!(host_in_scope("www.example.com", "example.com", policy));
    }

    #[test]
    fn test_document_links() {
        let page = Url::parse("https://example.com/docs/intro").unwrap();
        let html = Url::parse("https://example.com/docs/intro.html").unwrap();
        let versioned = Url::parse("https://example.com/docs/v1.2").unwrap();
        assert!(is_document_link(&page));
        assert!(is_document_link(&html));
        assert!(is_document_link(&versioned));
    }

    #[test]
    fn test_asset_links_rejected() {
        for asset in [
            "https://example.com/logo.png",
            "https://example.com/static/app.JS",
            "https://example.com/manual.pdf",
            "https://example.com/release.zip",
        ] {
            let url = Url::parse(asset).unwrap();
            assert!(!is_document_link(&url), "{} should be rejected", asset);
        }
    }

    #[test]
    fn test_dotfile_is_document() {
        let url = Url::parse("https://example.com/.well-known").unwrap();
        assert!(is_document_link(&url));
    }
}
