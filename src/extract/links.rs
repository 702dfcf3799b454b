use crate::url::canonicalize_url;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Schemes that never lead to another page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Extracts all followable links from the HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, including navigation, since
///   site menus are how most documentation pages are reached
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links (same-page anchors)
/// - Anything that does not resolve to an http(s) URL
///
/// Relative links resolve against `<base href>` when present, else against
/// `base_url`. Results are canonicalized, so `/a/` and `/a#x` dedupe to `/a`.
pub fn extract_links(document: &Html, base_url: &Url) -> BTreeSet<Url> {
    let base = document_base(document, base_url);
    let mut links = BTreeSet::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, &base))
        {
            links.insert(url);
        }
    }

    links
}

/// Honors `<base href>` when it resolves to an absolute http(s) URL
fn document_base(document: &Html, base_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| base_url.join(href.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or_else(|| base_url.clone())
}

/// Resolves a link href to an absolute canonical URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    let absolute = base.join(href).ok()?;
    canonicalize_url(absolute.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(html: &str) -> Vec<String> {
        let base = Url::parse("https://example.com/docs/guide/").unwrap();
        extract_links(&Html::parse_document(html), &base)
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_relative_and_absolute() {
        let found = links(
            r#"<a href="setup">S</a><a href="/api">A</a><a href="https://other.org/x">O</a>"#,
        );
        assert_eq!(
            found,
            vec![
                "https://example.com/api",
                "https://example.com/docs/guide/setup",
                "https://other.org/x",
            ]
        );
    }

    #[test]
    fn test_navigation_links_included() {
        let found = links(r#"<nav><a href="/docs/intro">Intro</a></nav>"#);
        assert_eq!(found, vec!["https://example.com/docs/intro"]);
    }

    #[test]
    fn test_duplicates_and_fragments_collapse() {
        let found = links(
            r##"<a href="/a">1</a><a href="/a/">2</a><a href="/a#part">3</a><a href="#top">4</a>"##,
        );
        assert_eq!(found, vec!["https://example.com/a"]);
    }

    #[test]
    fn test_special_schemes_skipped() {
        let found = links(
            r#"<a href="javascript:void(0)">j</a><a href="MAILTO:a@b.c">m</a>
               <a href="tel:123">t</a><a href="data:text/html,hi">d</a><a href="ftp://x.org/">f</a>"#,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_download_links_skipped() {
        let found = links(r#"<a href="/file" download>f</a><a href="/page">p</a>"#);
        assert_eq!(found, vec!["https://example.com/page"]);
    }

    #[test]
    fn test_base_href() {
        let found = links(r#"<head><base href="/v2/"></head><body><a href="intro">i</a></body>"#);
        assert_eq!(found, vec!["https://example.com/v2/intro"]);
    }
}
