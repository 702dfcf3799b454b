//! HTML-to-document extraction
//!
//! [`extract`] turns one fetched HTML page into a [`NormalizedDocument`]:
//!
//! 1. Pick a content root (`main`, `article`, `[role=main]`, then `body`)
//! 2. Walk it, skipping navigation, footers, scripts and other boilerplate
//! 3. Record headings by level number and collect the remaining text as lines
//! 4. Collect outbound links from the whole page
//!
//! Extraction only fails on input that is empty or clearly not markup. Anything
//! html5ever can parse yields a best-effort document.

mod links;
mod noise;
mod text;

pub use links::extract_links;

use crate::state::PageState;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use thiserror::Error;
use url::Url;

/// Title used when a page has neither `<title>` nor `<h1>`
pub const UNTITLED: &str = "Untitled Document";

/// Share of control or replacement characters above which input is rejected
const MAX_GARBAGE_RATIO: f64 = 0.10;

/// Errors that make a page impossible to extract
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("document is empty")]
    Empty,

    #[error("document is corrupt: {reason}")]
    Corrupt { reason: String },
}

/// A heading in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `<h1>` through 6 for `<h6>`
    pub level: u8,

    /// Whitespace-normalized heading text
    pub text: String,

    /// Character offset into `body_text` where this heading's section starts
    pub offset: usize,

    /// Index of the closest preceding heading with a lower level
    pub parent: Option<usize>,
}

/// How the page behind a document was fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStatus {
    pub state: PageState,
    pub http_status: Option<u16>,
    pub content_type: Option<String>,
}

impl Default for FetchStatus {
    fn default() -> Self {
        Self {
            state: PageState::Processed,
            http_status: None,
            content_type: None,
        }
    }
}

/// The cleaned, structured representation of a single fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// Canonical URL after redirects
    pub url: Url,

    pub title: String,

    /// Headings in document order; nesting comes from `level` alone
    pub headings: Vec<Heading>,

    /// Content text, one block per line, whitespace collapsed within lines
    pub body_text: String,

    /// Absolute, fragment-free links found on the page
    pub outbound_links: BTreeSet<Url>,

    pub fetch_status: FetchStatus,
}

impl NormalizedDocument {
    /// Attaches the HTTP status and content type of the response
    pub fn with_fetch_status(mut self, http_status: u16, content_type: &str) -> Self {
        self.fetch_status = FetchStatus {
            state: PageState::Processed,
            http_status: Some(http_status),
            content_type: Some(content_type.to_string()).filter(|c| !c.is_empty()),
        };
        self
    }

    /// Number of characters in `body_text`
    pub fn body_len(&self) -> usize {
        self.body_text.chars().count()
    }

    /// Returns the body text of one heading's section
    ///
    /// A section runs from the heading's offset to the next heading at the same
    /// or a higher level (or the end of the body). Nested subsections are
    /// included.
    pub fn section_text(&self, index: usize) -> &str {
        let Some(heading) = self.headings.get(index) else {
            return "";
        };

        let end = self.headings[index + 1..]
            .iter()
            .find(|h| h.level <= heading.level)
            .map_or_else(|| self.body_len(), |h| h.offset);

        char_slice(&self.body_text, heading.offset, end).trim()
    }

    /// Indices of the headings that have no parent
    pub fn top_level_headings(&self) -> Vec<usize> {
        self.headings
            .iter()
            .enumerate()
            .filter(|(_, h)| h.parent.is_none())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Slices `s` by character positions, clamping to the string length
fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let byte_at = |pos: usize| {
        s.char_indices()
            .nth(pos)
            .map_or(s.len(), |(byte, _)| byte)
    };
    let (start, end) = (byte_at(start), byte_at(end));
    if start >= end {
        ""
    } else {
        &s[start..end]
    }
}

/// Extracts a normalized document from raw response bytes
///
/// Invalid UTF-8 is replaced rather than rejected; heavily damaged input is
/// then caught by the corruption check.
pub fn extract_bytes(body: &[u8], base_url: &Url) -> Result<NormalizedDocument, ExtractError> {
    let html = String::from_utf8_lossy(body);
    extract(&html, base_url)
}

/// Extracts a normalized document from an HTML string
///
/// # Example
///
/// ```
/// use doc_atlas::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>Guide</title></head>
///   <body><nav><a href="/">Home</a></nav>
///   <main><h1>Setup</h1><p>Install the tool.</p><a href="next">Next</a></main></body></html>"#;
/// let base = Url::parse("https://example.com/docs/setup").unwrap();
/// let doc = extract(html, &base).unwrap();
///
/// assert_eq!(doc.title, "Guide");
/// assert_eq!(doc.body_text, "Install the tool.\nNext");
/// assert_eq!(doc.headings[0].text, "Setup");
/// assert_eq!(doc.outbound_links.len(), 2);
/// ```
pub fn extract(html: &str, base_url: &Url) -> Result<NormalizedDocument, ExtractError> {
    check_input(html)?;

    let document = Html::parse_document(html);
    let content = text::collect_content(&document);
    let title = extract_title(&document);
    let outbound_links = extract_links(&document, base_url);

    Ok(NormalizedDocument {
        url: base_url.clone(),
        title,
        headings: content.headings,
        body_text: content.body,
        outbound_links,
        fetch_status: FetchStatus::default(),
    })
}

/// Rejects input that cannot be a markup document
fn check_input(html: &str) -> Result<(), ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    if html.contains('\0') {
        return Err(ExtractError::Corrupt {
            reason: "contains NUL bytes".to_string(),
        });
    }

    let total = html.chars().count();
    let garbage = html
        .chars()
        .filter(|c| *c == char::REPLACEMENT_CHARACTER || (c.is_control() && !c.is_whitespace()))
        .count();

    if garbage as f64 / total as f64 > MAX_GARBAGE_RATIO {
        return Err(ExtractError::Corrupt {
            reason: format!("{} of {} characters are binary or invalid", garbage, total),
        });
    }

    Ok(())
}

/// Title from `<title>`, else the first `<h1>`, else [`UNTITLED`]
fn extract_title(document: &Html) -> String {
    ["title", "h1"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .map(|el| text::collapse_whitespace(&el.text().collect::<String>()))
                .find(|t| !t.is_empty())
        })
        .unwrap_or_else(|| UNTITLED.to_string())
}
