//! Turning URL path segments into module names and titles

/// Longest suffix treated as a file extension
const MAX_EXTENSION_LEN: usize = 5;

/// Segment names that stand for the directory they sit in
const INDEX_NAMES: &[&str] = &["index", "default", "readme"];

/// Strips a file extension from a path segment
///
/// Only short alphabetic suffixes count as extensions, so `setup.html`
/// becomes `setup` while `v1.2` and `node.js-guide` are kept as they are.
pub fn strip_extension(segment: &str) -> &str {
    match segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            stem
        }
        _ => segment,
    }
}

/// Cleans raw path segments into grouping keys
///
/// Extensions are stripped and a trailing index segment is dropped, so
/// `/docs/index.html`, `/docs/` and `/docs` all map to `["docs"]`.
pub fn clean_segments(segments: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = segments
        .iter()
        .map(|s| strip_extension(s).to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if cleaned
        .last()
        .is_some_and(|last| INDEX_NAMES.contains(&last.to_ascii_lowercase().as_str()))
    {
        cleaned.pop();
    }

    cleaned
}

/// Turns a slug such as `getting-started` into `Getting Started`
pub fn humanize(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c == '/' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Turns heading text into a lowercase, hyphen-separated name
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}
