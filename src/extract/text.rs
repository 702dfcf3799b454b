use super::noise::{is_noise, is_script_like};
use super::Heading;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Candidate content roots, most specific first
const CONTENT_ROOTS: &[&str] = &["main", "article", "[role=main]", "body"];

/// Elements that start a new line of body text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "li", "main", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "td", "th", "thead", "tr", "ul", "br", "hr", "header", "caption",
];

/// Text and headings collected from a page
#[derive(Debug, Default)]
pub(super) struct Content {
    pub body: String,
    pub headings: Vec<Heading>,
}

/// Collects body text and headings from the best content root
///
/// When the filtered walk finds nothing, the whole document is walked again
/// with only script-like elements removed.
pub(super) fn collect_content(document: &Html) -> Content {
    let root = select_content_root(document);
    let root_is_body = root.map_or(true, |r| r.value().name() == "body");

    let mut walker = Walker::new(Filter::Boilerplate { root_is_body });
    if let Some(root) = root {
        walker.walk(root);
    }
    let content = walker.finish();

    if !content.body.is_empty() || !content.headings.is_empty() {
        return content;
    }

    let mut walker = Walker::new(Filter::ScriptsOnly);
    walker.walk(document.root_element());
    walker.finish()
}

fn select_content_root(document: &Html) -> Option<ElementRef<'_>> {
    CONTENT_ROOTS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| document.select(&selector).next())
}

/// Collapses every run of whitespace to a single space and trims
pub(super) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Filter {
    Boilerplate { root_is_body: bool },
    ScriptsOnly,
}

impl Filter {
    fn skips(&self, element: &ElementRef<'_>) -> bool {
        match self {
            Self::Boilerplate { root_is_body } => is_noise(element, *root_is_body),
            Self::ScriptsOnly => is_script_like(element.value().name()),
        }
    }
}

/// Pending work for the walk; deep nesting grows this stack, never the call
/// stack
enum Step<'a> {
    Enter(ElementRef<'a>),
    Text(&'a str),
    Flush,
}

/// Pushes children in reverse so they pop in document order
fn push_children<'a>(stack: &mut Vec<Step<'a>>, element: ElementRef<'a>) {
    for child in element.children().rev() {
        match child.value() {
            Node::Text(text) => stack.push(Step::Text(text)),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    stack.push(Step::Enter(child));
                }
            }
            _ => {}
        }
    }
}

struct Walker {
    filter: Filter,
    lines: Vec<String>,
    /// Characters in `lines` joined by newlines
    body_chars: usize,
    current: String,
    headings: Vec<Heading>,
    /// (level, index) of open headings, innermost last
    open: Vec<(u8, usize)>,
}

impl Walker {
    fn new(filter: Filter) -> Self {
        Self {
            filter,
            lines: Vec::new(),
            body_chars: 0,
            current: String::new(),
            headings: Vec::new(),
            open: Vec::new(),
        }
    }

    fn walk(&mut self, root: ElementRef<'_>) {
        let mut stack = Vec::new();
        push_children(&mut stack, root);

        while let Some(step) = stack.pop() {
            let element = match step {
                Step::Text(text) => {
                    self.current.push_str(text);
                    continue;
                }
                Step::Flush => {
                    self.flush();
                    continue;
                }
                Step::Enter(element) => element,
            };

            if self.filter.skips(&element) {
                continue;
            }

            let name = element.value().name();
            if let Some(level) = heading_level(name) {
                self.flush();
                let text = collapse_whitespace(&element.text().collect::<String>());
                if !text.is_empty() {
                    self.push_heading(level, text);
                }
                continue;
            }

            if BLOCK_TAGS.contains(&name) {
                self.flush();
                stack.push(Step::Flush);
            }
            push_children(&mut stack, element);
        }
    }

    fn push_heading(&mut self, level: u8, text: String) {
        while self.open.last().is_some_and(|(open, _)| *open >= level) {
            self.open.pop();
        }

        let offset = if self.lines.is_empty() {
            0
        } else {
            self.body_chars + 1
        };

        let index = self.headings.len();
        self.headings.push(Heading {
            level,
            text,
            offset,
            parent: self.open.last().map(|(_, idx)| *idx),
        });
        self.open.push((level, index));
    }

    fn flush(&mut self) {
        let line = collapse_whitespace(&self.current);
        self.current.clear();
        if line.is_empty() {
            return;
        }

        if !self.lines.is_empty() {
            self.body_chars += 1;
        }
        self.body_chars += line.chars().count();
        self.lines.push(line);
    }

    fn finish(mut self) -> Content {
        self.flush();
        let body = self.lines.join("\n");
        let len = self.body_chars;
        for heading in &mut self.headings {
            heading.offset = heading.offset.min(len);
        }

        Content {
            body,
            headings: self.headings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(html: &str) -> Content {
        collect_content(&Html::parse_document(html))
    }

    #[test]
    fn test_prefers_main() {
        let c = content(
            "<body><div>Outside text</div><main><p>Inside main.</p></main></body>",
        );
        assert_eq!(c.body, "Inside main.");
    }

    #[test]
    fn test_article_when_no_main() {
        let c = content("<body><div>Chrome</div><article><p>Article body.</p></article></body>");
        assert_eq!(c.body, "Article body.");
    }

    #[test]
    fn test_role_main() {
        let c = content(r#"<body><div>Chrome</div><div role="main"><p>Role body.</p></div></body>"#);
        assert_eq!(c.body, "Role body.");
    }

    #[test]
    fn test_inline_elements_join_without_spaces() {
        let c = content("<body><p>Call <code>run()</code> on the <em>client</em>.</p></body>");
        assert_eq!(c.body, "Call run() on the client.");
    }

    #[test]
    fn test_blocks_become_lines() {
        let c = content("<body><ul><li>One</li><li>Two</li></ul><p>Three<br>Four</p></body>");
        assert_eq!(c.body, "One\nTwo\nThree\nFour");
    }

    #[test]
    fn test_headings_excluded_from_body() {
        let c = content("<body><h1>Title</h1><p>Text.</p></body>");
        assert_eq!(c.body, "Text.");
        assert_eq!(c.headings[0].text, "Title");
        assert_eq!(c.headings[0].offset, 0);
    }

    #[test]
    fn test_heading_parents_follow_levels() {
        // An h4 right after h2 nests under it; DOM depth is ignored
        let c = content(
            "<body><h2>A</h2><section><div><h4>A.1</h4></div></section><h3>A.2</h3><h2>B</h2><h1>C</h1></body>",
        );
        let parents: Vec<_> = c.headings.iter().map(|h| h.parent).collect();
        assert_eq!(parents, vec![None, Some(0), Some(0), None, None]);
    }

    #[test]
    fn test_heading_offsets_point_at_section_text() {
        let c = content("<body><p>Lead.</p><h2>Next</h2><p>After.</p></body>");
        assert_eq!(c.body, "Lead.\nAfter.");
        let offset = c.headings[0].offset;
        assert_eq!(&c.body[offset..], "After.");
    }

    #[test]
    fn test_trailing_heading_offset_clamped() {
        let c = content("<body><p>Only.</p><h2>Empty section</h2></body>");
        assert_eq!(c.headings[0].offset, c.body.len());
    }

    #[test]
    fn test_empty_heading_skipped() {
        let c = content("<body><h2>  </h2><p>Text.</p></body>");
        assert!(c.headings.is_empty());
    }

    #[test]
    fn test_fallback_when_everything_is_noise() {
        let c = content(
            "<body><nav><p>Only navigation text.</p></nav><script>var x = 1;</script></body>",
        );
        assert_eq!(c.body, "Only navigation text.");
    }

    #[test]
    fn test_deep_nesting_on_small_stack() {
        let depth = 10_000;
        let html = format!(
            "<body>{}<p>Deep text.</p>{}</body>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );

        let body = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || content(&html).body)
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(body, "Deep text.");
    }

    #[test]
    fn test_noise_subtree_skipped_but_siblings_kept() {
        let c = content("<body><div><nav><p>Menu</p></nav><p>Kept.</p></div><p>After.</p></body>");
        assert_eq!(c.body, "Kept.\nAfter.");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
