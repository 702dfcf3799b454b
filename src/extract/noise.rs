use scraper::ElementRef;

/// Tags that never hold page content
const NOISE_TAGS: &[&str] = &[
    "nav", "footer", "aside", "script", "style", "noscript", "iframe", "template", "svg",
    "canvas", "button", "select", "dialog",
];

/// Tags whose text is never prose
const SCRIPT_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

const NOISE_ROLES: &[&str] = &[
    "navigation", "banner", "contentinfo", "complementary", "search", "menu", "menubar",
];

/// Class and id words that mark boilerplate containers; a token matches when
/// it equals the word or contains it as a hyphen/underscore separated part
const NOISE_WORDS: &[&str] = &[
    "sidebar", "menu", "navbar", "navigation", "nav", "toc", "breadcrumb", "breadcrumbs",
    "footer", "cookie", "cookies", "consent", "banner", "ad", "ads", "advert", "advertisement",
    "sponsored", "social", "share", "skip", "pagination", "pager", "edit-page", "feedback",
];

/// Returns true for elements removed before text extraction
///
/// `<header>` only counts as noise when the content root is `<body>`; inside
/// `<main>` or `<article>` it usually holds the page title.
pub(super) fn is_noise(element: &ElementRef<'_>, root_is_body: bool) -> bool {
    let el = element.value();
    let name = el.name();

    if NOISE_TAGS.contains(&name) || (root_is_body && name == "header") {
        return true;
    }

    if el.attr("hidden").is_some()
        || el
            .attr("aria-hidden")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    {
        return true;
    }

    if el
        .attr("role")
        .is_some_and(|role| NOISE_ROLES.contains(&role.trim().to_ascii_lowercase().as_str()))
    {
        return true;
    }

    el.classes().any(is_noise_token) || el.id().is_some_and(is_noise_token)
}

/// Returns true for tags whose contents are metadata, code or styling
pub(super) fn is_script_like(name: &str) -> bool {
    SCRIPT_TAGS.contains(&name)
}

fn is_noise_token(token: &str) -> bool {
    let token = token.to_ascii_lowercase();
    if NOISE_WORDS.contains(&token.as_str()) {
        return true;
    }

    token
        .split(|c| c == '-' || c == '_')
        .any(|part| NOISE_WORDS.contains(&part))
}
