//! HTML text extraction helpers.

use scraper::{ElementRef, Html, Node, Selector};

/// Tags whose text contributes to the body excerpt.
const CONTENT_TAGS: &str = "h1, h2, h3, p, div";

/// Elements whose text never reaches the excerpt, even inside a content tag.
const SKIPPED_TAGS: [&str; 8] = [
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside",
];

/// Text fields pulled from one HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub title: String,
    pub description: String,
    pub content: String,
}

/// Parse `html` once and extract the title, meta description and body excerpt.
///
/// Entities are decoded by the parser. Malformed markup is repaired the way a
/// browser would repair it before any text is read.
#[must_use]
pub fn extract_page_text(html: &str, max_chars: usize) -> PageText {
    let document = Html::parse_document(html);
    PageText {
        title: title(&document),
        description: meta_description(&document),
        content: body_text(&document, max_chars),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn title(document: &Html) -> String {
    let Some(sel) = selector("title") else {
        return String::new();
    };
    document
        .select(&sel)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

fn meta_description(document: &Html) -> String {
    let Some(sel) = selector("meta[name][content]") else {
        return String::new();
    };
    document
        .select(&sel)
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .unwrap_or_default()
}

/// Text of every outermost content tag, in document order, truncated to
/// `max_chars` characters. Nested content tags contribute their text once.
fn body_text(document: &Html, max_chars: usize) -> String {
    let Some(sel) = selector(CONTENT_TAGS) else {
        return String::new();
    };
    let mut pieces: Vec<String> = Vec::new();
    for element in document.select(&sel) {
        if has_content_ancestor(element) || has_skipped_ancestor(element) {
            continue;
        }
        collect_text(element, &mut pieces);
    }
    truncate_chars(&pieces.join(" "), max_chars)
}

fn is_content_tag(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "p" | "div")
}

fn has_content_ancestor(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_content_tag(ancestor.value().name()))
}

fn has_skipped_ancestor(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| SKIPPED_TAGS.contains(&ancestor.value().name()))
}

fn collect_text(element: ElementRef<'_>, pieces: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let cleaned = collapse_whitespace(text);
                if !cleaned.is_empty() {
                    pieces.push(cleaned);
                }
            }
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, pieces);
                }
            }
            _ => {}
        }
    }
}

/// Collapse runs of whitespace, including non-breaking spaces, to one space.
#[must_use]
pub fn collapse_whitespace(input: &str) -> String {
    input
        .split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}
