use crate::parsers::text::normalize_whitespace;
use crate::parsers::{Anchor, ParseResult};
use scraper::{Html, Node, Selector};
use std::sync::LazyLock;

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("static selector is valid"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector is valid"));

/// Elements whose text is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses HTML content to extract visible text and anchors.
///
/// The parser is error-tolerant: malformed markup yields whatever text and
/// links html5ever recovers, never an error.
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);

    let content = visible_text(&doc);
    let links = anchors(&doc);

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).map(|a| &a.href).collect::<Vec<_>>()
        );
    }

    ParseResult::new(content, links)
}

/// Lowercased body text with script/style content removed
pub fn visible_text(doc: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for body in doc.select(&BODY) {
        for node in body.descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                parts.push(&**text);
            }
        }
    }

    normalize_whitespace(&parts.join(" ")).to_lowercase()
}

/// Every `<a href>` in document order
pub fn anchors(doc: &Html) -> Vec<Anchor> {
    doc.select(&ANCHOR)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            let text = normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "));
            Some(Anchor {
                href: href.to_string(),
                text: text.to_lowercase(),
            })
        })
        .collect()
}
