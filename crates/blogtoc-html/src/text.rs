//! Plain-text extraction from article HTML.

use scraper::{Html, Node};

/// Elements whose text never reaches the plain-text output.
const SKIPPED: &[&str] = &["img", "script", "style", "noscript", "template"];

/// Elements that separate words even when the markup has no whitespace.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Text content of a fragment with whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut raw = String::new();

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| SKIPPED.contains(&el.name()))
                });
                if !hidden {
                    raw.push_str(text);
                }
            }
            Node::Element(el) if BLOCKS.contains(&el.name()) => raw.push(' '),
            _ => {}
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `max_chars` characters of [`plain_text`].
pub fn excerpt(html: &str, max_chars: usize) -> String {
    plain_text(html).chars().take(max_chars).collect()
}
