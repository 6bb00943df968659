//! Heading annotation: anchors every `h2`/`h3`/`h4` and prepends a table of
//! contents block.
//!
//! The output keeps the input structure and only adds two things:
//!
//! - a `<div class="toc"><ul>…</ul></div>` block placed right before the first
//!   `h2` (or before the first annotated heading when there is no `h2`);
//! - a `<span id="N">` around the content of every annotated heading, where
//!   `N` is the heading's position among all annotated headings.
//!
//! A fragment without any `h2`/`h3`/`h4` is returned byte-for-byte unchanged.

use ego_tree::NodeId;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::{
    ElementRef, Html, Node, Selector,
    node::{Element, Text},
};
use thiserror::Error;
use tracing::{debug, trace};

use blogtoc_core::{TocEntry, config::TocConfig};

/// Headings that receive anchors and TOC entries.
pub const HEADING_SELECTOR: &str = "h2, h3, h4";

/// Class of the inserted navigation container.
pub const TOC_CLASS: &str = "toc";

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Annotation errors.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The parser reported errors and strict mode is on.
    #[error("unparseable HTML: {0}")]
    Unparseable(String),

    /// A built-in selector failed to compile.
    #[error("invalid selector `{selector}`: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },

    /// A collected heading disappeared from the working tree.
    #[error("heading node {0} is no longer part of the document")]
    MissingNode(usize),
}

/// Result type for annotation.
pub type Result<T> = std::result::Result<T, AnnotateError>;

/// Annotated HTML plus the headings it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    /// Rewritten fragment.
    pub html: String,

    /// One entry per annotated heading, in document order.
    pub headings: Vec<TocEntry>,
}

/// A heading found during one pass.
#[derive(Debug)]
struct HeadingRecord {
    index: usize,
    level: u8,
    text: String,
    node: NodeId,
}

/// Rewrites article bodies with heading anchors and a TOC block.
///
/// Holds configuration only, so one instance can serve any number of
/// threads.
#[derive(Debug, Clone, Default)]
pub struct HeadingAnnotator {
    anchor_prefix: String,
    strict: bool,
}

impl HeadingAnnotator {
    /// Annotator producing bare integer anchors and tolerating parse errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotator configured from the `[toc]` section.
    #[must_use]
    pub fn from_config(config: &TocConfig) -> Self {
        Self::new()
            .with_anchor_prefix(&config.anchor_prefix)
            .with_strict(config.strict)
    }

    /// Prefix every anchor id, e.g. `toc-0` instead of `0`.
    #[must_use]
    pub fn with_anchor_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.anchor_prefix = prefix.into();
        self
    }

    /// Fail on any parser-reported error instead of accepting its recovery.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Anchor id for the heading at `index`.
    pub fn anchor_id(&self, index: usize) -> String {
        format!("{}{index}", self.anchor_prefix)
    }

    /// Annotate a fragment and return the rewritten HTML.
    pub fn annotate(&self, html: &str) -> Result<String> {
        self.annotate_document(html).map(|annotated| annotated.html)
    }

    /// Annotate a fragment and also return the TOC entries that were linked.
    pub fn annotate_document(&self, html: &str) -> Result<Annotated> {
        let mut document = Html::parse_fragment(html);

        if self.strict && !document.errors.is_empty() {
            return Err(AnnotateError::Unparseable(document.errors.join("; ")));
        }

        let headings = collect_headings(&document)?;
        let Some((anchor_index, anchor_node)) = headings
            .iter()
            .find(|h| h.level == 2)
            .or_else(|| headings.first())
            .map(|h| (h.index, h.node))
        else {
            debug!("no h2/h3/h4 headings, leaving body untouched");
            return Ok(Annotated {
                html: html.to_string(),
                headings: Vec::new(),
            });
        };

        for heading in &headings {
            self.wrap_contents(&mut document, heading)?;
        }

        let toc = self.build_toc(&mut document, &headings);
        document
            .tree
            .get_mut(anchor_node)
            .ok_or(AnnotateError::MissingNode(anchor_index))?
            .insert_id_before(toc);

        debug!(headings = headings.len(), "annotated headings");

        let entries = headings
            .into_iter()
            .map(|h| TocEntry::new(h.level, h.text, self.anchor_id(h.index)))
            .collect();

        Ok(Annotated {
            html: document.root_element().inner_html(),
            headings: entries,
        })
    }

    /// Move all children of the heading into a fresh anchor span.
    fn wrap_contents(&self, document: &mut Html, heading: &HeadingRecord) -> Result<()> {
        let id = self.anchor_id(heading.index);
        trace!(index = heading.index, level = heading.level, %id, "wrapping heading");

        let span = document.tree.orphan(element("span", &[("id", id.as_str())])).id();
        document
            .tree
            .get_mut(span)
            .ok_or(AnnotateError::MissingNode(heading.index))?
            .reparent_from_id_append(heading.node);
        document
            .tree
            .get_mut(heading.node)
            .ok_or(AnnotateError::MissingNode(heading.index))?
            .append_id(span);

        Ok(())
    }

    /// Build the detached `div.toc > ul > li > a` block.
    fn build_toc(&self, document: &mut Html, headings: &[HeadingRecord]) -> NodeId {
        let mut container = document
            .tree
            .orphan(element("div", &[("class", TOC_CLASS)]));
        let mut list = container.append(element("ul", &[]));

        for heading in headings {
            let href = format!("#{}", self.anchor_id(heading.index));
            list.append(element("li", &[]))
                .append(element("a", &[("href", href.as_str())]))
                .append(Node::Text(Text {
                    text: heading.text.as_str().into(),
                }));
        }

        container.id()
    }
}

/// Annotate with default settings.
pub fn annotate(html: &str) -> Result<String> {
    HeadingAnnotator::new().annotate(html)
}

/// Every `h2`/`h3`/`h4` in document order, numbered with one shared counter.
/// Headings inside an inert `<template>` are not rendered and are skipped.
fn collect_headings(document: &Html) -> Result<Vec<HeadingRecord>> {
    let selector = Selector::parse(HEADING_SELECTOR).map_err(|e| AnnotateError::Selector {
        selector: HEADING_SELECTOR,
        message: e.to_string(),
    })?;

    let headings = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| selector.matches(el) && !in_template(el))
        .enumerate()
        .map(|(index, el)| HeadingRecord {
            index,
            level: heading_level(el.value().name()),
            text: el.text().collect(),
            node: el.id(),
        })
        .collect();

    Ok(headings)
}

fn in_template(el: &ElementRef<'_>) -> bool {
    el.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|ancestor| ancestor.name() == "template")
    })
}

fn heading_level(name: &str) -> u8 {
    name.strip_prefix('h')
        .and_then(|n| n.parse().ok())
        .unwrap_or_default()
}

fn element(name: &str, attrs: &[(&str, &str)]) -> Node {
    let attributes = attrs
        .iter()
        .map(|(key, value)| Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(*key)),
            value: (*value).into(),
        })
        .collect();

    Node::Element(Element::new(
        QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(name)),
        attributes,
    ))
}
