//! HTML parser for extracting links and visible text
//!
//! This module handles parsing HTML content to extract:
//! - Raw link targets, in document order and without deduplication
//! - The text a reader would see, without script/style content
//!
//! Parsing is best-effort. html5ever recovers from any markup, so a broken
//! page still yields whatever links and text it can, and plain text passes
//! through as its own visible text.

use scraper::{Html, Node, Selector};

/// Elements whose text content is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that carry link targets; `frame`/`iframe` use `src`, the rest `href`
const LINK_SELECTOR: &str = "a[href], area[href], frame[src], iframe[src]";

/// Links and text pulled out of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Raw link targets, unresolved
    pub links: Vec<String>,

    /// Visible text, whitespace-collapsed
    pub text: String,
}

/// Capability interface for turning page content into links and text
///
/// The engine only depends on this trait; tests swap in a fake that returns
/// fixed lists.
pub trait PageParser {
    /// Every link target on the page, in document order
    fn extract_links(&self, content: &str) -> Vec<String>;

    /// The page's visible text
    fn extract_visible_text(&self, content: &str) -> String;

    /// Both at once; implementations may override to parse only once
    fn parse(&self, content: &str) -> ParsedPage {
        ParsedPage {
            links: self.extract_links(content),
            text: self.extract_visible_text(content),
        }
    }
}

/// `PageParser` backed by scraper/html5ever
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for HtmlParser {
    fn extract_links(&self, content: &str) -> Vec<String> {
        extract_links(&Html::parse_document(content))
    }

    fn extract_visible_text(&self, content: &str) -> String {
        extract_visible_text(&Html::parse_document(content))
    }

    fn parse(&self, content: &str) -> ParsedPage {
        let document = Html::parse_document(content);
        ParsedPage {
            links: extract_links(&document),
            text: extract_visible_text(&document),
        }
    }
}

/// Collects link targets in document order
fn extract_links(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let attribute = match element.value().name() {
                "frame" | "iframe" => "src",
                _ => "href",
            };
            element.value().attr(attribute).map(str::to_string)
        })
        .collect()
}

/// Collects text nodes outside of hidden elements
fn extract_visible_text(document: &Html) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        words.extend(text.split_whitespace());
    }

    words.join(" ")
}
