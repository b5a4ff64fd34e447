//! Document linearization.
//!
//! Reduces a filing document to its non-empty text lines in reading order.
//! Plain-text filings (`.txt`) are split as they are; HTML filings lose their
//! non-content elements and then contribute one or more lines per text node.

use super::client::{Transport, fetch_once};
use crate::error::Result;
use log::info;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Elements whose whole subtree carries no document content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "meta", "link", "nav", "header", "footer"];

fn push_lines(text: &str, lines: &mut Vec<String>) {
    lines.extend(
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );
}

/// Split plain text into trimmed, non-empty lines.
pub fn linearize_text(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(text, &mut lines);
    lines
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_lines(text, lines),
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, lines);
                }
            }
            _ => {}
        }
    }
}

/// Extract the text lines of an HTML document.
///
/// Script, style, metadata, navigation, header and footer elements are
/// dropped with everything inside them. Every remaining text node starts a
/// new line, inline elements included: `<p>Item <b>2</b></p>` yields the
/// lines `"Item"` and `"2"`. Lines are never merged.
///
/// # Example
/// ```
/// use tenq_data::edgar::linearize_html;
///
/// let html = "<html><head><style>p { color: red }</style></head>\
///             <body><p>Item 1.</p><p>  Financial Statements </p></body></html>";
/// assert_eq!(linearize_html(html), vec!["Item 1.", "Financial Statements"]);
/// ```
pub fn linearize_html(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    collect_text(document.root_element(), &mut lines);
    lines
}

/// Whether `url` names a plain-text document.
fn is_plain_text(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_lowercase().ends_with(".txt")
}

/// Fetches documents and flattens them into lines.
#[derive(Debug, Clone)]
pub struct TextLinearizer<T> {
    transport: T,
}

impl<T: Transport> TextLinearizer<T> {
    /// Create a linearizer fetching through `transport`.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch `document_url` once and return its text lines.
    ///
    /// URLs ending in `.txt` are treated as plain text, everything else as
    /// HTML.
    ///
    /// # Errors
    /// `DataError::FetchError` on a transport failure or non-2xx status.
    pub async fn linearize(&self, document_url: &str) -> Result<Vec<String>> {
        let body = fetch_once(&self.transport, document_url).await?;
        let lines = if is_plain_text(document_url) {
            linearize_text(&body)
        } else {
            linearize_html(&body)
        };
        info!("Linearized {} into {} lines", document_url, lines.len());
        Ok(lines)
    }
}
