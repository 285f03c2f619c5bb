//! Paragraph text extraction from fetched HTML.
//!
//! Article pages vary wildly, but nearly all of them put the story body in
//! `<p>` elements. We keep the text of every non-empty paragraph, in
//! document order, separated by a blank line.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Extract visible paragraph text from an HTML document.
///
/// Returns `None` when the page has no non-empty paragraph.
#[instrument(level = "debug", skip_all, fields(bytes = html.len()))]
pub fn extract(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let paragraphs: Vec<String> = document
        .select(&PARAGRAPH)
        .map(|p| {
            let raw = p.text().collect::<String>();
            WHITESPACE.replace_all(raw.trim(), " ").into_owned()
        })
        .filter(|text| !text.is_empty())
        .collect();

    debug!(paragraphs = paragraphs.len(), "Extracted paragraphs");
    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

/// Strip markup from an HTML fragment such as a feed item description.
pub fn plain_text(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    let raw = html.root_element().text().collect::<String>();
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}
