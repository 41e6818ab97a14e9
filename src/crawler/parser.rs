//! HTML link extraction
//!
//! Only anchor tags are inspected. For every `<a>` in document order the
//! value of its first `href` attribute is returned exactly as written (after
//! entity decoding); anchors without an `href` are skipped. Resolution and
//! filtering happen later, in the frontier.

use scraper::{Html, Selector};

/// Extracts the raw `href` values of all anchor tags in the document
///
/// The parser is error tolerant: malformed markup never fails the call, it
/// only limits what can be recovered.
///
/// # Example
///
/// ```
/// use sumi_branch::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/page">Link</a><a>none</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["/page".to_string()]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}
