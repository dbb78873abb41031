//! Wikilink extraction: `[[target]]` and `[[target|alias]]`.
//!
//! Extraction only records targets. Node text keeps the full bracketed span.

/// One `[[...]]` span found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    /// The span exactly as written, brackets included.
    pub raw: String,
    pub target: String,
    pub alias: Option<String>,
}

/// Locate every wikilink span in `text`, left to right.
///
/// Unterminated `[[` and spans with an empty target are skipped.
pub fn extract_links(text: &str) -> Vec<WikiLink> {
    let mut links = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("[[") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("]]") else {
            break;
        };
        let inner = &after_open[..close];
        let (target, alias) = match inner.split_once('|') {
            Some((t, a)) => (t.trim(), Some(a.trim().to_string())),
            None => (inner.trim(), None),
        };
        if !target.is_empty() {
            links.push(WikiLink {
                raw: format!("[[{}]]", inner),
                target: target.to_string(),
                alias,
            });
        }
        rest = &after_open[close + 2..];
    }

    links
}

/// Distinct link targets of `text` in order of first appearance.
pub fn link_targets(text: &str) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for link in extract_links(text) {
        if !targets.contains(&link.target) {
            targets.push(link.target);
        }
    }
    targets
}
