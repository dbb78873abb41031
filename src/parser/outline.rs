//! Parser and writer for outline documents.
//!
//! Recognised lines are ATX headers (`#` .. `######`) and `- ` bullets,
//! optionally indented with tabs or spaces. Everything else is skipped.
//! Levels are recomputed from scratch on every parse, so
//! `parse(serialize(tree))` reproduces the shape of any tree whose headers
//! precede its list items among siblings.

use tracing::debug;

use super::links;
use crate::tree::{LIST_BASE_LEVEL, MAX_HEADER_LEVEL, NodeId, NodeKind, Tree};

/// Written to empty documents on first load.
pub const DEFAULT_OUTLINE: &str = "# Central Topic\n## Branch 1\n## Branch 2\n## Branch 3\n";

/// Width of one indent step; a tab counts as one full step.
const INDENT_WIDTH: usize = 4;

/// A classified outline line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineLine<'a> {
    /// `level` is the number of `#` characters (1..=6).
    Header { level: u32, text: &'a str },
    /// `indent` is the number of whole indent steps before the bullet.
    ListItem { indent: u32, text: &'a str },
}

impl OutlineLine<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Header { .. } => NodeKind::Header,
            Self::ListItem { .. } => NodeKind::ListItem,
        }
    }

    /// The level used for parent search: headers 1..=6, list items 7+.
    pub fn level(&self) -> u32 {
        match self {
            Self::Header { level, .. } => *level,
            Self::ListItem { indent, .. } => indent + LIST_BASE_LEVEL,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Header { text, .. } | Self::ListItem { text, .. } => text,
        }
    }
}

/// Classify one line (without its terminator). `None` for lines to skip.
pub fn classify_line(raw: &str) -> Option<OutlineLine<'_>> {
    let raw = raw.strip_suffix('\r').unwrap_or(raw);
    if raw.trim().is_empty() {
        return None;
    }
    if raw.starts_with('#') {
        return classify_header(raw);
    }
    classify_list_item(raw)
}

fn classify_header(raw: &str) -> Option<OutlineLine<'_>> {
    let hashes = raw.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > MAX_HEADER_LEVEL as usize {
        return None;
    }
    let rest = &raw[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some(OutlineLine::Header {
        level: hashes as u32,
        text,
    })
}

fn classify_list_item(raw: &str) -> Option<OutlineLine<'_>> {
    let body = raw.trim_start();
    let indent_width: usize = raw[..raw.len() - body.len()]
        .chars()
        .map(|c| if c == '\t' { INDENT_WIDTH } else { 1 })
        .sum();
    let rest = body.strip_prefix('-')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some(OutlineLine::ListItem {
        indent: (indent_width / INDENT_WIDTH) as u32,
        text,
    })
}

/// Parse outline text into a tree.
///
/// Parents are found with a stack of open ancestors seeded with the root:
/// the nearest entry with a strictly smaller level adopts the new node, then
/// every entry at the same or a deeper level is closed.
pub fn parse(input: &str) -> Tree {
    let mut tree = Tree::new();
    let mut open: Vec<(NodeId, u32)> = vec![(NodeId::ROOT, 0)];
    let mut skipped = 0usize;

    for (line_num, raw) in input.split('\n').enumerate() {
        let Some(line) = classify_line(raw) else {
            if !raw.trim().is_empty() {
                skipped += 1;
            }
            continue;
        };

        let level = line.level();
        let parent = open
            .iter()
            .rev()
            .find(|&&(_, l)| l < level)
            .map(|&(id, _)| id)
            .unwrap_or(NodeId::ROOT);

        let id = tree.alloc(line.text().to_string(), line.kind(), level);
        if let Some(node) = tree.get_mut(id) {
            node.source_line = Some(line_num);
            node.raw_text = raw.strip_suffix('\r').unwrap_or(raw).to_string();
            node.links = links::link_targets(&node.text);
        }
        tree.attach(parent, id);

        while open.len() > 1 && open.last().map(|&(_, l)| l >= level).unwrap_or(false) {
            open.pop();
        }
        open.push((id, level));
    }

    debug!(nodes = tree.len(), skipped, "parsed outline");
    tree
}

/// Parse `input`, substituting [`DEFAULT_OUTLINE`] when the text is blank.
///
/// The flag is `true` when the default structure was synthesised and should
/// be written back. Non-blank text without outline lines yields a bare root.
pub fn parse_or_default(input: &str) -> (Tree, bool) {
    if input.trim().is_empty() {
        (parse(DEFAULT_OUTLINE), true)
    } else {
        (parse(input), false)
    }
}

/// Serialise a tree back to outline text.
///
/// Pre-order, root excluded. Collapsed nodes still write their descendants:
/// collapse is view state only. Wikilink spans are written as stored.
pub fn serialize(tree: &Tree) -> String {
    let mut out = String::new();
    for id in tree.all_nodes() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        match node.kind {
            NodeKind::Header => {
                let level = node.level.clamp(1, MAX_HEADER_LEVEL) as usize;
                out.push_str(&"#".repeat(level));
                out.push(' ');
            }
            NodeKind::ListItem => {
                let indent = node.level.saturating_sub(LIST_BASE_LEVEL) as usize;
                out.push_str(&"\t".repeat(indent));
                out.push_str("- ");
            }
        }
        out.push_str(&restore_links(&node.text));
        out.push('\n');
    }
    out
}

/// Passthrough: link spans are never rewritten on save.
fn restore_links(text: &str) -> std::borrow::Cow<'_, str> {
    std::borrow::Cow::Borrowed(text)
}
