//! `mindmap show`: print the outline as an indented tree.

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use mindmap::tree::{Color, NodeKind, Tree};

pub fn run(file: &Path) -> Result<()> {
    let tree = super::load_outline(file)?;
    for line in render_tree(&tree) {
        println!("  {}", line);
    }
    println!(
        "  {} {} nodes",
        "Total".cyan().bold(),
        tree.len().to_string().cyan()
    );
    Ok(())
}

/// One plain-text line per node, pre-order, indented by tree depth.
///
/// Collapsed nodes are marked `[+]`; their descendants are still listed.
fn render_tree(tree: &Tree) -> Vec<String> {
    let mut lines = Vec::new();
    for id in tree.all_nodes() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let indent = "  ".repeat(tree.depth(id).saturating_sub(1));
        let marker = if node.collapsed { "[+] " } else { "" };
        let kind = match node.kind {
            NodeKind::Header => format!("h{}", node.level),
            NodeKind::ListItem => format!("li{}", node.level),
        };
        let mut line = format!("{indent}{marker}{} ({kind})", node.text);
        if node.color != Color::Default {
            line.push_str(&format!(" {{{}}}", node.color.as_str()));
        }
        if node.has_links() {
            line.push_str(&format!(" -> {}", node.links.join(", ")));
        }
        lines.push(line);
    }
    lines
}
