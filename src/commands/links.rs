//! `mindmap links`: list wikilink targets and the nodes holding them.

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use mindmap::tree::Tree;

pub fn run(file: &Path) -> Result<()> {
    let tree = super::load_outline(file)?;
    let rows = collect_links(&tree);
    if rows.is_empty() {
        println!("  No links.");
        return Ok(());
    }
    for (target, holder) in rows {
        println!("  {} {} {}", target.cyan(), "<-".dark_grey(), holder);
    }
    Ok(())
}

/// `(target, node text)` pairs in outline order.
fn collect_links(tree: &Tree) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for id in tree.all_nodes() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        for target in &node.links {
            rows.push((target.clone(), node.text.clone()));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap::parser::outline;

    #[test]
    fn lists_targets_in_outline_order() {
        let tree = outline::parse("# Hub [[Index]]\n## plain\n- [[A]] and [[B|bee]]\n");
        assert_eq!(
            collect_links(&tree),
            vec![
                ("Index".to_string(), "Hub [[Index]]".to_string()),
                ("A".to_string(), "[[A]] and [[B|bee]]".to_string()),
                ("B".to_string(), "[[A]] and [[B|bee]]".to_string()),
            ]
        );
    }

    #[test]
    fn empty_when_no_links() {
        let tree = outline::parse("# Hub\n## plain\n");
        assert!(collect_links(&tree).is_empty());
    }
}
