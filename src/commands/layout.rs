//! `mindmap layout`: print computed canvas positions.

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use mindmap::layout::{self, LayoutParams};
use mindmap::tree::Tree;

pub fn run(file: &Path, params: &LayoutParams) -> Result<()> {
    let mut tree = super::load_outline(file)?;
    layout::layout(&mut tree, params);

    for row in position_rows(&tree) {
        println!("  {}", row);
    }
    match layout::bounds(&tree) {
        Some(b) => println!(
            "  {} {:.1},{:.1} .. {:.1},{:.1}",
            "Bounds".cyan().bold(),
            b.min_x,
            b.min_y,
            b.max_x,
            b.max_y
        ),
        None => println!("  {}", "No visible nodes.".dark_grey()),
    }
    Ok(())
}

/// `x y text` per positioned node, pre-order. Hidden nodes are skipped.
fn position_rows(tree: &Tree) -> Vec<String> {
    tree.all_nodes()
        .into_iter()
        .filter_map(|id| tree.get(id))
        .filter_map(|node| {
            node.position
                .map(|p| format!("{:.1} {:.1} {}", p.x, p.y, node.text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap::parser::outline;

    #[test]
    fn rows_follow_outline_order_with_sides() {
        let mut tree = outline::parse("# Hub\n## R\n## L\n");
        layout::layout(&mut tree, &LayoutParams::default());
        assert_eq!(
            position_rows(&tree),
            vec![
                "600.0 400.0 Hub".to_string(),
                "820.0 400.0 R".to_string(),
                "380.0 400.0 L".to_string(),
            ]
        );
    }

    #[test]
    fn collapsed_descendants_have_no_row() {
        let mut tree = outline::parse("# Hub\n## R\n- hidden\n");
        let r = tree.find_path("Hub/R").unwrap();
        tree.get_mut(r).unwrap().collapsed = true;
        layout::layout(&mut tree, &LayoutParams::default());

        let rows = position_rows(&tree);
        assert_eq!(rows.len(), 2);
        assert!(!rows.iter().any(|r| r.ends_with("hidden")));
    }
}
