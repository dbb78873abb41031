//! Horizontal dual-sided tree layout.
//!
//! The center node sits at a fixed origin. Its children (main branches) are
//! split between the right side (first `ceil(n / 2)`) and the left side, and
//! every subtree grows away from the center on its branch's side.
//!
//! Vertical space is reserved bottom-up with [`subtree_height`] and consumed
//! top-down, so sibling subtrees never overlap. One pass, O(n).

use tracing::debug;

use crate::tree::{NodeId, Position, Tree};

/// Geometry knobs. Usually built from [`crate::parser::config::Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub center_x: f64,
    pub center_y: f64,
    /// Horizontal offset of main branches from the center.
    pub branch_offset: f64,
    pub level_spacing: f64,
    pub level_spacing_step: f64,
    pub level_spacing_min: f64,
    pub slot_height: f64,
    pub slot_height_step: f64,
    pub slot_height_min: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        crate::parser::config::Config::default().layout_params()
    }
}

impl LayoutParams {
    /// Minimal vertical slot of a node at `depth` (center = 0).
    pub fn slot_at(&self, depth: usize) -> f64 {
        (self.slot_height - depth as f64 * self.slot_height_step).max(self.slot_height_min)
    }

    /// Horizontal distance from a node at `depth - 1` to its child at `depth`.
    pub fn spacing_at(&self, depth: usize) -> f64 {
        if depth <= 1 {
            return self.branch_offset;
        }
        (self.level_spacing - (depth - 2) as f64 * self.level_spacing_step)
            .max(self.level_spacing_min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Vertical space reserved for `id` and its visible descendants.
///
/// Leaves and collapsed nodes get the depth's minimal slot; other nodes the
/// sum of their children's heights, never less than that slot.
pub fn subtree_height(tree: &Tree, id: NodeId, depth: usize, params: &LayoutParams) -> f64 {
    let slot = params.slot_at(depth);
    let Some(node) = tree.get(id) else {
        return slot;
    };
    if node.collapsed || node.children.is_empty() {
        return slot;
    }
    let sum: f64 = node
        .children
        .iter()
        .map(|&c| subtree_height(tree, c, depth + 1, params))
        .sum();
    sum.max(slot)
}

/// Assign a position to every visible node; hidden nodes lose theirs.
pub fn layout(tree: &mut Tree, params: &LayoutParams) {
    for id in tree.all_nodes() {
        if let Some(node) = tree.get_mut(id) {
            node.position = None;
        }
    }

    let tops: Vec<NodeId> = tree.children(NodeId::ROOT).to_vec();
    let mut origin_y = params.center_y;
    let mut prev_half: Option<f64> = None;
    let mut placed = 0usize;

    for top in tops {
        let half = centered_half_extent(tree, top, params);
        if let Some(prev) = prev_half {
            origin_y += prev + params.slot_at(0) + half;
        }
        placed += place_center(tree, top, Position::new(params.center_x, origin_y), params);
        prev_half = Some(half);
    }

    debug!(placed, "layout complete");
}

/// Half of the taller side's reserved height around a center node.
fn centered_half_extent(tree: &Tree, center: NodeId, params: &LayoutParams) -> f64 {
    let (right, left) = split_branches(tree, center);
    let side_height = |branches: &[NodeId]| -> f64 {
        branches
            .iter()
            .map(|&b| subtree_height(tree, b, 1, params))
            .sum()
    };
    let collapsed = tree.get(center).map(|n| n.collapsed).unwrap_or(false);
    if collapsed {
        return params.slot_at(0) / 2.0;
    }
    (side_height(&right).max(side_height(&left)) / 2.0).max(params.slot_at(0) / 2.0)
}

fn split_branches(tree: &Tree, center: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
    let branches = tree.children(center);
    let right_count = branches.len().div_ceil(2);
    (
        branches[..right_count].to_vec(),
        branches[right_count..].to_vec(),
    )
}

fn place_center(tree: &mut Tree, center: NodeId, at: Position, params: &LayoutParams) -> usize {
    let Some(node) = tree.get_mut(center) else {
        return 0;
    };
    node.position = Some(at);
    if node.collapsed {
        return 1;
    }

    let (right, left) = split_branches(tree, center);
    1 + place_stack(tree, &right, at, 1, Side::Right, params)
        + place_stack(tree, &left, at, 1, Side::Left, params)
}

/// Stack `children` vertically around `anchor.y`, each consuming exactly its
/// reserved height, then recurse.
fn place_stack(
    tree: &mut Tree,
    children: &[NodeId],
    anchor: Position,
    depth: usize,
    side: Side,
    params: &LayoutParams,
) -> usize {
    let heights: Vec<f64> = children
        .iter()
        .map(|&c| subtree_height(tree, c, depth, params))
        .collect();
    let total: f64 = heights.iter().sum();
    let x = anchor.x + side.sign() * params.spacing_at(depth);

    let mut top = anchor.y - total / 2.0;
    let mut placed = 0;
    for (&child, &height) in children.iter().zip(&heights) {
        let at = Position::new(x, top + height / 2.0);
        top += height;

        let Some(node) = tree.get_mut(child) else {
            continue;
        };
        node.position = Some(at);
        placed += 1;
        if node.collapsed {
            continue;
        }
        let grandchildren = node.children.clone();
        placed += place_stack(tree, &grandchildren, at, depth + 1, side, params);
    }
    placed
}

/// Axis-aligned box around every positioned node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

pub fn bounds(tree: &Tree) -> Option<Bounds> {
    tree.all_nodes()
        .into_iter()
        .filter_map(|id| tree.get(id).and_then(|n| n.position))
        .fold(None, |acc: Option<Bounds>, p| {
            Some(match acc {
                None => Bounds {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::outline;

    const EPS: f64 = 1e-9;

    fn pos(tree: &Tree, path: &str) -> Position {
        let id = tree.find_path(path).unwrap();
        tree.get(id).unwrap().position.unwrap()
    }

    /// Sibling reserved extents must stack without overlapping, for every
    /// group of siblings that share a side.
    fn assert_no_sibling_overlap(tree: &Tree, params: &LayoutParams) {
        for parent in std::iter::once(NodeId::ROOT).chain(tree.visible_nodes()) {
            if parent != NodeId::ROOT && tree.get(parent).unwrap().collapsed {
                continue;
            }
            let groups: Vec<Vec<NodeId>> = if parent == NodeId::ROOT {
                vec![]
            } else if tree.parent(parent) == Some(NodeId::ROOT) {
                let (r, l) = split_branches(tree, parent);
                vec![r, l]
            } else {
                vec![tree.children(parent).to_vec()]
            };
            for group in groups {
                for pair in group.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    let depth = tree.depth(a) - 1;
                    let ha = subtree_height(tree, a, depth, params) / 2.0;
                    let hb = subtree_height(tree, b, depth, params) / 2.0;
                    let ya = tree.get(a).unwrap().position.unwrap().y;
                    let yb = tree.get(b).unwrap().position.unwrap().y;
                    assert!(ya + ha <= yb - hb + EPS, "overlap between {a} and {b}");
                }
            }
        }
    }

    #[test]
    fn center_is_pinned_to_origin() {
        let mut tree = outline::parse("# Hub\n");
        let params = LayoutParams::default();
        layout(&mut tree, &params);
        assert_eq!(pos(&tree, "Hub"), Position::new(600.0, 400.0));
    }

    #[test]
    fn branches_split_right_then_left() {
        let mut tree = outline::parse("# Hub\n## a\n## b\n## c\n");
        let params = LayoutParams::default();
        layout(&mut tree, &params);
        let (a, b, c) = (pos(&tree, "Hub/a"), pos(&tree, "Hub/b"), pos(&tree, "Hub/c"));
        assert_eq!(a.x, 600.0 + params.branch_offset);
        assert_eq!(b.x, 600.0 + params.branch_offset);
        assert_eq!(c.x, 600.0 - params.branch_offset);
        assert!(a.y < b.y);
        // A single branch on a side sits level with the center.
        assert!((c.y - 400.0).abs() < EPS);
    }

    #[test]
    fn equal_branches_are_evenly_spaced() {
        let mut tree = outline::parse("# Hub\n## a\n## b\n## c\n## d\n## e\n## f\n");
        let params = LayoutParams::default();
        layout(&mut tree, &params);
        let ys: Vec<f64> = ["a", "b", "c"]
            .iter()
            .map(|n| pos(&tree, &format!("Hub/{n}")).y)
            .collect();
        assert!(((ys[1] - ys[0]) - (ys[2] - ys[1])).abs() < EPS);
        assert!((ys[1] - 400.0).abs() < EPS);
    }

    #[test]
    fn descendants_follow_their_branch_side() {
        let mut tree = outline::parse("# Hub\n## r\n- r1\n\t- r2\n## l\n- l1\n");
        let params = LayoutParams::default();
        layout(&mut tree, &params);
        let r = pos(&tree, "Hub/r");
        let r1 = pos(&tree, "Hub/r/r1");
        let r2 = pos(&tree, "Hub/r/r1/r2");
        let l = pos(&tree, "Hub/l");
        let l1 = pos(&tree, "Hub/l/l1");
        assert!(r.x < r1.x && r1.x < r2.x);
        assert!(l.x > l1.x);
        assert_eq!(r1.x - r.x, params.spacing_at(2));
        assert_eq!(l.x - l1.x, params.spacing_at(2));
    }

    #[test]
    fn spacing_and_slots_shrink_to_floor() {
        let params = LayoutParams::default();
        assert!(params.spacing_at(3) < params.spacing_at(2));
        assert_eq!(params.spacing_at(50), params.level_spacing_min);
        assert!(params.slot_at(2) < params.slot_at(1));
        assert_eq!(params.slot_at(50), params.slot_height_min);
    }

    #[test]
    fn subtree_height_sums_children() {
        let tree = outline::parse("# Hub\n## a\n- x\n- y\n- z\n## b\n");
        let params = LayoutParams::default();
        let a = tree.find_path("Hub/a").unwrap();
        let b = tree.find_path("Hub/b").unwrap();
        assert_eq!(subtree_height(&tree, b, 1, &params), params.slot_at(1));
        assert!((subtree_height(&tree, a, 1, &params) - 3.0 * params.slot_at(2)).abs() < EPS);
    }

    #[test]
    fn collapsed_subtree_reserves_single_slot_and_hides_children() {
        let mut tree = outline::parse("# Hub\n## a\n- x\n- y\n- z\n");
        let params = LayoutParams::default();
        let a = tree.find_path("Hub/a").unwrap();
        tree.get_mut(a).unwrap().collapsed = true;
        layout(&mut tree, &params);

        assert_eq!(subtree_height(&tree, a, 1, &params), params.slot_at(1));
        assert!(tree.get(a).unwrap().position.is_some());
        let x = tree.find_path("Hub/a/x").unwrap();
        assert_eq!(tree.get(x).unwrap().position, None);
    }

    #[test]
    fn no_sibling_overlap_on_irregular_tree() {
        let input = "\
# Hub
## one
- a
\t- a1
\t- a2
\t\t- a2x
\t\t- a2y
- b
## two
## three
- c
\t- c1
\t- c2
\t- c3
\t- c4
## four
- d
## five
";
        let mut tree = outline::parse(input);
        let params = LayoutParams::default();
        layout(&mut tree, &params);
        assert_no_sibling_overlap(&tree, &params);

        let c = tree.find_path("Hub/three/c").unwrap();
        tree.get_mut(c).unwrap().collapsed = true;
        layout(&mut tree, &params);
        assert_no_sibling_overlap(&tree, &params);
    }

    #[test]
    fn extra_top_level_nodes_stack_below_center() {
        let mut tree = outline::parse("# Hub\n## a\n# Other\n## b\n");
        let params = LayoutParams::default();
        layout(&mut tree, &params);
        let hub = pos(&tree, "Hub");
        let other = pos(&tree, "Other");
        assert_eq!(other.x, hub.x);
        assert!(other.y > hub.y);
        // Reserved blocks do not touch.
        assert!(other.y - hub.y >= params.slot_at(1) + params.slot_at(0) - EPS);
    }

    #[test]
    fn bounds_cover_all_positions() {
        let mut tree = outline::parse("# Hub\n## a\n## b\n");
        assert_eq!(bounds(&tree), None);
        layout(&mut tree, &LayoutParams::default());
        let b = bounds(&tree).unwrap();
        assert!(b.min_x < 600.0 && b.max_x > 600.0);
    }
}
