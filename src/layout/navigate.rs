use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Distance travelled along this direction (positive = forward) and the
    /// sideways offset, for a move by `(dx, dy)` in canvas coordinates.
    fn project(self, dx: f64, dy: f64) -> (f64, f64) {
        match self {
            Self::Up => (-dy, dx),
            Self::Down => (dy, dx),
            Self::Left => (-dx, dy),
            Self::Right => (dx, dy),
        }
    }
}

/// The visible, positioned node closest to `from` in `direction`.
///
/// Candidates must lie strictly ahead; sideways offset counts double so the
/// straightest neighbour wins over a nearer diagonal one.
pub fn nearest_in_direction(tree: &Tree, from: NodeId, direction: Direction) -> Option<NodeId> {
    let origin = tree.get(from)?.position?;

    tree.visible_nodes()
        .into_iter()
        .filter(|&id| id != from)
        .filter_map(|id| {
            let p = tree.get(id)?.position?;
            let (ahead, aside) = direction.project(p.x - origin.x, p.y - origin.y);
            (ahead > 0.0).then_some((id, ahead + 2.0 * aside.abs()))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}
