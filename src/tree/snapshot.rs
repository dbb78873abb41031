//! Deep copies of a [`Tree`] for undo.
//!
//! A snapshot follows ownership only: every node carries its children by
//! value and no parent link. [`Snapshot::restore`] rebuilds the arena and
//! re-points each `child.parent` during a pre-order walk.

use super::model::{Color, Node, NodeId, NodeKind, Position, Tree};

#[derive(Debug, Clone, PartialEq)]
struct SnapshotNode {
    id: NodeId,
    text: String,
    kind: NodeKind,
    level: u32,
    position: Option<Position>,
    source_line: Option<usize>,
    raw_text: String,
    links: Vec<String>,
    color: Color,
    collapsed: bool,
    children: Vec<SnapshotNode>,
}

/// An owned copy of a whole tree, root included.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: SnapshotNode,
    slot_count: usize,
}

impl Snapshot {
    pub fn capture(tree: &Tree) -> Option<Self> {
        Some(Self {
            root: capture_node(tree, tree.root())?,
            slot_count: tree.slot_count(),
        })
    }

    /// Number of nodes held, root excluded.
    pub fn len(&self) -> usize {
        count(&self.root) - 1
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Rebuild a tree from this snapshot.
    ///
    /// `min_slots` keeps the id counter of the tree being replaced so ids
    /// handed out after the snapshot was taken are not reissued.
    pub fn restore(&self, min_slots: usize) -> Tree {
        let mut slots: Vec<Option<Node>> = Vec::new();
        slots.resize_with(self.slot_count.max(min_slots), || None);
        restore_node(&self.root, None, &mut slots);
        Tree::from_slots(slots)
    }
}

fn capture_node(tree: &Tree, id: NodeId) -> Option<SnapshotNode> {
    let node = tree.get(id)?;
    Some(SnapshotNode {
        id,
        text: node.text.clone(),
        kind: node.kind,
        level: node.level,
        position: node.position,
        source_line: node.source_line,
        raw_text: node.raw_text.clone(),
        links: node.links.clone(),
        color: node.color,
        collapsed: node.collapsed,
        children: node
            .children
            .iter()
            .filter_map(|&c| capture_node(tree, c))
            .collect(),
    })
}

fn restore_node(snap: &SnapshotNode, parent: Option<NodeId>, slots: &mut Vec<Option<Node>>) {
    let index = snap.id.index();
    if index >= slots.len() {
        slots.resize_with(index + 1, || None);
    }
    slots[index] = Some(Node {
        id: snap.id,
        text: snap.text.clone(),
        kind: snap.kind,
        level: snap.level,
        children: snap.children.iter().map(|c| c.id).collect(),
        parent,
        position: snap.position,
        source_line: snap.source_line,
        raw_text: snap.raw_text.clone(),
        links: snap.links.clone(),
        color: snap.color,
        collapsed: snap.collapsed,
    });
    for child in &snap.children {
        restore_node(child, Some(snap.id), slots);
    }
}

fn count(snap: &SnapshotNode) -> usize {
    1 + snap.children.iter().map(count).sum::<usize>()
}
