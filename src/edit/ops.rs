//! Structural edits on a [`Tree`].
//!
//! Each operation checks its preconditions before touching the tree, so an
//! `Err` always leaves the tree exactly as it was. None of them re-run the
//! layout; positions are stale until the caller does.

use tracing::{debug, info};

use super::error::EditError;
use crate::parser::links;
use crate::tree::{Color, NodeId, Tree};

/// Outcome of [`delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deleted {
    /// Parent the node was removed from.
    pub parent: NodeId,
    /// Nodes freed, the deleted node included.
    pub removed: usize,
}

/// Append a new node under `parent`, one level deeper.
///
/// The child is a header while the parent is the root or a header above
/// level 6, otherwise a list item.
pub fn add_child(tree: &mut Tree, parent: NodeId, text: &str) -> Result<NodeId, EditError> {
    if !tree.contains(parent) {
        return Err(EditError::UnknownNode(parent));
    }
    let (kind, level) = tree.child_shape(parent);
    let id = tree.alloc(text.to_string(), kind, level);
    if let Some(node) = tree.get_mut(id) {
        node.links = links::link_targets(text);
    }
    tree.attach(parent, id);
    info!(%id, %parent, ?kind, level, "added node");
    Ok(id)
}

/// Remove `id` and its whole subtree. Orphans are not promoted.
pub fn delete(tree: &mut Tree, id: NodeId) -> Result<Deleted, EditError> {
    let parent = check_delete(tree, id)?;
    let removed = tree.remove_subtree(id);
    info!(%id, %parent, removed, "deleted subtree");
    Ok(Deleted { parent, removed })
}

/// Move `id` to the end of `target`'s children.
///
/// Rejected when `target` is `id` itself or one of its descendants. The
/// moved subtree's kinds and levels are re-derived from its new position.
pub fn reparent(tree: &mut Tree, id: NodeId, target: NodeId) -> Result<(), EditError> {
    check_reparent(tree, id, target)?;
    tree.detach(id);
    tree.attach(target, id);
    tree.rederive_levels(id);
    info!(%id, %target, "re-parented node");
    Ok(())
}

/// Validate a [`delete`] without performing it. Returns the parent.
pub fn check_delete(tree: &Tree, id: NodeId) -> Result<NodeId, EditError> {
    if id == NodeId::ROOT {
        return Err(EditError::RootProtected);
    }
    if !tree.contains(id) {
        return Err(EditError::UnknownNode(id));
    }
    tree.parent(id).ok_or(EditError::RootProtected)
}

/// Validate a [`reparent`] without performing it.
///
/// The cycle guard walks the target's ancestor chain looking for `id`.
pub fn check_reparent(tree: &Tree, id: NodeId, target: NodeId) -> Result<(), EditError> {
    if id == NodeId::ROOT {
        return Err(EditError::RootProtected);
    }
    for node in [id, target] {
        if !tree.contains(node) {
            return Err(EditError::UnknownNode(node));
        }
    }
    if tree.is_ancestor_or_self(id, target) {
        return Err(EditError::Cycle { node: id, target });
    }
    if tree.parent(id).is_none() {
        return Err(EditError::RootProtected);
    }
    Ok(())
}

/// Flip the collapse flag. `Ok(false)` for leaves, which have nothing to hide.
pub fn toggle_collapse(tree: &mut Tree, id: NodeId) -> Result<bool, EditError> {
    let node = tree.get_mut(id).ok_or(EditError::UnknownNode(id))?;
    if node.children.is_empty() {
        debug!(%id, "collapse ignored on leaf");
        return Ok(false);
    }
    node.collapsed = !node.collapsed;
    debug!(%id, collapsed = node.collapsed, "toggled collapse");
    Ok(true)
}

pub fn recolor(tree: &mut Tree, id: NodeId, color: Color) -> Result<(), EditError> {
    let node = tree.get_mut(id).ok_or(EditError::UnknownNode(id))?;
    node.color = color;
    Ok(())
}

/// Replace a node's text and re-extract its link targets.
pub fn rename(tree: &mut Tree, id: NodeId, text: &str) -> Result<(), EditError> {
    if id == NodeId::ROOT {
        return Err(EditError::RootProtected);
    }
    let node = tree.get_mut(id).ok_or(EditError::UnknownNode(id))?;
    node.text = text.to_string();
    node.links = links::link_targets(text);
    Ok(())
}
