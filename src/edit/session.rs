//! Interactive editing state around one outline tree.
//!
//! A [`Session`] owns the tree together with everything the host UI drives:
//! the selection, the single in-progress text edit, the undo history and an
//! in-flight drag. Mutations never re-run the layout themselves; they mark it
//! stale and the host calls [`Session::relayout`].

use std::time::Instant;

use tracing::{debug, info, warn};

use super::error::EditError;
use super::history::History;
use super::ops::{self, Deleted};
use super::timing::HoverConfirm;
use crate::layout::{self, Direction, LayoutParams};
use crate::parser::config::Config;
use crate::parser::outline;
use crate::tree::{Color, NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEdit {
    node: NodeId,
    buffer: String,
}

#[derive(Debug)]
pub struct Session {
    tree: Tree,
    selected: Option<NodeId>,
    editing: Option<PendingEdit>,
    history: History,
    placeholder: String,
    layout_stale: bool,
    /// Bumped on every change that affects the saved text.
    revision: u64,
    saved_revision: u64,
    dragging: Option<NodeId>,
    hover: HoverConfirm,
}

impl Session {
    pub fn new(tree: Tree, config: &Config) -> Self {
        let selected = tree.center();
        Self {
            tree,
            selected,
            editing: None,
            history: History::new(config.history_limit),
            placeholder: config.placeholder.clone(),
            layout_stale: true,
            revision: 0,
            saved_revision: 0,
            dragging: None,
            hover: HoverConfirm::new(config.drag_hover_delay()),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    pub fn serialize(&self) -> String {
        outline::serialize(&self.tree)
    }

    // -----------------------------------------------------------------------
    // Layout and save bookkeeping
    // -----------------------------------------------------------------------

    pub fn is_layout_stale(&self) -> bool {
        self.layout_stale
    }

    pub fn relayout(&mut self, params: &LayoutParams) {
        layout::layout(&mut self.tree, params);
        self.layout_stale = false;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Record that the text for `revision` reached disk.
    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = revision;
    }

    fn changed(&mut self, structure: bool) {
        self.revision += 1;
        if structure {
            self.layout_stale = true;
        }
    }

    // -----------------------------------------------------------------------
    // Selection and navigation
    // -----------------------------------------------------------------------

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn select(&mut self, id: NodeId) -> Result<(), EditError> {
        if id == NodeId::ROOT || !self.tree.contains(id) {
            return Err(EditError::UnknownNode(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Move the selection to the nearest node in `direction`.
    /// Returns `false` when nothing lies that way.
    pub fn navigate(&mut self, direction: Direction) -> Result<bool, EditError> {
        let from = self.selected.ok_or(EditError::NoTarget)?;
        match layout::nearest_in_direction(&self.tree, from, direction) {
            Some(next) => {
                self.selected = Some(next);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn target(&self) -> Result<NodeId, EditError> {
        let id = self.selected.ok_or(EditError::NoTarget)?;
        if self.tree.contains(id) {
            Ok(id)
        } else {
            Err(EditError::NoTarget)
        }
    }

    // -----------------------------------------------------------------------
    // Structural edits (each records an undo snapshot first)
    // -----------------------------------------------------------------------

    /// Add a placeholder child under the selection and select it.
    pub fn add_child(&mut self) -> Result<NodeId, EditError> {
        let parent = self.target().inspect_err(|e| warn!(%e, "add child rejected"))?;
        self.history.record(&self.tree);
        let id = ops::add_child(&mut self.tree, parent, &self.placeholder)?;
        self.selected = Some(id);
        self.changed(true);
        Ok(id)
    }

    /// Delete the selection with its subtree. The selection moves to the
    /// former parent, or to the center when that parent is the root.
    pub fn delete_selected(&mut self) -> Result<Deleted, EditError> {
        let id = self.target()?;
        ops::check_delete(&self.tree, id).inspect_err(|e| warn!(%e, "delete rejected"))?;
        if let Some(edit) = &self.editing {
            if self.tree.is_ancestor_or_self(id, edit.node) {
                self.editing = None;
            }
        }
        self.history.record(&self.tree);
        let deleted = ops::delete(&mut self.tree, id)?;
        self.selected = if deleted.parent == NodeId::ROOT {
            self.tree.center()
        } else {
            Some(deleted.parent)
        };
        self.changed(true);
        Ok(deleted)
    }

    /// Re-parent `node` under `target` (drop of a drag).
    pub fn move_node(&mut self, node: NodeId, target: NodeId) -> Result<(), EditError> {
        ops::check_reparent(&self.tree, node, target)
            .inspect_err(|e| warn!(%e, "move rejected"))?;
        self.history.record(&self.tree);
        ops::reparent(&mut self.tree, node, target)?;
        self.changed(true);
        Ok(())
    }

    /// Undo the last structural edit.
    pub fn undo(&mut self) -> Result<(), EditError> {
        let restored = self
            .history
            .undo(&self.tree)
            .ok_or(EditError::NothingToUndo)?;
        self.tree = restored;
        self.editing = None;
        self.dragging = None;
        self.hover.cancel();
        if !self.selected.is_some_and(|id| self.tree.contains(id)) {
            self.selected = self.tree.center();
        }
        self.changed(true);
        info!(remaining = self.history.len(), "undo");
        Ok(())
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    // -----------------------------------------------------------------------
    // View-state edits (no undo snapshot)
    // -----------------------------------------------------------------------

    /// Collapse or expand the selection. `Ok(false)` on leaves.
    pub fn toggle_collapse(&mut self) -> Result<bool, EditError> {
        let id = self.target()?;
        let toggled = ops::toggle_collapse(&mut self.tree, id)?;
        if toggled {
            self.layout_stale = true;
        }
        Ok(toggled)
    }

    /// Recolor the selection. Does not affect the layout.
    pub fn recolor(&mut self, color: Color) -> Result<(), EditError> {
        let id = self.target()?;
        ops::recolor(&mut self.tree, id, color)
    }

    // -----------------------------------------------------------------------
    // Text editing: Idle -> Editing -> Idle
    // -----------------------------------------------------------------------

    /// Node currently being edited and its pending text.
    pub fn editing(&self) -> Option<(NodeId, &str)> {
        self.editing
            .as_ref()
            .map(|e| (e.node, e.buffer.as_str()))
    }

    /// Start editing the selection. Only one node may be edited at a time.
    pub fn begin_edit(&mut self) -> Result<(), EditError> {
        if let Some(edit) = &self.editing {
            return Err(EditError::EditInProgress(edit.node));
        }
        let id = self.target()?;
        let buffer = self
            .tree
            .get(id)
            .map(|n| n.text.clone())
            .ok_or(EditError::UnknownNode(id))?;
        self.editing = Some(PendingEdit { node: id, buffer });
        debug!(%id, "editing started");
        Ok(())
    }

    pub fn update_edit(&mut self, text: &str) -> Result<(), EditError> {
        let edit = self.editing.as_mut().ok_or(EditError::NotEditing)?;
        edit.buffer = text.to_string();
        Ok(())
    }

    /// Write the pending text back, trimmed; empty text becomes the
    /// placeholder.
    pub fn commit_edit(&mut self) -> Result<NodeId, EditError> {
        let edit = self.editing.take().ok_or(EditError::NotEditing)?;
        let trimmed = edit.buffer.trim();
        let text = if trimmed.is_empty() {
            self.placeholder.as_str()
        } else {
            trimmed
        };
        ops::rename(&mut self.tree, edit.node, text)?;
        self.revision += 1;
        debug!(id = %edit.node, "edit committed");
        Ok(edit.node)
    }

    pub fn cancel_edit(&mut self) -> Result<(), EditError> {
        self.editing.take().ok_or(EditError::NotEditing)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Drag to re-parent
    // -----------------------------------------------------------------------

    pub fn begin_drag(&mut self, node: NodeId) -> Result<(), EditError> {
        if node == NodeId::ROOT {
            return Err(EditError::RootProtected);
        }
        if !self.tree.contains(node) {
            return Err(EditError::UnknownNode(node));
        }
        self.dragging = Some(node);
        self.hover.cancel();
        Ok(())
    }

    pub fn dragging(&self) -> Option<NodeId> {
        self.dragging
    }

    /// The pointer is over `target` while dragging.
    pub fn drag_hover(&mut self, target: NodeId, now: Instant) {
        if self.dragging.is_some() {
            self.hover.hover(target, now);
        }
    }

    /// The pointer left the hovered target.
    pub fn drag_leave(&mut self) {
        self.hover.cancel();
    }

    /// The drag ended without a confirmed target.
    pub fn drag_end(&mut self) {
        self.dragging = None;
        self.hover.cancel();
    }

    /// Re-parent the dragged node once the hover delay has elapsed.
    /// `None` while nothing is confirmed yet.
    pub fn poll_drag(&mut self, now: Instant) -> Option<Result<(), EditError>> {
        let node = self.dragging?;
        let target = self.hover.poll(now)?;
        self.dragging = None;
        Some(self.move_node(node, target))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn session(input: &str) -> Session {
        Session::new(outline::parse(input), &Config::default())
    }

    fn find(s: &Session, path: &str) -> NodeId {
        s.tree().find_path(path).unwrap()
    }

    #[test]
    fn starts_with_center_selected_and_stale_layout() {
        let mut s = session("# A\n## B\n");
        assert_eq!(s.selected(), Some(find(&s, "A")));
        assert!(s.is_layout_stale());
        s.relayout(&LayoutParams::default());
        assert!(!s.is_layout_stale());
    }

    #[test]
    fn add_child_without_selection_reports_no_target() {
        let mut s = session("# A\n");
        s.clear_selection();
        assert_eq!(s.add_child(), Err(EditError::NoTarget));
        assert_eq!(s.undo_depth(), 0);
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn add_child_selects_new_placeholder_node() {
        let mut s = session("# A\n");
        s.relayout(&LayoutParams::default());
        let id = s.add_child().unwrap();
        assert_eq!(s.selected(), Some(id));
        assert_eq!(s.tree().get(id).unwrap().text, "New node");
        assert!(s.is_layout_stale());
        assert!(s.is_dirty());
        assert_eq!(s.serialize(), "# A\n## New node\n");
    }

    #[test]
    fn delete_moves_selection_to_former_parent() {
        let mut s = session("# A\n## B\n- C\n- D\n## E\n");
        let before = s.tree().all_nodes().len();
        s.select(find(&s, "A/B")).unwrap();

        let deleted = s.delete_selected().unwrap();
        assert_eq!(deleted.removed, 3);
        assert_eq!(s.tree().all_nodes().len(), before - 3);
        assert_eq!(s.selected(), Some(find(&s, "A")));
    }

    #[test]
    fn deleting_a_root_child_selects_the_new_center() {
        let mut s = session("# A\n# Z\n");
        s.select(find(&s, "A")).unwrap();
        s.delete_selected().unwrap();
        assert_eq!(s.selected(), Some(find(&s, "Z")));
    }

    #[test]
    fn cyclic_move_is_rejected_without_snapshot() {
        let mut s = session("# A\n## B\n- C\n");
        let before = s.serialize();
        let b = find(&s, "A/B");
        let c = find(&s, "A/B/C");
        assert_eq!(
            s.move_node(b, c),
            Err(EditError::Cycle { node: b, target: c })
        );
        assert_eq!(s.serialize(), before);
        assert_eq!(s.undo_depth(), 0);
    }

    #[test]
    fn undo_reverts_structural_edits_in_order() {
        let mut s = session("# A\n## B\n## C\n");
        let original = s.serialize();
        let b = find(&s, "A/B");
        let c = find(&s, "A/C");

        s.move_node(c, b).unwrap();
        s.select(b).unwrap();
        s.add_child().unwrap();
        s.undo().unwrap();
        assert_eq!(s.serialize(), "# A\n## B\n### C\n");
        s.undo().unwrap();
        assert_eq!(s.serialize(), original);
        assert_eq!(s.undo(), Err(EditError::NothingToUndo));

        // Parent links were rebuilt by the restore.
        assert_eq!(s.tree().parent(c), Some(find(&s, "A")));
    }

    #[test]
    fn undo_bound_keeps_twenty_steps() {
        let mut s = session("# A\n");
        let a = find(&s, "A");
        for _ in 0..25 {
            s.select(a).unwrap();
            s.add_child().unwrap();
        }
        let mut undone = 0;
        while s.undo().is_ok() {
            undone += 1;
        }
        assert_eq!(undone, 20);
        assert_eq!(s.tree().children(a).len(), 5);
    }

    #[test]
    fn undo_falls_back_to_center_when_selection_vanishes() {
        let mut s = session("# A\n");
        let id = s.add_child().unwrap();
        assert_eq!(s.selected(), Some(id));
        s.undo().unwrap();
        assert_eq!(s.selected(), Some(find(&s, "A")));
    }

    #[test]
    fn collapse_and_recolor_skip_history() {
        let mut s = session("# A\n## B\n");
        s.relayout(&LayoutParams::default());
        assert_eq!(s.toggle_collapse(), Ok(true));
        assert!(s.is_layout_stale());
        s.relayout(&LayoutParams::default());

        s.select(find(&s, "A/B")).unwrap();
        assert_eq!(s.toggle_collapse(), Ok(false));
        s.recolor(Color::Green).unwrap();
        assert!(!s.is_layout_stale());
        assert_eq!(s.undo_depth(), 0);
        assert_eq!(s.tree().get(find(&s, "A/B")).unwrap().color, Color::Green);
    }

    #[test]
    fn edit_commit_trims_and_substitutes_placeholder() {
        let mut s = session("# A\n## B\n");
        let b = find(&s, "A/B");
        s.select(b).unwrap();

        s.begin_edit().unwrap();
        assert_eq!(s.editing(), Some((b, "B")));
        s.update_edit("  Renamed [[Link]]  ").unwrap();
        assert_eq!(s.commit_edit(), Ok(b));
        assert_eq!(s.tree().get(b).unwrap().text, "Renamed [[Link]]");
        assert_eq!(s.tree().get(b).unwrap().links, vec!["Link".to_string()]);

        s.begin_edit().unwrap();
        s.update_edit("   ").unwrap();
        s.commit_edit().unwrap();
        assert_eq!(s.tree().get(b).unwrap().text, "New node");
    }

    #[test]
    fn only_one_edit_at_a_time_and_cancel_discards() {
        let mut s = session("# A\n## B\n");
        let a = find(&s, "A");
        s.begin_edit().unwrap();
        s.select(find(&s, "A/B")).unwrap();
        assert_eq!(s.begin_edit(), Err(EditError::EditInProgress(a)));

        s.update_edit("discarded").unwrap();
        s.cancel_edit().unwrap();
        assert_eq!(s.editing(), None);
        assert_eq!(s.tree().get(a).unwrap().text, "A");
        assert_eq!(s.commit_edit(), Err(EditError::NotEditing));
    }

    #[test]
    fn deleting_the_edited_node_cancels_the_edit() {
        let mut s = session("# A\n## B\n- C\n");
        s.select(find(&s, "A/B/C")).unwrap();
        s.begin_edit().unwrap();
        s.select(find(&s, "A/B")).unwrap();
        s.delete_selected().unwrap();
        assert_eq!(s.editing(), None);
    }

    #[test]
    fn drag_hover_reparents_after_delay() {
        let mut s = session("# A\n## B\n## C\n");
        let b = find(&s, "A/B");
        let c = find(&s, "A/C");
        let t0 = Instant::now();

        s.begin_drag(c).unwrap();
        s.drag_hover(b, t0);
        assert!(s.poll_drag(t0 + Duration::from_millis(1999)).is_none());
        assert_eq!(s.poll_drag(t0 + Duration::from_millis(2000)), Some(Ok(())));
        assert_eq!(s.tree().parent(c), Some(b));
        assert_eq!(s.dragging(), None);
    }

    #[test]
    fn drag_leave_and_end_cancel_the_hover() {
        let mut s = session("# A\n## B\n## C\n");
        let b = find(&s, "A/B");
        let c = find(&s, "A/C");
        let t0 = Instant::now();

        s.begin_drag(c).unwrap();
        s.drag_hover(b, t0);
        s.drag_leave();
        assert!(s.poll_drag(t0 + Duration::from_secs(5)).is_none());

        s.drag_hover(b, t0);
        s.drag_end();
        assert!(s.poll_drag(t0 + Duration::from_secs(5)).is_none());
        assert_eq!(s.tree().parent(c), Some(find(&s, "A")));
    }

    #[test]
    fn drag_onto_descendant_reports_cycle() {
        let mut s = session("# A\n## B\n- C\n");
        let b = find(&s, "A/B");
        let c = find(&s, "A/B/C");
        let t0 = Instant::now();
        s.begin_drag(b).unwrap();
        s.drag_hover(c, t0);
        assert_eq!(
            s.poll_drag(t0 + Duration::from_secs(2)),
            Some(Err(EditError::Cycle { node: b, target: c }))
        );
    }

    #[test]
    fn navigate_uses_layout_positions() {
        let mut s = session("# Hub\n## right\n## left\n");
        s.relayout(&LayoutParams::default());
        assert_eq!(s.navigate(Direction::Right), Ok(true));
        assert_eq!(s.selected(), Some(find(&s, "Hub/right")));
        assert_eq!(s.navigate(Direction::Right), Ok(false));
    }

    #[test]
    fn mark_saved_clears_dirty() {
        let mut s = session("# A\n");
        s.add_child().unwrap();
        assert!(s.is_dirty());
        s.mark_saved(s.revision());
        assert!(!s.is_dirty());
    }
}
