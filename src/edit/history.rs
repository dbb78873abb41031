use std::collections::VecDeque;

use tracing::debug;

use crate::tree::{Snapshot, Tree};

/// Bounded undo stack of whole-tree snapshots.
///
/// There is no redo: taking a new snapshot after an undo simply continues
/// from the restored state.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Record `tree` as the state to return to. The oldest snapshot is
    /// dropped once the limit is reached.
    pub fn record(&mut self, tree: &Tree) {
        if self.limit == 0 {
            return;
        }
        let Some(snapshot) = Snapshot::capture(tree) else {
            return;
        };
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
        debug!(depth = self.snapshots.len(), "recorded undo snapshot");
    }

    /// Rebuild the most recent snapshot, keeping `current`'s id counter.
    pub fn undo(&mut self, current: &Tree) -> Option<Tree> {
        let snapshot = self.snapshots.pop_back()?;
        Some(snapshot.restore(current.slot_count()))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
