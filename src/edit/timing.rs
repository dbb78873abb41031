//! Timers for auto-save coalescing and drag hover confirmation.
//!
//! Both are plain state machines: callers pass the current [`Instant`] in,
//! nothing here sleeps or spawns.

use std::time::{Duration, Instant};

use crate::tree::NodeId;

/// Fires once after `delay` has passed without another trigger.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Start the window, or restart it if one is already pending.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// `true` exactly once when the window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Confirms a drag target after the pointer has rested on it for `delay`.
#[derive(Debug, Clone)]
pub struct HoverConfirm {
    delay: Duration,
    hovering: Option<(NodeId, Instant)>,
}

impl HoverConfirm {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            hovering: None,
        }
    }

    /// Pointer is over `target`. Moving to a different target restarts the
    /// timer; staying on the same one keeps it running.
    pub fn hover(&mut self, target: NodeId, now: Instant) {
        match self.hovering {
            Some((current, _)) if current == target => {}
            _ => self.hovering = Some((target, now)),
        }
    }

    /// Pointer left the target or the drag ended.
    pub fn cancel(&mut self) {
        self.hovering = None;
    }

    pub fn target(&self) -> Option<NodeId> {
        self.hovering.map(|(target, _)| target)
    }

    /// The confirmed target, once. The hover state is cleared on success.
    pub fn poll(&mut self, now: Instant) -> Option<NodeId> {
        let (target, since) = self.hovering?;
        if now.duration_since(since) >= self.delay {
            self.hovering = None;
            Some(target)
        } else {
            None
        }
    }
}

/// Debounced auto-save keyed on a session revision counter.
///
/// Each new revision restarts the quiet period. A save that fails is not
/// retried until the next revision arrives.
#[derive(Debug, Clone)]
pub struct AutoSave {
    debounce: Debounce,
    seen_revision: u64,
}

impl AutoSave {
    pub fn new(delay: Duration, revision: u64) -> Self {
        Self {
            debounce: Debounce::new(delay),
            seen_revision: revision,
        }
    }

    /// Report the current revision after handling an event.
    pub fn observe(&mut self, revision: u64, now: Instant) {
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.debounce.trigger(now);
        }
    }

    /// `true` when a save should be written now.
    pub fn due(&mut self, now: Instant) -> bool {
        self.debounce.poll(now)
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }
}
