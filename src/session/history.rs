//! Bounded undo history.
//!
//! A fixed-capacity stack of [`SessionSnapshot`]s: pushing past capacity
//! evicts the oldest entry, so the bound holds by construction. Backed by
//! `im::Vector`, which gives O(1) pushes and pops at both ends and cheap
//! clones of the whole history.

use im::Vector;

use crate::core::SessionSnapshot;

/// Undo stack with push-evict-oldest semantics.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vector<SessionSnapshot>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            entries: Vector::new(),
            capacity,
        }
    }

    /// Push a snapshot, evicting the oldest one when full.
    pub fn push(&mut self, snapshot: SessionSnapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Pop the most recent snapshot.
    pub fn pop(&mut self) -> Option<SessionSnapshot> {
        self.entries.pop_back()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
