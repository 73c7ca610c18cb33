//! # Undo/Redo History
//!
//! Snapshot history over immutable documents.
//!
//! ## Design
//!
//! - Every committed edit pushes a whole snapshot; undo and redo just move a
//!   cursor, so they can never fail or drift.
//! - Snapshots are `Arc`s. Pushing a document that shares structure with its
//!   predecessor costs one clone of the document, nothing more.
//! - Pushing after an undo discards the redo branch.
//! - Continuous edits (drags, resizes) replace the present without touching
//!   the snapshot list until they are committed, so one gesture becomes one
//!   undo step.
//! - Each snapshot carries a generation number; hosts compare it with the
//!   generation they last saved to derive a dirty flag.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(Document::new());
//! history.push(edited);
//! history.undo();
//! assert!(history.can_redo());
//! ```

use std::sync::Arc;

/// Default number of snapshots kept
pub const DEFAULT_MAX_LEVELS: usize = 100;

#[derive(Debug)]
struct Snapshot<T> {
    generation: u64,
    value: Arc<T>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            value: Arc::clone(&self.value),
        }
    }
}

#[derive(Debug)]
pub struct History<T> {
    snapshots: Vec<Snapshot<T>>,
    cursor: usize,

    /// Usually `snapshots[cursor]`; differs while a continuous edit is in flight
    present: Snapshot<T>,

    /// Maximum number of snapshots (0 = unlimited)
    max_levels: usize,

    next_generation: u64,
}

impl<T> History<T> {
    /// Create a history with default max levels (100)
    pub fn new(initial: T) -> Self {
        Self::with_max_levels(initial, DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(initial: T, max_levels: usize) -> Self {
        let first = Snapshot {
            generation: 0,
            value: Arc::new(initial),
        };
        Self {
            snapshots: vec![first.clone()],
            cursor: 0,
            present: first,
            max_levels,
            next_generation: 1,
        }
    }

    pub fn present(&self) -> &T {
        &self.present.value
    }

    pub fn present_arc(&self) -> Arc<T> {
        Arc::clone(&self.present.value)
    }

    /// Generation of the present document; changes whenever the present does
    pub fn generation(&self) -> u64 {
        self.present.generation
    }

    /// Record `value` as the newest snapshot and make it the present
    pub fn push(&mut self, value: T) {
        self.snapshots.truncate(self.cursor + 1);
        let snapshot = self.fresh(value);
        self.snapshots.push(snapshot.clone());
        self.cursor = self.snapshots.len() - 1;
        self.present = snapshot;
        self.evict();
    }

    /// Step back one snapshot. At the oldest snapshot this is a no-op.
    pub fn undo(&mut self) -> &T {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.present = self.snapshots[self.cursor].clone();
        &self.present.value
    }

    /// Step forward one snapshot. At the newest snapshot this is a no-op.
    pub fn redo(&mut self) -> &T {
        if self.cursor + 1 < self.snapshots.len() {
            self.cursor += 1;
        }
        self.present = self.snapshots[self.cursor].clone();
        &self.present.value
    }

    /// Replace the present without recording a snapshot
    pub fn apply_continuous(&mut self, value: T) {
        self.present = self.fresh(value);
    }

    /// Record the final value of a continuous edit as one snapshot
    pub fn commit_continuous(&mut self, value: T) {
        self.push(value);
    }

    /// Drop any uncommitted continuous edit and restore `snapshots[cursor]`
    pub fn discard_continuous(&mut self) {
        self.present = self.snapshots[self.cursor].clone();
    }

    /// Whether the present differs from `snapshots[cursor]`
    pub fn has_uncommitted(&self) -> bool {
        self.present.generation != self.snapshots[self.cursor].generation
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true; a history always holds at least one snapshot
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Snapshot at `index`, oldest first
    pub fn snapshot(&self, index: usize) -> Option<&T> {
        self.snapshots.get(index).map(|s| s.value.as_ref())
    }

    /// Forget everything and start over from `initial`
    pub fn clear(&mut self, initial: T) {
        let first = self.fresh(initial);
        self.snapshots = vec![first.clone()];
        self.cursor = 0;
        self.present = first;
    }

    fn fresh(&mut self, value: T) -> Snapshot<T> {
        let generation = self.next_generation;
        self.next_generation += 1;
        Snapshot {
            generation,
            value: Arc::new(value),
        }
    }

    fn evict(&mut self) {
        if self.max_levels == 0 {
            return;
        }
        let excess = self.snapshots.len().saturating_sub(self.max_levels);
        if excess > 0 {
            self.snapshots.drain(..excess);
            self.cursor -= excess;
        }
    }
}

impl<T> Clone for History<T> {
    fn clone(&self) -> Self {
        Self {
            snapshots: self.snapshots.clone(),
            cursor: self.cursor,
            present: self.present.clone(),
            max_levels: self.max_levels,
            next_generation: self.next_generation,
        }
    }
}

impl<T: Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
