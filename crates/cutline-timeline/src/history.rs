//! Snapshot-based linear undo/redo history.
//!
//! The history is a vector of timeline snapshots with a cursor. Each
//! committed user action (gesture release, split, delete — never an
//! intermediate pointer-move frame) pushes the resulting state. Undo and
//! redo move the cursor; committing after an undo discards every entry
//! beyond the cursor. No branching.

use tracing::debug;

use crate::timeline::Timeline;

/// A single entry in the history.
#[derive(Debug, Clone)]
struct HistoryEntry {
    /// Human-readable label for the action that produced this state.
    label: String,
    snapshot: Timeline,
}

/// Linear undo/redo over committed timeline states.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Index of the entry matching the current live state.
    cursor: usize,
    max_entries: usize,
}

impl History {
    /// Default maximum history depth.
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    /// Create a history seeded with the initial timeline state.
    pub fn new(initial: Timeline) -> Self {
        Self::with_max_entries(initial, Self::DEFAULT_MAX_ENTRIES)
    }

    /// Create a history with a custom depth bound.
    pub fn with_max_entries(initial: Timeline, max_entries: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                label: "Open".to_string(),
                snapshot: initial,
            }],
            cursor: 0,
            max_entries: max_entries.max(2),
        }
    }

    /// Record the state after a completed user action. Discards any undone
    /// entries beyond the cursor.
    pub fn commit(&mut self, label: &str, snapshot: Timeline) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            label: label.to_string(),
            snapshot,
        });
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
        debug!(label, depth = self.entries.len(), "History commit");
    }

    /// Step back one entry. Returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<&Timeline> {
        if self.cursor == 0 {
            return None;
        }
        debug!(label = %self.entries[self.cursor].label, "Undo");
        self.cursor -= 1;
        Some(&self.entries[self.cursor].snapshot)
    }

    /// Step forward one entry. Returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<&Timeline> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        debug!(label = %self.entries[self.cursor].label, "Redo");
        Some(&self.entries[self.cursor].snapshot)
    }

    /// Whether undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        self.can_undo()
            .then(|| self.entries[self.cursor].label.as_str())
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        self.can_redo()
            .then(|| self.entries[self.cursor + 1].label.as_str())
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.entries.len() - 1 - self.cursor
    }

    /// Drop all history and reseed with the given state.
    pub fn reset(&mut self, current: Timeline) {
        self.entries.clear();
        self.entries.push(HistoryEntry {
            label: "Open".to_string(),
            snapshot: current,
        });
        self.cursor = 0;
        debug!("History reset");
    }
}
