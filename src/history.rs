//! Bounded undo/redo history of whole-document snapshots.
//!
//! Each entry pairs a full module snapshot with the action that produced it.
//! Whole-document snapshots trade memory for correctness: restoring one is a
//! single `load_snapshot` with nothing to invert. The stack is bounded (50
//! entries by default) and documents stay small (tens to low hundreds of
//! modules), which keeps the memory cost acceptable.
//!
//! The manager lives for the length of an editing session and is cleared
//! when a new document is loaded.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use tracing::debug;

use crate::command::EditAction;
use crate::consts::MAX_HISTORY_SIZE;
use crate::module::Module;

/// One point-in-time state of the document plus the action that led to it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Full module snapshot in deterministic order.
    pub snapshot: Vec<Module>,
    /// The edit that produced this state.
    pub action: EditAction,
}

/// Double-stack undo/redo manager over [`HistoryEntry`] values.
///
/// The top of the undo stack is always the *current* document state; undo is
/// therefore only possible with at least two entries (a current and an
/// earlier state to return to).
#[derive(Debug)]
pub struct HistoryManager {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}

impl HistoryManager {
    /// Create a manager that keeps at most `max_size` undo entries.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record a new document state.
    ///
    /// A snapshot identical to the current top is dropped silently, so no-op
    /// commands can never produce two consecutive identical entries. Any
    /// pending redo entries are invalidated, and the oldest entries are
    /// evicted once the stack exceeds its bound.
    pub fn push_state(&mut self, snapshot: Vec<Module>, action: EditAction) {
        if self.undo_stack.last().is_some_and(|top| top.snapshot == snapshot) {
            debug!(action = action.label(), "skipped history push for identical snapshot");
            return;
        }
        self.redo_stack.clear();
        debug!(
            action = action.label(),
            depth = self.undo_stack.len() + 1,
            "pushed history state"
        );
        self.undo_stack.push(HistoryEntry { snapshot, action });
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Step back one state. Returns the snapshot to restore, or `None` when
    /// there is no earlier state (fewer than two entries).
    pub fn undo(&mut self) -> Option<Vec<Module>> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        let current = self.undo_stack.pop()?;
        debug!(action = current.action.label(), "undo");
        self.redo_stack.push(current);
        self.undo_stack.last().map(|entry| entry.snapshot.clone())
    }

    /// Step forward one previously undone state. Returns the snapshot to
    /// restore, or `None` when the redo stack is empty.
    pub fn redo(&mut self) -> Option<Vec<Module>> {
        let entry = self.redo_stack.pop()?;
        debug!(action = entry.action.label(), "redo");
        let snapshot = entry.snapshot.clone();
        self.undo_stack.push(entry);
        Some(snapshot)
    }

    /// Whether [`HistoryManager::undo`] would succeed.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    /// Whether [`HistoryManager::redo`] would succeed.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The action that produced the current state, for UI labels.
    #[must_use]
    pub fn last_action(&self) -> Option<&EditAction> {
        self.undo_stack.last().map(|entry| &entry.action)
    }

    /// Number of entries on the undo stack (including the current state).
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of entries on the redo stack.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history, e.g. when a new document is loaded.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
