//! Snapshot-based undo/redo.
//!
//! Before every undoable mutation the caller records a labelled snapshot of
//! the state it is about to change. Undo swaps the live state with the most
//! recent snapshot and parks the live state on the redo stack.
use std::collections::VecDeque;

/// A labelled snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry<T> {
    pub label: String,
    pub state: T,
}

#[derive(Clone, Debug)]
pub struct History<T> {
    undo: VecDeque<HistoryEntry<T>>,
    redo: Vec<HistoryEntry<T>>,
    limit: usize,
}

impl<T> History<T> {
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Records the state as it was before the mutation named `label`.
    ///
    /// Any redo entries are discarded; the oldest entry is dropped once the
    /// limit is reached.
    pub fn record(&mut self, label: impl Into<String>, before: T) {
        self.redo.clear();
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(HistoryEntry {
            label: label.into(),
            state: before,
        });
    }

    /// Pops the latest snapshot, parking `current` for redo.
    ///
    /// Returns the label of the undone step and the state to restore.
    pub fn undo(&mut self, current: T) -> Option<HistoryEntry<T>> {
        let entry = self.undo.pop_back()?;
        self.redo.push(HistoryEntry {
            label: entry.label.clone(),
            state: current,
        });
        Some(entry)
    }

    /// Re-applies the most recently undone step, parking `current` for undo.
    pub fn redo(&mut self, current: T) -> Option<HistoryEntry<T>> {
        let entry = self.redo.pop()?;
        self.undo.push_back(HistoryEntry {
            label: entry.label.clone(),
            state: current,
        });
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(|entry| entry.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|entry| entry.label.as_str())
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}
