//! Undo/redo history for document edits.
//!
//! Every entry owns an immutable snapshot of the document taken right before
//! the edit it reverts. Undoing an entry pushes its mirror (a snapshot of the
//! state being left) onto the redo stack, and vice versa.

use crate::model::Document;

/// Default number of undoable edits kept
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// A single undoable edit
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    /// Human-readable action name, e.g. "Move" (display only)
    pub label: String,
    /// Document value to restore when this entry is applied
    pub snapshot: Document,
}

impl UndoEntry {
    pub fn new(label: impl Into<String>, snapshot: Document) -> Self {
        Self {
            label: label.into(),
            snapshot,
        }
    }
}

/// Linear undo history with undo/redo stacks.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
    max_size: usize,
}

impl UndoHistory {
    /// Create a new history with default max size
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_SIZE)
    }

    /// Create a new history with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Register a new edit (clears redo stack)
    pub fn push(&mut self, entry: UndoEntry) {
        self.redo_stack.clear();
        self.undo_stack.push(entry);

        // Trim if exceeded max size
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the most recent edit, registering `current` as its redo mirror
    pub fn pop_undo(&mut self, current: &Document) -> Option<UndoEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack
            .push(UndoEntry::new(entry.label.clone(), current.clone()));
        Some(entry)
    }

    /// Pop the most recently undone edit, registering `current` as its undo mirror
    pub fn pop_redo(&mut self, current: &Document) -> Option<UndoEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack
            .push(UndoEntry::new(entry.label.clone(), current.clone()));
        Some(entry)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the edit `undo` would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|entry| entry.label.as_str())
    }

    /// Label of the edit `redo` would reapply
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|entry| entry.label.as_str())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}
