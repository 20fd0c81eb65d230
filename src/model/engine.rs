//! Mutation/undo engine wrapping the document model
//!
//! Every externally visible edit goes through [`DocumentEngine`]. When an
//! undo context is supplied the pre-edit document is snapshotted and pushed
//! as an [`UndoEntry`]. Subscribers are notified after every applied change.

use std::fmt;

use super::document::{Document, Offset, Position, TokenId};
use crate::history::{UndoEntry, UndoHistory};

/// What kind of change was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Background,
    Tokens,
    Undo,
    Redo,
    /// Whole document swapped (open file, autosave restore)
    Replaced,
}

/// Emitted after each applied mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEvent {
    pub kind: ChangeKind,
    pub label: String,
    pub revision: u64,
}

/// Handle returned by [`DocumentEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&DocumentEvent)>;

/// The document plus its change notification fan-out
pub struct DocumentEngine {
    document: Document,
    /// Bumped on every applied change
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl DocumentEngine {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // =========================================================================
    // Change notification
    // =========================================================================

    /// Register a listener called after every applied change
    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, kind: ChangeKind, label: &str) {
        self.revision += 1;
        let event = DocumentEvent {
            kind,
            label: label.to_string(),
            revision: self.revision,
        };
        tracing::trace!(?kind, label, revision = self.revision, "document changed");
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    /// Snapshot, apply `edit`, register the undo entry and notify
    fn apply<R>(
        &mut self,
        kind: ChangeKind,
        label: &str,
        undo: Option<&mut UndoHistory>,
        edit: impl FnOnce(&mut Document) -> R,
    ) -> R {
        let snapshot = undo.as_ref().map(|_| self.document.clone());
        let result = edit(&mut self.document);
        if let (Some(history), Some(snapshot)) = (undo, snapshot) {
            history.push(UndoEntry::new(label, snapshot));
        }
        self.emit(kind, label);
        result
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_background(&mut self, background: Option<String>, undo: Option<&mut UndoHistory>) {
        self.apply(ChangeKind::Background, "Set Background", undo, |doc| {
            doc.set_background(background)
        });
    }

    pub fn add_token(
        &mut self,
        glyph: &str,
        position: Position,
        size: u32,
        undo: Option<&mut UndoHistory>,
    ) -> TokenId {
        let label = format!("Add {}", glyph);
        self.apply(ChangeKind::Tokens, &label, undo, |doc| {
            doc.add_token(glyph, position, size)
        })
    }

    pub fn remove_token(&mut self, id: TokenId, undo: Option<&mut UndoHistory>) {
        self.apply(ChangeKind::Tokens, "Remove", undo, |doc| doc.remove_token(id));
    }

    /// Remove several tokens as one edit; absent ids are skipped
    pub fn remove_tokens(&mut self, ids: &[TokenId], undo: Option<&mut UndoHistory>) {
        self.apply(ChangeKind::Tokens, "Remove", undo, |doc| {
            for id in ids {
                doc.remove_token(*id);
            }
        });
    }

    /// Scale the size of each listed token, rounding to the nearest integer
    ///
    /// Ids not in the document are skipped. Returns how many tokens changed.
    pub fn resize_tokens(
        &mut self,
        ids: &[TokenId],
        factor: f64,
        undo: Option<&mut UndoHistory>,
    ) -> usize {
        self.apply(ChangeKind::Tokens, "Resize", undo, |doc| {
            ids.iter()
                .filter(|id| {
                    doc.update_token(**id, |token| {
                        token.size = (token.size as f64 * factor).round().max(0.0) as u32;
                    })
                })
                .count()
        })
    }

    /// Translate each listed token by an input-space offset
    ///
    /// `dy` is flipped because input space is y-down and document space is
    /// y-up. Ids not in the document are skipped. Returns how many tokens moved.
    pub fn move_tokens(
        &mut self,
        ids: &[TokenId],
        offset: Offset,
        undo: Option<&mut UndoHistory>,
    ) -> usize {
        let dx = offset.dx as i32;
        let dy = offset.dy as i32;
        self.apply(ChangeKind::Tokens, "Move", undo, |doc| {
            ids.iter()
                .filter(|id| {
                    doc.update_token(**id, |token| {
                        token.position.x = token.position.x.saturating_add(dx);
                        token.position.y = token.position.y.saturating_sub(dy);
                    })
                })
                .count()
        })
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    /// Restore the state before the last edit; no-op on empty history
    pub fn undo(&mut self, history: &mut UndoHistory) -> bool {
        let Some(entry) = history.pop_undo(&self.document) else {
            return false;
        };
        self.restore(entry.snapshot);
        self.emit(ChangeKind::Undo, &entry.label);
        true
    }

    /// Reapply the last undone edit; no-op when nothing was undone
    pub fn redo(&mut self, history: &mut UndoHistory) -> bool {
        let Some(entry) = history.pop_redo(&self.document) else {
            return false;
        };
        self.restore(entry.snapshot);
        self.emit(ChangeKind::Redo, &entry.label);
        true
    }

    /// Swap in a history snapshot without letting the id counter go backwards
    fn restore(&mut self, mut snapshot: Document) {
        snapshot.reserve_ids(self.document.next_id());
        self.document = snapshot;
    }

    /// Swap in a whole new document (open file, restore)
    ///
    /// The history belongs to the old document, so it is cleared.
    pub fn replace_document(&mut self, document: Document, history: &mut UndoHistory) {
        self.document = document;
        history.clear();
        self.emit(ChangeKind::Replaced, "Open");
    }
}

impl Default for DocumentEngine {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

impl fmt::Debug for DocumentEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentEngine")
            .field("document", &self.document)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
