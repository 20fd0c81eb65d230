//! Application model - the complete state of an editing session
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod background;
pub mod document;
pub mod engine;
pub mod palette;
pub mod ui;

pub use background::{BackgroundImage, BackgroundState};
pub use document::{Document, Offset, Position, Rect, Token, TokenId};
pub use engine::{ChangeKind, DocumentEngine, DocumentEvent, SubscriptionId};
pub use palette::{Palette, PaletteStore};
pub use ui::{Alert, UiState};

use crate::config::EditorConfig;
use crate::history::UndoHistory;
use std::path::PathBuf;

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    /// The document and its mutation entry point
    pub engine: DocumentEngine,
    /// Undo context for edits coming through `update`
    pub history: UndoHistory,
    /// Resolution state of the document's background reference
    pub background: BackgroundState,
    /// Generation of the most recent background fetch request
    pub background_generation: u64,
    /// Palettes offered for dragging glyphs onto the canvas
    pub palettes: PaletteStore,
    /// UI state (status line, alerts)
    pub ui: UiState,
    /// Editor configuration
    pub config: EditorConfig,
    /// Where every change is autosaved (None disables autosave)
    pub autosave_path: Option<PathBuf>,
    /// File the document was opened from / last saved to
    pub document_path: Option<PathBuf>,
}

impl AppModel {
    /// Create a model around `document`
    ///
    /// The background state starts `Idle`; call
    /// [`crate::update::begin_background_resolution`] to kick off the first fetch.
    pub fn new(document: Document, palettes: PaletteStore, config: EditorConfig) -> Self {
        let history = UndoHistory::with_max_size(config.undo_limit);
        Self {
            engine: DocumentEngine::new(document),
            history,
            background: BackgroundState::Idle,
            background_generation: 0,
            palettes,
            ui: UiState::new(),
            config,
            autosave_path: None,
            document_path: None,
        }
    }

    /// Builder-style autosave location
    pub fn with_autosave_path(mut self, path: Option<PathBuf>) -> Self {
        self.autosave_path = path;
        self
    }

    /// Current document
    #[inline]
    pub fn document(&self) -> &Document {
        self.engine.document()
    }
}
