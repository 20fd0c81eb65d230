//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types: user intents from
//! the presentation layer and completions from async commands.

use std::path::PathBuf;
use std::sync::Arc;

use crate::fetch::FetchError;
use crate::model::{BackgroundImage, Offset, Palette, Position, TokenId};

/// Document edits (all undoable) plus undo/redo
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    /// Replace the background reference (None or "" clears it)
    SetBackground(Option<String>),
    /// Place a glyph at a document position
    AddToken {
        glyph: String,
        position: Position,
        size: u32,
    },
    /// Remove a token by id
    RemoveToken(TokenId),
    /// Remove several tokens as one undoable edit
    RemoveTokens(Vec<TokenId>),
    /// Scale the listed tokens (pinch gesture)
    ResizeTokens { ids: Vec<TokenId>, factor: f64 },
    /// Translate the listed tokens by an input-space offset (drag gesture)
    MoveTokens { ids: Vec<TokenId>, offset: Offset },
    Undo,
    Redo,
}

/// Background resolution completions
#[derive(Debug, Clone)]
pub enum BackgroundMsg {
    /// Fetch + decode for `url` finished
    Resolved {
        url: String,
        /// Request generation the fetch was started with
        generation: u64,
        result: Result<Arc<BackgroundImage>, FetchError>,
    },
}

/// Palette chooser and editor intents
#[derive(Debug, Clone)]
pub enum PaletteMsg {
    /// Show the next palette
    Next,
    /// Delete the palette under the cursor
    DeleteCurrent,
    /// Upsert a palette (default index: the cursor)
    Insert { palette: Palette, at: Option<isize> },
    /// Upsert a palette at the end
    Append(Palette),
    /// Prepend glyphs to the current palette
    AddGlyphs(String),
    /// Remove a glyph from the current palette
    RemoveGlyph(String),
    /// Rename the current palette
    Rename(String),
}

/// App-level messages (file I/O)
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Open a document file
    OpenFile(PathBuf),
    /// Async load completed
    FileLoaded {
        path: PathBuf,
        result: Result<Vec<u8>, String>,
    },
    /// Save to the current document path (or fail if there is none)
    Save,
    /// Save to a new path and adopt it
    SaveAs(PathBuf),
    /// Async save completed
    SaveCompleted {
        path: PathBuf,
        result: Result<(), String>,
    },
    /// Autosave write failed (logged only)
    AutosaveFailed(String),
}

/// UI messages
#[derive(Debug, Clone)]
pub enum UiMsg {
    /// Dismiss the pending alert
    DismissAlert,
}

/// Drop payload coming from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum DropItem {
    /// A URL dropped anywhere: becomes the background
    Url(String),
    /// A glyph dropped at a document position
    Glyph { glyph: String, position: Position },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    /// Document edits and undo/redo
    Document(DocumentMsg),
    /// Background resolution
    Background(BackgroundMsg),
    /// Palette store
    Palette(PaletteMsg),
    /// File I/O
    App(AppMsg),
    /// UI state
    Ui(UiMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn set_background(url: impl Into<String>) -> Self {
        Msg::Document(DocumentMsg::SetBackground(Some(url.into())))
    }

    pub fn add_token(glyph: impl Into<String>, position: Position, size: u32) -> Self {
        Msg::Document(DocumentMsg::AddToken {
            glyph: glyph.into(),
            position,
            size,
        })
    }

    pub fn undo() -> Self {
        Msg::Document(DocumentMsg::Undo)
    }

    pub fn redo() -> Self {
        Msg::Document(DocumentMsg::Redo)
    }

    /// Translate a drop into the matching document edit
    pub fn from_drop(item: DropItem, size: u32) -> Self {
        match item {
            DropItem::Url(url) => Msg::set_background(url),
            DropItem::Glyph { glyph, position } => Msg::add_token(glyph, position, size),
        }
    }
}
