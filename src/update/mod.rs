//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod background;
mod document;
mod palette;
mod ui;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use crate::tracing::DocumentSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use background::{begin_background_resolution, update_background};
pub use document::{autosave_cmd, update_document};
pub use palette::update_palette;
pub use ui::update_ui;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Document(m) => document::update_document(model, m),
        Msg::Background(m) => background::update_background(model, m),
        Msg::Palette(m) => palette::update_palette(model, m),
        Msg::App(m) => app::update_app(model, m),
        Msg::Ui(m) => ui::update_ui(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after model snapshots and logs diffs for debugging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = DocumentSnapshot::from_model(model);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = DocumentSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "model", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
///
/// Payload bytes and images are summarized rather than dumped.
/// Example outputs:
/// - `Document::Undo`
/// - `Background::Resolved(https://example.com/a.png, ok)`
/// - `App::FileLoaded(/tmp/a.emojiart, 512 bytes)`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::{AppMsg, BackgroundMsg};

    match msg {
        Msg::Document(m) => format!("Document::{:?}", m),
        Msg::Background(BackgroundMsg::Resolved { url, result, .. }) => {
            let outcome = match result {
                Ok(_) => "ok".to_string(),
                Err(e) => e.to_string(),
            };
            format!("Background::Resolved({}, {})", url, outcome)
        }
        Msg::Palette(m) => format!("Palette::{:?}", m),
        Msg::App(AppMsg::FileLoaded { path, result }) => match result {
            Ok(bytes) => format!("App::FileLoaded({}, {} bytes)", path.display(), bytes.len()),
            Err(e) => format!("App::FileLoaded({}, {})", path.display(), e),
        },
        Msg::App(m) => format!("App::{:?}", m),
        Msg::Ui(m) => format!("Ui::{:?}", m),
    }
}
