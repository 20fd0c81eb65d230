//! Document edit handlers
//!
//! Every edit goes through the engine with the model's history as undo
//! context. A change that moves the background reference restarts
//! background resolution; every change schedules an autosave.

use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::model::AppModel;
use crate::persistence;

use super::background::begin_background_resolution;

pub fn update_document(model: &mut AppModel, msg: DocumentMsg) -> Option<Cmd> {
    let previous_background = model.document().background().map(str::to_string);
    let AppModel {
        engine, history, ..
    } = model;

    let changed = match msg {
        DocumentMsg::SetBackground(background) => {
            let background = background.filter(|url| !url.trim().is_empty());
            engine.set_background(background, Some(history));
            true
        }
        DocumentMsg::AddToken {
            glyph,
            position,
            size,
        } => {
            let id = engine.add_token(&glyph, position, size, Some(history));
            tracing::debug!("Added {} as #{} at ({}, {})", glyph, id, position.x, position.y);
            true
        }
        DocumentMsg::RemoveToken(id) => {
            engine.remove_token(id, Some(history));
            true
        }
        DocumentMsg::RemoveTokens(ids) => {
            engine.remove_tokens(&ids, Some(history));
            true
        }
        DocumentMsg::ResizeTokens { ids, factor } => {
            let resized = engine.resize_tokens(&ids, factor, Some(history));
            if resized < ids.len() {
                tracing::debug!("Resize skipped {} missing ids", ids.len() - resized);
            }
            true
        }
        DocumentMsg::MoveTokens { ids, offset } => {
            let moved = engine.move_tokens(&ids, offset, Some(history));
            if moved < ids.len() {
                tracing::debug!("Move skipped {} missing ids", ids.len() - moved);
            }
            true
        }
        DocumentMsg::Undo => engine.undo(history),
        DocumentMsg::Redo => engine.redo(history),
    };

    if !changed {
        return None;
    }
    Some(document_changed(model, previous_background.as_deref()))
}

/// Follow-up commands after the document changed
///
/// Restarts background resolution when the reference moved and schedules
/// an autosave.
pub(crate) fn document_changed(model: &mut AppModel, previous_background: Option<&str>) -> Cmd {
    let mut cmds = vec![Cmd::Redraw];

    if model.document().background() != previous_background {
        if let Some(cmd) = begin_background_resolution(model) {
            cmds.push(cmd);
        }
    }
    if let Some(cmd) = autosave_cmd(model) {
        cmds.push(cmd);
    }

    Cmd::batch(cmds)
}

/// Autosave command for the current document, if autosave is enabled
pub fn autosave_cmd(model: &AppModel) -> Option<Cmd> {
    if !model.config.autosave {
        return None;
    }
    let path = model.autosave_path.clone()?;
    Some(Cmd::Autosave {
        path,
        payload: persistence::serialize(model.document()),
        generation: model.engine.revision(),
    })
}
