//! App message handlers (open/save file flow, autosave failures)

use crate::commands::Cmd;
use crate::messages::AppMsg;
use crate::model::{Alert, AppModel};
use crate::persistence;

use super::document::document_changed;

pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::OpenFile(path) => {
            model.ui.is_loading = true;
            model.ui.set_status(format!("Opening {}...", path.display()));
            Some(Cmd::LoadFile { path })
        }

        AppMsg::FileLoaded { path, result } => {
            model.ui.is_loading = false;
            let document = result.and_then(|bytes| {
                persistence::deserialize(&bytes).map_err(|e| e.to_string())
            });

            match document {
                Ok(document) => {
                    tracing::info!("Opened {} ({} emojis)", path.display(), document.len());
                    let previous_background = model.document().background().map(str::to_string);
                    model.engine.replace_document(document, &mut model.history);
                    model.ui.set_status(format!("Opened: {}", path.display()));
                    model.document_path = Some(path);
                    Some(document_changed(model, previous_background.as_deref()))
                }
                Err(reason) => {
                    tracing::warn!("Failed to open {}: {}", path.display(), reason);
                    model.ui.set_status(format!("Error: {}", reason));
                    model.ui.show_alert(Alert::FileCorrupt { path, reason });
                    Some(Cmd::Redraw)
                }
            }
        }

        AppMsg::Save => match model.document_path.clone() {
            Some(path) => update_app(model, AppMsg::SaveAs(path)),
            None => {
                model.ui.set_status("Nothing to save to: use Save As");
                Some(Cmd::Redraw)
            }
        },

        AppMsg::SaveAs(path) => {
            model.ui.is_saving = true;
            model.document_path = Some(path.clone());
            Some(Cmd::SaveFile {
                path,
                payload: persistence::serialize(model.document()),
            })
        }

        AppMsg::SaveCompleted { path, result } => {
            model.ui.is_saving = false;
            match result {
                Ok(()) => {
                    model.ui.set_status(format!("Saved: {}", path.display()));
                }
                Err(reason) => {
                    tracing::warn!("Failed to save {}: {}", path.display(), reason);
                    model.ui.set_status(format!("Error: {}", reason));
                    model.ui.show_alert(Alert::SaveFailed { path, reason });
                }
            }
            Some(Cmd::Redraw)
        }

        AppMsg::AutosaveFailed(reason) => {
            // Never surfaced: editing continues and the next change retries
            tracing::warn!("Autosave failed: {}", reason);
            None
        }
    }
}
