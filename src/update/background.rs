//! Background resolution state machine
//!
//! Fetches are never cancelled. Every fetch carries the request generation
//! it was started with, and a completion is applied only if it belongs to
//! the request still in flight. Results of superseded requests are dropped
//! without touching the state, even when they are for the same reference.

use crate::commands::Cmd;
use crate::messages::BackgroundMsg;
use crate::model::{Alert, AppModel, BackgroundState};

/// Enter the state matching the document's background reference
///
/// Returns the fetch command when there is something to resolve.
pub fn begin_background_resolution(model: &mut AppModel) -> Option<Cmd> {
    let url = model
        .document()
        .background()
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string);

    match url {
        None => {
            tracing::debug!("Background cleared, state -> idle");
            model.background = BackgroundState::Idle;
            None
        }
        Some(url) => {
            model.background_generation += 1;
            let generation = model.background_generation;
            tracing::debug!("Resolving background {} (request {})", url, generation);
            model.background = BackgroundState::Resolving(url.clone());
            Some(Cmd::FetchBackground { url, generation })
        }
    }
}

pub fn update_background(model: &mut AppModel, msg: BackgroundMsg) -> Option<Cmd> {
    match msg {
        BackgroundMsg::Resolved {
            url,
            generation,
            result,
        } => {
            // Skip unless this is the request still in flight
            let current = generation == model.background_generation
                && model.background.is_resolving()
                && model.document().background() == Some(url.as_str());
            if !current {
                tracing::debug!(
                    "Discarding stale background result for {} (request {}, current {} {:?})",
                    url,
                    generation,
                    model.background_generation,
                    model.document().background()
                );
                return None;
            }

            match result {
                Ok(image) => {
                    tracing::info!(
                        "Background {} resolved ({}x{})",
                        url,
                        image.width,
                        image.height
                    );
                    model.background = BackgroundState::Resolved(url, image);
                }
                Err(e) => {
                    let reason = e.to_string();
                    tracing::warn!("Background {} failed: {}", url, reason);
                    model.ui.show_alert(Alert::BackgroundFailed {
                        url: url.clone(),
                        reason: reason.clone(),
                    });
                    model.background = BackgroundState::Failed(url, reason);
                }
            }
            Some(Cmd::Redraw)
        }
    }
}
