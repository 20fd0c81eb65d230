//! UI-facing state - status line, alerts, and busy flags

use std::path::PathBuf;

/// Dismissible alert the presentation layer should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Background could not be fetched or decoded
    BackgroundFailed { url: String, reason: String },
    /// An opened file was unreadable
    FileCorrupt { path: PathBuf, reason: String },
    /// Explicit save failed
    SaveFailed { path: PathBuf, reason: String },
}

impl Alert {
    /// Dialog title
    pub fn title(&self) -> &'static str {
        match self {
            Alert::BackgroundFailed { .. } => "Set Background",
            Alert::FileCorrupt { .. } => "Open Failed",
            Alert::SaveFailed { .. } => "Save Failed",
        }
    }

    /// Dialog body
    pub fn message(&self) -> String {
        match self {
            Alert::BackgroundFailed { reason, .. } => reason.clone(),
            Alert::FileCorrupt { path, reason } => {
                format!("{} could not be opened: {}", path.display(), reason)
            }
            Alert::SaveFailed { path, reason } => {
                format!("{} could not be saved: {}", path.display(), reason)
            }
        }
    }
}

/// UI state - status messages and alerts
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Message displayed in the status line
    pub status_message: String,
    /// Alert waiting to be shown/dismissed
    pub alert: Option<Alert>,
    /// Whether a file is currently being loaded
    pub is_loading: bool,
    /// Whether a file is currently being saved
    pub is_saving: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Show an alert, replacing any pending one
    pub fn show_alert(&mut self, alert: Alert) {
        self.alert = Some(alert);
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    /// Check if the UI is busy (loading or saving)
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_saving
    }
}
