//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging plus lightweight model snapshots so the
//! update loop can log what each message changed.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=emojiart::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/emojiart/logs/emojiart.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::AppModel;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes
/// to `~/.config/emojiart/logs/emojiart.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "emojiart.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // try_init: a subscriber may already be installed (tests, embedding hosts)
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of model state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub revision: u64,
    pub token_count: usize,
    pub background: Option<String>,
    pub background_state: String,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub palette_cursor: usize,
}

impl DocumentSnapshot {
    pub fn from_model(model: &AppModel) -> Self {
        Self {
            revision: model.engine.revision(),
            token_count: model.document().len(),
            background: model.document().background().map(str::to_string),
            background_state: model.background.summary(),
            undo_depth: model.history.undo_count(),
            redo_depth: model.history.redo_count(),
            palette_cursor: model.palettes.cursor_index(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &DocumentSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.token_count != other.token_count {
            changes.push(format!(
                "emojis: {} → {}",
                self.token_count, other.token_count
            ));
        }
        if self.background != other.background {
            changes.push(format!(
                "background: {:?} → {:?}",
                self.background, other.background
            ));
        }
        if self.background_state != other.background_state {
            changes.push(format!("background state: {}", other.background_state));
        }
        if (self.undo_depth, self.redo_depth) != (other.undo_depth, other.redo_depth) {
            changes.push(format!(
                "history: {}/{} → {}/{}",
                self.undo_depth, self.redo_depth, other.undo_depth, other.redo_depth
            ));
        }
        if self.palette_cursor != other.palette_cursor {
            changes.push(format!(
                "palette: #{} → #{}",
                self.palette_cursor, other.palette_cursor
            ));
        }
        if changes.is_empty() && self.revision != other.revision {
            changes.push(format!("revision {} → {}", self.revision, other.revision));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
