//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/emojiart/config.yaml`

use serde::{Deserialize, Serialize};

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Write the document to the autosave file after every change
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    /// Size given to glyphs dropped from a palette
    #[serde(default = "default_token_size")]
    pub default_token_size: u32,
    /// Name of the palette store to open
    #[serde(default = "default_palette_store")]
    pub palette_store: String,
    /// Maximum number of undoable edits
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
}

fn default_autosave() -> bool {
    true
}

fn default_token_size() -> u32 {
    40
}

fn default_palette_store() -> String {
    "Main".to_string()
}

fn default_undo_limit() -> usize {
    crate::history::DEFAULT_MAX_SIZE
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave: default_autosave(),
            default_token_size: default_token_size(),
            palette_store: default_palette_store(),
            undo_limit: default_undo_limit(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse YAML config text; missing keys take their defaults
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is valid and means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}
