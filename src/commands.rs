//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::path::PathBuf;

/// Side effects requested by `update`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Presentation should re-read the model
    Redraw,
    /// Resolve a background reference asynchronously
    /// Sends Msg::Background(Resolved) tagged with `generation` when done
    FetchBackground { url: String, generation: u64 },
    /// Write the autosave file (fire-and-forget, newest generation wins)
    Autosave {
        path: PathBuf,
        payload: Vec<u8>,
        generation: u64,
    },
    /// Save document file asynchronously
    /// Sends Msg::App(SaveCompleted) when done
    SaveFile { path: PathBuf, payload: Vec<u8> },
    /// Load document file asynchronously
    /// Sends Msg::App(FileLoaded) when done
    LoadFile { path: PathBuf },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Combine two optional commands into one
    pub fn merge(a: Option<Cmd>, b: Option<Cmd>) -> Option<Cmd> {
        match (a, b) {
            (None, None) => None,
            (Some(cmd), None) | (None, Some(cmd)) => Some(cmd),
            (Some(Cmd::Batch(mut cmds)), Some(other)) => {
                cmds.push(other);
                Some(Cmd::Batch(cmds))
            }
            (Some(first), Some(second)) => Some(Cmd::Batch(vec![first, second])),
        }
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::FetchBackground { .. } => true,
            Cmd::Autosave { .. } | Cmd::SaveFile { .. } | Cmd::LoadFile { .. } => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Flatten into a list of leaf commands (for inspection in tests and logs)
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            Cmd::None => Vec::new(),
            other => vec![other],
        }
    }
}
