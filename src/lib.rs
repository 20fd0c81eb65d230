//! EmojiArt - Elm-style document state engine for an emoji canvas editor
//!
//! This crate provides the document model, its undoable mutation API, the
//! background resolution state machine, persistence, and palette stores.
//! Presentation layers drive it through [`Msg`] and [`update`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod fetch;
pub mod history;
pub mod messages;
pub mod model;
pub mod persistence;
pub mod runtime;
pub mod storage;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use messages::Msg;
pub use model::AppModel;
pub use update::update;
