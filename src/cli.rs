//! Command-line argument parsing
//!
//! Supports:
//! - Opening a document file, the autosave, or an empty document
//! - Setting the background and placing glyphs
//! - Undoing edits and saving the result
//! - Listing the palette store

use clap::Parser;
use std::path::PathBuf;

use crate::messages::{DropItem, Msg};
use crate::model::Position;

/// Compose emoji art documents
#[derive(Parser, Debug)]
#[command(name = "emojiart", version, about = "Compose emoji art documents")]
pub struct CliArgs {
    /// Document to open (defaults to the autosave)
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Start with an empty document (ignore the autosave)
    #[arg(short = 'n', long)]
    pub new: bool,

    /// Set the background to a URL or image path
    #[arg(short = 'b', long, value_name = "URI")]
    pub background: Option<String>,

    /// Place a glyph at document coordinates, e.g. 🌲@10,-20 (repeatable)
    #[arg(short = 'a', long = "add", value_name = "GLYPH@X,Y")]
    pub add: Vec<String>,

    /// Size of glyphs placed with --add (default: from config)
    #[arg(short = 's', long, value_name = "N")]
    pub size: Option<u32>,

    /// Undo the last N edits
    #[arg(short = 'u', long, value_name = "N", default_value_t = 0)]
    pub undo: usize,

    /// Fetch and decode the background, then report its state
    /// (without this flag the background is never fetched)
    #[arg(short = 'r', long)]
    pub resolve: bool,

    /// Save the document to PATH
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// List the palette store
    #[arg(short = 'p', long)]
    pub palettes: bool,
}

/// Where the session's document comes from
#[derive(Debug, Clone, PartialEq)]
pub enum StartupSource {
    /// Restore the autosave (empty if missing or unreadable)
    Autosave,
    /// Start with an empty document
    Empty,
    /// Open a document file
    File(PathBuf),
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub source: StartupSource,
    /// Drops to apply in order: background first, then glyphs
    pub drops: Vec<DropItem>,
    /// Size override for placed glyphs
    pub size: Option<u32>,
    pub undo_count: usize,
    pub resolve: bool,
    pub save_path: Option<PathBuf>,
    pub list_palettes: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let source = match self.path {
            _ if self.new => StartupSource::Empty,
            Some(path) => StartupSource::File(path),
            None => StartupSource::Autosave,
        };

        let mut drops = Vec::with_capacity(self.add.len() + 1);
        if let Some(url) = self.background {
            drops.push(DropItem::Url(url));
        }
        for arg in &self.add {
            drops.push(parse_placement(arg)?);
        }

        Ok(StartupConfig {
            source,
            drops,
            size: self.size,
            undo_count: self.undo,
            resolve: self.resolve,
            save_path: self.save,
            list_palettes: self.palettes,
        })
    }
}

impl StartupConfig {
    /// Messages to dispatch, in order
    pub fn intents(&self, default_size: u32) -> Vec<Msg> {
        let size = self.size.unwrap_or(default_size);
        self.drops
            .iter()
            .cloned()
            .map(|item| Msg::from_drop(item, size))
            .chain(std::iter::repeat_with(Msg::undo).take(self.undo_count))
            .collect()
    }
}

/// Parse `GLYPH@X,Y` into a glyph drop
///
/// The split is on the last `@` so glyphs containing `@` still parse.
pub fn parse_placement(arg: &str) -> Result<DropItem, String> {
    let (glyph, coords) = arg
        .rsplit_once('@')
        .ok_or_else(|| format!("Expected GLYPH@X,Y, got '{}'", arg))?;
    if glyph.trim().is_empty() {
        return Err(format!("Missing glyph in '{}'", arg));
    }

    let (x, y) = coords
        .split_once(',')
        .ok_or_else(|| format!("Expected X,Y after '@' in '{}'", arg))?;
    let x: i32 = x
        .trim()
        .parse()
        .map_err(|e| format!("Invalid x in '{}': {}", arg, e))?;
    let y: i32 = y
        .trim()
        .parse()
        .map_err(|e| format!("Invalid y in '{}': {}", arg, e))?;

    Ok(DropItem::Glyph {
        glyph: glyph.to_string(),
        position: Position::new(x, y),
    })
}
