//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use emojiart::commands::Cmd;
use emojiart::config::EditorConfig;
use emojiart::fetch::{BackgroundFetcher, FetchError};
use emojiart::model::{AppModel, BackgroundImage, Document, PaletteStore};
use emojiart::storage::MemoryStore;
use image::{ImageBuffer, ImageFormat, Rgba};

/// Model over an empty document with in-memory palettes and no autosave
pub fn test_model() -> AppModel {
    test_model_with(Document::new())
}

/// Model over `document` with in-memory palettes and no autosave
pub fn test_model_with(document: Document) -> AppModel {
    let palettes = PaletteStore::new("Test", Box::new(MemoryStore::new()));
    AppModel::new(document, palettes, EditorConfig::default())
}

/// Model that autosaves to `path`
pub fn autosaving_model(path: PathBuf) -> AppModel {
    test_model().with_autosave_path(Some(path))
}

/// Encode a solid `width` x `height` PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(width, height, Rgba([0u8, 128, 255, 255]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// Decoded solid image, as a completed fetch would deliver it
pub fn test_image(width: u32, height: u32) -> BackgroundImage {
    BackgroundImage::decode(&png_bytes(width, height)).unwrap()
}

/// Leaf commands produced by an update, in order
pub fn leaf_cmds(cmd: Option<Cmd>) -> Vec<Cmd> {
    cmd.map(Cmd::flatten).unwrap_or_default()
}

/// URLs of the fetches an update asked for
pub fn fetched_urls(cmd: Option<Cmd>) -> Vec<String> {
    leaf_cmds(cmd)
        .into_iter()
        .filter_map(|cmd| match cmd {
            Cmd::FetchBackground { url, .. } => Some(url),
            _ => None,
        })
        .collect()
}

/// Generation of the single fetch an update asked for
pub fn fetch_generation(cmd: Option<Cmd>) -> u64 {
    let generations: Vec<u64> = leaf_cmds(cmd)
        .into_iter()
        .filter_map(|cmd| match cmd {
            Cmd::FetchBackground { generation, .. } => Some(generation),
            _ => None,
        })
        .collect();
    assert_eq!(generations.len(), 1, "expected exactly one fetch");
    generations[0]
}

/// Fetcher with canned responses and optional per-URL gates
///
/// A gated URL blocks inside `fetch` until its gate sender is used or
/// dropped, which lets tests choose the order completions arrive in.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, Result<Vec<u8>, FetchError>>,
    gates: Mutex<HashMap<String, Receiver<()>>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a `width` x `height` PNG for `url`
    pub fn with_image(mut self, url: &str, width: u32, height: u32) -> Self {
        self.responses
            .insert(url.to_string(), Ok(png_bytes(width, height)));
        self
    }

    /// Serve raw bytes for `url`
    pub fn with_bytes(mut self, url: &str, bytes: &[u8]) -> Self {
        self.responses.insert(url.to_string(), Ok(bytes.to_vec()));
        self
    }

    /// Hold fetches of `url` until the returned sender fires or is dropped
    pub fn gate(&self, url: &str) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.gates.lock().unwrap().insert(url.to_string(), rx);
        tx
    }
}

impl BackgroundFetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let gate = self.gates.lock().unwrap().remove(url);
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("404 for {}", url))))
    }
}
