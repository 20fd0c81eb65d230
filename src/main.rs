//! emojiart - headless front end over the document engine

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use emojiart::cli::{CliArgs, StartupConfig, StartupSource};
use emojiart::config_paths;
use emojiart::fetch::HttpFetcher;
use emojiart::messages::{AppMsg, Msg};
use emojiart::model::{AppModel, Document, PaletteStore};
use emojiart::persistence;
use emojiart::runtime::Runtime;
use emojiart::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use emojiart::EditorConfig;

/// Upper bound on waiting for fetches and writes before exiting
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> Result<()> {
    emojiart::tracing::init();

    let startup = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;
    let config = EditorConfig::load();

    let autosave_path = if config.autosave {
        config_paths::autosave_file()
    } else {
        None
    };
    let document = open_document(&startup.source, autosave_path.as_deref())?;

    let storage: Box<dyn KeyValueStore> = match config_paths::palettes_file() {
        Some(path) => Box::new(JsonFileStore::open(path)),
        None => Box::new(MemoryStore::new()),
    };
    let palettes = PaletteStore::new(config.palette_store.clone(), storage);

    let default_size = config.default_token_size;
    let mut model = AppModel::new(document, palettes, config).with_autosave_path(autosave_path);
    if let StartupSource::File(path) = &startup.source {
        model.document_path = Some(path.clone());
    }

    let mut runtime = Runtime::new(model, Arc::new(HttpFetcher::new()))
        .with_background_fetch(startup.resolve);
    if startup.resolve {
        runtime.start();
    }

    for msg in startup.intents(default_size) {
        runtime.dispatch(msg);
    }
    if let Some(path) = startup.save_path.clone() {
        runtime.dispatch(Msg::App(AppMsg::SaveAs(path)));
    }

    if !runtime.wait_idle(IDLE_TIMEOUT) {
        tracing::warn!("Exiting with background work still pending");
    }

    report(runtime.model(), &startup);

    if let Some(alert) = runtime.model().ui.alert.clone() {
        bail!("{}: {}", alert.title(), alert.message());
    }
    Ok(())
}

fn open_document(source: &StartupSource, autosave: Option<&std::path::Path>) -> Result<Document> {
    match source {
        StartupSource::Empty => Ok(Document::new()),
        StartupSource::Autosave => Ok(autosave
            .map(persistence::load_autosave)
            .unwrap_or_default()),
        StartupSource::File(path) => persistence::read_document(path)
            .with_context(|| format!("Failed to open {}", path.display())),
    }
}

fn report(model: &AppModel, startup: &StartupConfig) {
    let document = model.document();

    println!(
        "background: {}",
        document.background().unwrap_or("(none)")
    );
    if startup.resolve {
        println!("background state: {}", model.background.summary());
    }

    println!("emojis: {}", document.len());
    for token in document.tokens() {
        println!(
            "  #{} {} at ({}, {}) size {}",
            token.id(),
            token.glyph,
            token.position.x,
            token.position.y,
            token.size
        );
    }
    if let Some(bounds) = document.bounding_box() {
        println!(
            "bounds: {}x{} at ({}, {})",
            bounds.width, bounds.height, bounds.x, bounds.y
        );
    }
    if let Some(label) = model.history.undo_label() {
        println!("undo: {} ({} steps)", label, model.history.undo_count());
    }

    if startup.list_palettes {
        let store = &model.palettes;
        println!("palettes ({}):", store.name());
        for (index, palette) in store.palettes().iter().enumerate() {
            let marker = if index == store.cursor_index() { '>' } else { ' ' };
            println!(
                "{} {} {}",
                marker,
                palette.name,
                palette.unique_glyphs().concat()
            );
        }
    }

    if !model.ui.status_message.is_empty() {
        println!("{}", model.ui.status_message);
    }
}
