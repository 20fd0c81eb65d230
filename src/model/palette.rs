//! Reusable emoji palettes
//!
//! A [`PaletteStore`] is a named, ordered, never-empty collection of
//! palettes with a cyclic cursor. Every mutation is persisted immediately
//! through the injected [`KeyValueStore`].

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

use crate::storage::KeyValueStore;

/// A named run of glyphs
///
/// `glyphs` may contain duplicates; [`Palette::unique_glyphs`] is what
/// choosers display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "emojis")]
    pub glyphs: String,
}

impl Palette {
    /// Create a palette with a fresh identity
    pub fn new(name: impl Into<String>, glyphs: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            glyphs: glyphs.into(),
        }
    }

    /// Built-in palettes, freshly identified on every call
    pub fn built_ins() -> Vec<Palette> {
        vec![
            Palette::new("Weather", "☀️🌤️⛅️🌥️☁️🌦️🌧️⛈️🌩️🌨️❄️💨☔️💧💦🌊☂️🌫️🌪️⚡️"),
            Palette::new("Animals", "🐾🐥🐛🦋🐌🐞🐜🦅🪱🕷️🐝🐿️🦨"),
            Palette::new("Nature", "🪵🍁🍂🍃🍄🪺🌵🎄🌲🌳🌴🪨🌾💐🌷🌹🥀🪻🪷🌺🌸🌼🌻"),
            Palette::new("Other", "👽💀🧝‍♀️🧚🚲"),
        ]
    }

    /// Placeholder used when no built-ins are available
    pub fn warning() -> Palette {
        Palette::new("Warning", "⚠️")
    }

    /// Glyphs in order with duplicates removed (by grapheme cluster)
    pub fn unique_glyphs(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for glyph in self.glyphs.graphemes(true) {
            if !seen.contains(&glyph) {
                seen.push(glyph);
            }
        }
        seen
    }

    /// Prepend `glyphs`, keeping only the first occurrence of each glyph
    pub fn add_glyphs(&mut self, glyphs: &str) {
        let combined = format!("{}{}", glyphs, self.glyphs);
        let mut unique = String::with_capacity(combined.len());
        let mut seen: Vec<&str> = Vec::new();
        for glyph in combined.graphemes(true) {
            if glyph.trim().is_empty() || seen.contains(&glyph) {
                continue;
            }
            seen.push(glyph);
            unique.push_str(glyph);
        }
        self.glyphs = unique;
    }

    /// Remove every occurrence of `glyph`
    pub fn remove_glyph(&mut self, glyph: &str) {
        self.glyphs = self
            .glyphs
            .graphemes(true)
            .filter(|g| *g != glyph)
            .collect();
    }
}

/// Persisted shape of a store
#[derive(Debug, Serialize, Deserialize)]
struct StoredPalettes {
    palettes: Vec<Palette>,
    /// Any integer; reduced by floor modulo on use
    #[serde(rename = "cursorIndex", default)]
    cursor_index: isize,
}

/// Named collection of palettes with a cursor
#[derive(Debug)]
pub struct PaletteStore {
    name: String,
    palettes: Vec<Palette>,
    /// Raw cursor; always read through `cursor_index`
    cursor: isize,
    storage: Box<dyn KeyValueStore>,
}

impl PaletteStore {
    /// Open the store named `name`, seeding built-ins if nothing is persisted
    pub fn new(name: impl Into<String>, storage: Box<dyn KeyValueStore>) -> Self {
        let name = name.into();
        let stored = storage
            .get(&Self::storage_key(&name))
            .and_then(|bytes| match serde_json::from_slice::<StoredPalettes>(&bytes) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable palette store '{}': {}", name, e);
                    None
                }
            })
            .filter(|stored| !stored.palettes.is_empty());

        let mut store = Self {
            name,
            palettes: Vec::new(),
            cursor: 0,
            storage,
        };

        match stored {
            Some(stored) => {
                tracing::debug!(
                    "Loaded palette store '{}' ({} palettes)",
                    store.name,
                    stored.palettes.len()
                );
                store.palettes = stored.palettes;
                store.cursor = stored.cursor_index;
            }
            None => {
                tracing::debug!("Seeding palette store '{}' with built-ins", store.name);
                store.palettes = Self::seed();
                store.persist();
            }
        }
        store
    }

    fn storage_key(name: &str) -> String {
        format!("PaletteStore:{}", name)
    }

    fn seed() -> Vec<Palette> {
        let built_ins = Palette::built_ins();
        if built_ins.is_empty() {
            vec![Palette::warning()]
        } else {
            built_ins
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    /// Never true: deleting the last palette reseeds the store
    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// Reduce any raw index into `[0, len)` using floor modulo
    fn bounds_checked(&self, index: isize) -> usize {
        index.rem_euclid(self.palettes.len() as isize) as usize
    }

    pub fn cursor_index(&self) -> usize {
        self.bounds_checked(self.cursor)
    }

    /// Move the cursor; negative and oversized values wrap around
    pub fn set_cursor_index(&mut self, index: isize) {
        self.cursor = self.bounds_checked(index) as isize;
        self.persist();
    }

    /// The palette under the cursor
    pub fn current(&self) -> &Palette {
        &self.palettes[self.cursor_index()]
    }

    /// Advance the cursor by one, wrapping at the end
    pub fn next(&mut self) {
        self.set_cursor_index(self.cursor_index() as isize + 1);
    }

    /// Delete the palette under the cursor
    ///
    /// Deleting the last one reseeds the built-ins.
    pub fn delete_current(&mut self) {
        let index = self.cursor_index();
        let removed = self.palettes.remove(index);
        tracing::debug!("Deleted palette '{}' from '{}'", removed.name, self.name);
        if self.palettes.is_empty() {
            self.palettes = Self::seed();
        }
        self.cursor = self.bounds_checked(index as isize) as isize;
        self.persist();
    }

    /// Insert `palette` at `at` (default: the cursor)
    ///
    /// If a palette with the same id exists it is moved to the index and
    /// replaced, so ids stay unique and the length does not change.
    pub fn insert(&mut self, palette: Palette, at: Option<isize>) {
        let index = self.bounds_checked(at.unwrap_or(self.cursor));
        if let Some(existing) = self.position_of(&palette) {
            self.palettes.remove(existing);
            let index = index.min(self.palettes.len());
            self.palettes.insert(index, palette);
        } else {
            self.palettes.insert(index, palette);
        }
        self.persist();
    }

    /// Insert a new palette built from `name` and `glyphs`
    pub fn insert_new(&mut self, name: &str, glyphs: &str, at: Option<isize>) {
        self.insert(Palette::new(name, glyphs), at);
    }

    /// Put `palette` at the end, replacing any palette with the same id
    pub fn append(&mut self, palette: Palette) {
        if let Some(existing) = self.position_of(&palette) {
            self.palettes.remove(existing);
        }
        self.palettes.push(palette);
        self.persist();
    }

    /// Edit the palette under the cursor in place
    pub fn edit_current(&mut self, edit: impl FnOnce(&mut Palette)) {
        let index = self.cursor_index();
        edit(&mut self.palettes[index]);
        self.persist();
    }

    fn position_of(&self, palette: &Palette) -> Option<usize> {
        self.palettes.iter().position(|p| p.id == palette.id)
    }

    /// Write palettes and cursor to storage; failures are logged only
    fn persist(&mut self) {
        if self.palettes.is_empty() {
            return;
        }
        let stored = StoredPalettes {
            palettes: self.palettes.clone(),
            cursor_index: self.cursor_index() as isize,
        };
        let bytes = match serde_json::to_vec(&stored) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to encode palette store '{}': {}", self.name, e);
                return;
            }
        };
        if let Err(e) = self.storage.set(&Self::storage_key(&self.name), bytes) {
            tracing::warn!("Failed to persist palette store '{}': {}", self.name, e);
        }
    }
}
