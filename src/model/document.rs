//! Document model - background reference plus an ordered set of placed tokens
//!
//! This is pure data. Mutations here carry no undo awareness; the
//! [`DocumentEngine`](super::engine::DocumentEngine) layers undo and change
//! notification on top.

use serde::{Deserialize, Serialize};

/// Identifier of a token within a single document
pub type TokenId = u64;

/// Position in document space
///
/// Origin is the document center and y increases upward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ZERO: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Drag translation in input space (top-left origin, y increases downward)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Axis-aligned rectangle in document space, `(x, y)` is the minimum corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Center point of the rectangle (rounded toward the minimum corner)
    pub fn center(&self) -> Position {
        Position::new(
            clamp_i32(self.x as i64 + (self.width / 2) as i64),
            clamp_i32(self.y as i64 + (self.height / 2) as i64),
        )
    }

    /// Smallest rectangle containing both `self` and `other`
    ///
    /// Extents past `u32::MAX` saturate.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.right().max(other.right());
        let max_y = self.top().max(other.top());
        Rect {
            x: min_x,
            y: min_y,
            width: clamp_u32(max_x - min_x as i64),
            height: clamp_u32(max_y - min_y as i64),
        }
    }

    fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    fn top(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// A placed glyph on the canvas
///
/// The id is assigned by the owning [`Document`] and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "string")]
    pub glyph: String,
    pub position: Position,
    /// Display scale (font size)
    pub size: u32,
    id: TokenId,
}

impl Token {
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Square footprint of the token, centered on its position
    pub fn frame(&self) -> Rect {
        // size / 2 always fits in i32
        let half = (self.size / 2) as i32;
        Rect {
            x: self.position.x.saturating_sub(half),
            y: self.position.y.saturating_sub(half),
            width: self.size,
            height: self.size,
        }
    }
}

/// The editable document
///
/// Invariant: token ids are distinct and `next_id` is greater than all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DocumentPayload")]
pub struct Document {
    background: Option<String>,
    #[serde(rename = "emojis")]
    tokens: Vec<Token>,
    #[serde(rename = "nextId")]
    next_id: TokenId,
}

impl Document {
    /// Create an empty document with no background
    pub fn new() -> Self {
        Self {
            background: None,
            tokens: Vec::new(),
            next_id: 1,
        }
    }

    /// Current background reference, if any
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Replace the background reference
    pub fn set_background(&mut self, background: Option<String>) {
        self.background = background;
    }

    /// All tokens in insertion order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The id the next added token will receive
    pub fn next_id(&self) -> TokenId {
        self.next_id
    }

    /// Raise `next_id` to at least `next_id`; never lowers it
    pub(crate) fn reserve_ids(&mut self, next_id: TokenId) {
        self.next_id = self.next_id.max(next_id);
    }

    /// Append a new token and return its freshly assigned id
    pub fn add_token(&mut self, glyph: impl Into<String>, position: Position, size: u32) -> TokenId {
        let id = self.next_id;
        // Decoding guarantees next_id < TokenId::MAX
        self.next_id = self.next_id.saturating_add(1);
        self.tokens.push(Token {
            glyph: glyph.into(),
            position,
            size,
            id,
        });
        id
    }

    /// Remove the token with `id`; absent ids are ignored
    pub fn remove_token(&mut self, id: TokenId) {
        self.tokens.retain(|token| token.id != id);
    }

    pub fn get_token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|token| token.id == id)
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.get_token(id).is_some()
    }

    /// Apply `mutator` to the token with `id` if present
    ///
    /// Returns whether a token was found.
    pub fn update_token(&mut self, id: TokenId, mutator: impl FnOnce(&mut Token)) -> bool {
        match self.tokens.iter_mut().find(|token| token.id == id) {
            Some(token) => {
                mutator(token);
                true
            }
            None => false,
        }
    }

    /// Union of all token frames, or `None` for an empty document
    pub fn bounding_box(&self) -> Option<Rect> {
        self.tokens
            .iter()
            .map(Token::frame)
            .reduce(|acc, frame| acc.union(&frame))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire shape accepted when decoding a [`Document`]
///
/// `nextId` is optional so payloads that only carry `background` and
/// `emojis` still decode; it is repaired from the token ids.
#[derive(Deserialize)]
struct DocumentPayload {
    #[serde(default)]
    background: Option<String>,
    emojis: Vec<Token>,
    #[serde(rename = "nextId", default)]
    next_id: Option<TokenId>,
}

impl TryFrom<DocumentPayload> for Document {
    type Error = String;

    fn try_from(payload: DocumentPayload) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::with_capacity(payload.emojis.len());
        for token in &payload.emojis {
            if !seen.insert(token.id) {
                return Err(format!("duplicate emoji id {}", token.id));
            }
        }

        let mut after_max: TokenId = 1;
        for token in &payload.emojis {
            let next = token
                .id
                .checked_add(1)
                .ok_or_else(|| format!("emoji id {} out of range", token.id))?;
            after_max = after_max.max(next);
        }
        let next_id = payload.next_id.unwrap_or(0).max(after_max);
        if next_id == TokenId::MAX {
            return Err(format!("nextId {} out of range", next_id));
        }

        Ok(Self {
            background: payload.background,
            tokens: payload.emojis,
            next_id,
        })
    }
}
