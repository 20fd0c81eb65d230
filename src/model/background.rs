//! Background image resolution state
//!
//! The document only stores a reference (URI). Turning it into pixels is
//! asynchronous; [`BackgroundState`] tracks where that resolution stands for
//! the document's current reference.

use std::fmt;
use std::sync::Arc;

use crate::fetch::FetchError;

/// A decoded background image (RGBA, 4 bytes per pixel)
#[derive(Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Size of the encoded payload that was fetched
    pub byte_len: usize,
}

impl BackgroundImage {
    /// Decode raw image bytes (PNG, JPEG, GIF, BMP, WebP, ICO)
    pub fn decode(bytes: &[u8]) -> Result<Self, FetchError> {
        let img = image::load_from_memory(bytes).map_err(|e| {
            tracing::debug!("Background decode failed: {}", e);
            FetchError::BadImageData
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            pixels: rgba.into_raw(),
            width,
            height,
            byte_len: bytes.len(),
        })
    }
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("byte_len", &self.byte_len)
            .finish()
    }
}

/// Where resolution of the document's background reference stands
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BackgroundState {
    /// No background reference
    #[default]
    Idle,
    /// Fetch in flight for this reference
    Resolving(String),
    /// Reference resolved to a decoded image
    Resolved(String, Arc<BackgroundImage>),
    /// Fetch or decode failed, with a human-readable reason
    Failed(String, String),
}

impl BackgroundState {
    /// The reference this state is about, if any
    pub fn reference(&self) -> Option<&str> {
        match self {
            BackgroundState::Idle => None,
            BackgroundState::Resolving(url)
            | BackgroundState::Resolved(url, _)
            | BackgroundState::Failed(url, _) => Some(url),
        }
    }

    pub fn image(&self) -> Option<&BackgroundImage> {
        match self {
            BackgroundState::Resolved(_, image) => Some(image),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            BackgroundState::Failed(_, reason) => Some(reason),
            _ => None,
        }
    }

    /// Whether a loading indicator should be shown
    pub fn is_resolving(&self) -> bool {
        matches!(self, BackgroundState::Resolving(_))
    }

    /// Short description for status lines and logs
    pub fn summary(&self) -> String {
        match self {
            BackgroundState::Idle => "idle".to_string(),
            BackgroundState::Resolving(url) => format!("resolving {}", url),
            BackgroundState::Resolved(url, image) => {
                format!("resolved {} ({}x{})", url, image.width, image.height)
            }
            BackgroundState::Failed(url, reason) => format!("failed {}: {}", url, reason),
        }
    }
}
