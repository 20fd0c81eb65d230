//! Background fetching
//!
//! A fetch is a single GET for the reference followed by an image decode.
//! [`spawn_resolve`] runs that on a worker thread and posts the outcome back
//! as a [`BackgroundMsg::Resolved`] message; the update loop decides whether
//! the result is still wanted.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::messages::{BackgroundMsg, Msg};
use crate::model::BackgroundImage;

/// Why a background could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network, HTTP status or file I/O failure
    #[error("{0}")]
    Transport(String),
    /// Bytes arrived but are not a decodable image
    #[error("bad image data")]
    BadImageData,
}

/// Capability to load the raw bytes behind a background reference
pub trait BackgroundFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetches `http(s)://` references over the network and `file://` references
/// (or bare paths) from disk
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackgroundFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(path) = local_path(url) {
            return std::fs::read(&path)
                .map_err(|e| FetchError::Transport(format!("{}: {}", path.display(), e)));
        }

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Map `file://` URIs and bare filesystem paths to a path
fn local_path(url: &str) -> Option<PathBuf> {
    if let Some(rest) = url.strip_prefix("file://") {
        // file:///abs/path and file://localhost/abs/path
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        return Some(PathBuf::from(rest));
    }
    if url.contains("://") {
        return None;
    }
    Some(Path::new(url).to_path_buf())
}

/// Fetch and decode in the calling thread
pub fn resolve(fetcher: &dyn BackgroundFetcher, url: &str) -> Result<BackgroundImage, FetchError> {
    let bytes = fetcher.fetch(url)?;
    BackgroundImage::decode(&bytes)
}

/// Resolve `url` on a worker thread, posting the result to `tx`
///
/// There is no cancellation: a superseded fetch runs to completion and its
/// result is discarded by the staleness check on arrival.
pub fn spawn_resolve(
    fetcher: Arc<dyn BackgroundFetcher>,
    url: String,
    generation: u64,
    tx: Sender<Msg>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        tracing::debug!("Fetching background {}", url);
        let result = resolve(fetcher.as_ref(), &url).map(Arc::new);
        if let Err(e) = &result {
            tracing::debug!("Background fetch for {} failed: {}", url, e);
        }
        // Receiver gone means the runtime shut down; nothing left to update
        let _ = tx.send(Msg::Background(BackgroundMsg::Resolved {
            url,
            generation,
            result,
        }));
    })
}
