//! Autosave writer
//!
//! Each document change produces an autosave command tagged with the engine
//! revision. Writes run on worker threads and are serialized through a
//! shared high-water mark, so an older snapshot never overwrites a newer one
//! even when threads finish out of order.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::messages::{AppMsg, Msg};
use crate::persistence;

#[derive(Debug, Clone, Default)]
pub struct AutosaveWriter {
    /// Highest generation written so far (0 = nothing written)
    written: Arc<Mutex<u64>>,
}

impl AutosaveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest generation that reached disk
    pub fn written_generation(&self) -> u64 {
        self.written.lock().map(|g| *g).unwrap_or_else(|e| *e.into_inner())
    }

    /// Write `payload` if `generation` is newer than what is on disk
    ///
    /// Returns Ok(false) when the write was skipped as superseded.
    pub fn write(&self, path: &Path, payload: &[u8], generation: u64) -> std::io::Result<bool> {
        let mut written = self.written.lock().unwrap_or_else(|e| e.into_inner());
        if generation <= *written {
            tracing::trace!("Skipping autosave generation {} (have {})", generation, *written);
            return Ok(false);
        }
        persistence::write_payload(path, payload)?;
        *written = generation;
        tracing::trace!("Autosaved generation {} to {}", generation, path.display());
        Ok(true)
    }

    /// Run [`AutosaveWriter::write`] on a worker thread
    ///
    /// Failures are reported as [`AppMsg::AutosaveFailed`].
    pub fn spawn_write(
        &self,
        path: PathBuf,
        payload: Vec<u8>,
        generation: u64,
        tx: Sender<Msg>,
    ) -> JoinHandle<()> {
        let writer = self.clone();
        std::thread::spawn(move || {
            if let Err(e) = writer.write(&path, &payload, generation) {
                let _ = tx.send(Msg::App(AppMsg::AutosaveFailed(format!(
                    "{}: {}",
                    path.display(),
                    e
                ))));
            }
        })
    }
}
