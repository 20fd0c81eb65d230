//! Runtime - drives the update loop and executes commands
//!
//! This module owns the message channel and the worker threads:
//! - `autosave` - coalescing autosave writer
//!
//! The presentation layer (or the CLI) calls [`Runtime::dispatch`] with user
//! intents and [`Runtime::process_async_messages`] whenever it wants to pick
//! up completions from background work.

mod autosave;

pub use autosave::AutosaveWriter;

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::commands::Cmd;
use crate::fetch::{self, BackgroundFetcher};
use crate::messages::{AppMsg, Msg};
use crate::model::AppModel;
use crate::persistence;
use crate::update::{begin_background_resolution, update};

pub struct Runtime {
    model: AppModel,
    fetcher: Arc<dyn BackgroundFetcher>,
    /// When false, fetch commands are dropped and backgrounds stay unresolved
    fetch_backgrounds: bool,
    autosave: AutosaveWriter,
    workers: Vec<JoinHandle<()>>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
}

impl Runtime {
    pub fn new(model: AppModel, fetcher: Arc<dyn BackgroundFetcher>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            fetcher,
            fetch_backgrounds: true,
            autosave: AutosaveWriter::new(),
            workers: Vec::new(),
            msg_tx,
            msg_rx,
        }
    }

    /// Enable or disable background fetching (enabled by default)
    pub fn with_background_fetch(mut self, enabled: bool) -> Self {
        self.fetch_backgrounds = enabled;
        self
    }

    /// Start resolving the background of the document the session opened with
    pub fn start(&mut self) {
        if let Some(cmd) = begin_background_resolution(&mut self.model) {
            self.process_cmd(cmd);
        }
    }

    #[inline]
    pub fn model(&self) -> &AppModel {
        &self.model
    }

    /// Apply a message and run the commands it produces
    ///
    /// Returns true if the model changed in a way the view should re-read.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        match update(&mut self.model, msg) {
            Some(cmd) => {
                let needs_redraw = cmd.needs_redraw();
                self.process_cmd(cmd);
                needs_redraw
            }
            None => false,
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => {}
            Cmd::FetchBackground { url, .. } if !self.fetch_backgrounds => {
                tracing::debug!("Background fetching disabled, not resolving {}", url);
            }
            Cmd::FetchBackground { url, generation } => {
                let handle = fetch::spawn_resolve(
                    Arc::clone(&self.fetcher),
                    url,
                    generation,
                    self.msg_tx.clone(),
                );
                self.workers.push(handle);
            }
            Cmd::Autosave {
                path,
                payload,
                generation,
            } => {
                let handle = self
                    .autosave
                    .spawn_write(path, payload, generation, self.msg_tx.clone());
                self.workers.push(handle);
            }
            Cmd::SaveFile { path, payload } => {
                let tx = self.msg_tx.clone();
                self.workers.push(std::thread::spawn(move || {
                    let result =
                        persistence::write_payload(&path, &payload).map_err(|e| e.to_string());
                    let _ = tx.send(Msg::App(AppMsg::SaveCompleted { path, result }));
                }));
            }
            Cmd::LoadFile { path } => {
                let tx = self.msg_tx.clone();
                self.workers.push(std::thread::spawn(move || {
                    let result = std::fs::read(&path).map_err(|e| e.to_string());
                    let _ = tx.send(Msg::App(AppMsg::FileLoaded { path, result }));
                }));
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
        self.workers.retain(|h| !h.is_finished());
    }

    /// Drain completions that have already arrived
    ///
    /// Returns true if any of them needs a redraw.
    pub fn process_async_messages(&mut self) -> bool {
        let mut needs_redraw = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            if self.dispatch(msg) {
                needs_redraw = true;
            }
        }
        needs_redraw
    }

    /// Block for at most `timeout` until one completion arrives and apply it
    ///
    /// Returns false on timeout.
    pub fn wait_for_message(&mut self, timeout: Duration) -> bool {
        match self.msg_rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.dispatch(msg);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Run until every worker finished and its completion was applied
    ///
    /// Returns false if work is still outstanding after `timeout`.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.process_async_messages();
            self.workers.retain(|h| !h.is_finished());
            if self.workers.is_empty() {
                // A worker may have sent right before finishing
                self.process_async_messages();
                if self.workers.is_empty() {
                    return true;
                }
                continue;
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::warn!("{} workers still running after {:?}", self.workers.len(), timeout);
                return false;
            }
            self.wait_for_message((deadline - now).min(Duration::from_millis(10)));
        }
    }
}
