//! Config file watcher for automatic reload.
//!
//! [`ConfigWatcher`] reports file changes, settled over a debounce delay.
//! [`SettingsWatcher`] sits on top of it, reloads the file and turns each
//! reload into [`SettingChange`] notifications for the options that changed.

use crate::config::Config;
use crate::types::SettingChange;
use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::{Duration, Instant};

/// Poll interval used when the native backend is unavailable.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Event indicating the config file has changed and needs reloading.
#[derive(Debug, Clone)]
pub struct ConfigReloadEvent {
    /// Path to the config file that changed.
    pub path: PathBuf,
}

/// Watches the config file for changes and sends reload events.
///
/// Every change to the file is forwarded. The `*_settled` receivers coalesce
/// a burst of changes into one event once the file has been quiet for the
/// debounce delay, so a reload never observes a half-written file and the
/// last write of a burst is never lost.
pub struct ConfigWatcher {
    /// The file system watcher (kept alive to maintain watching).
    _watcher: Box<dyn Watcher + Send>,
    /// Receiver for config change events.
    event_receiver: Receiver<ConfigReloadEvent>,
    /// Quiet period required before a burst of changes is reported.
    debounce_delay: Duration,
    /// Time of the most recent matching event, written by the watcher thread.
    last_event_time: Arc<Mutex<Option<Instant>>>,
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher")
            .field("debounce_delay", &self.debounce_delay)
            .finish_non_exhaustive()
    }
}

/// State shared by the watcher callback, cloned once per backend attempt.
#[derive(Clone)]
struct HandlerState {
    filename: OsString,
    canonical_path: PathBuf,
    tx: Sender<ConfigReloadEvent>,
    last_event_time: Arc<Mutex<Option<Instant>>>,
}

impl HandlerState {
    fn handle(&self, result: std::result::Result<Event, notify::Error>) {
        let Ok(event) = result else {
            return;
        };

        // Create covers atomic saves (temp file renamed over the config).
        if !matches!(
            event.kind,
            notify::EventKind::Modify(_) | notify::EventKind::Create(_)
        ) {
            return;
        }

        let touches_config = event
            .paths
            .iter()
            .any(|p| p.file_name().is_some_and(|f| f == self.filename));
        if !touches_config {
            return;
        }

        *self.last_event_time.lock() = Some(Instant::now());
        let reload_event = ConfigReloadEvent {
            path: self.canonical_path.clone(),
        };
        log::debug!("Config file changed: {}", reload_event.path.display());
        if let Err(e) = self.tx.send(reload_event) {
            log::error!("Failed to send config reload event: {}", e);
        }
    }

    fn into_handler(self) -> impl Fn(std::result::Result<Event, notify::Error>) + Send + 'static {
        move |result| self.handle(result)
    }
}

impl ConfigWatcher {
    /// Create a new config watcher.
    ///
    /// Uses the platform's native watcher when it can be initialised and falls
    /// back to a `PollWatcher` otherwise (containers, network filesystems).
    ///
    /// # Errors
    /// Returns an error if the config file doesn't exist or watching fails on both
    /// backends.
    pub fn new(config_path: &Path, debounce_delay_ms: u64) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        }

        let canonical = config_path
            .canonicalize()
            .unwrap_or_else(|_| config_path.to_path_buf());

        let filename = canonical
            .file_name()
            .context("Config path has no filename")?
            .to_os_string();

        let parent_dir = canonical
            .parent()
            .context("Config path has no parent directory")?
            .to_path_buf();

        let (tx, rx) = channel::<ConfigReloadEvent>();
        let last_event_time = Arc::new(Mutex::new(None));
        let state = HandlerState {
            filename,
            canonical_path: canonical.clone(),
            tx,
            last_event_time: Arc::clone(&last_event_time),
        };

        let mut watcher = Self::create_watcher(state)?;
        watcher
            .watch(&parent_dir, RecursiveMode::NonRecursive)
            .with_context(|| {
                format!("Failed to watch config directory: {}", parent_dir.display())
            })?;

        log::info!("Config hot reload: watching {}", canonical.display());

        Ok(Self {
            _watcher: watcher,
            event_receiver: rx,
            debounce_delay: Duration::from_millis(debounce_delay_ms),
            last_event_time,
        })
    }

    fn create_watcher(state: HandlerState) -> Result<Box<dyn Watcher + Send>> {
        match notify::recommended_watcher(state.clone().into_handler()) {
            Ok(w) => {
                log::debug!("Config watcher: using native (RecommendedWatcher) backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!(
                    "Config watcher: native backend unavailable ({}); falling back to PollWatcher",
                    e
                );
                let poll_watcher = PollWatcher::new(
                    state.into_handler(),
                    NotifyConfig::default().with_poll_interval(POLL_INTERVAL),
                )
                .context("Failed to create fallback PollWatcher")?;
                Ok(Box::new(poll_watcher))
            }
        }
    }

    /// Check for pending config change events (non-blocking).
    pub fn try_recv(&self) -> Option<ConfigReloadEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next config change event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ConfigReloadEvent> {
        match self.event_receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Config watcher channel disconnected");
                None
            }
        }
    }

    /// Like [`try_recv`](Self::try_recv), but waits for the burst to settle.
    pub fn try_recv_settled(&self) -> Option<ConfigReloadEvent> {
        let first = self.try_recv()?;
        Some(self.settle(first))
    }

    /// Like [`recv_timeout`](Self::recv_timeout), but once a change arrives,
    /// waits until the file has been quiet for the debounce delay and folds
    /// every event queued meanwhile into the returned one.
    pub fn recv_settled(&self, timeout: Duration) -> Option<ConfigReloadEvent> {
        let first = self.recv_timeout(timeout)?;
        Some(self.settle(first))
    }

    fn settle(&self, mut latest: ConfigReloadEvent) -> ConfigReloadEvent {
        loop {
            let last = *self.last_event_time.lock();
            let quiet_for = last.map_or(self.debounce_delay, |t| t.elapsed());
            if quiet_for >= self.debounce_delay {
                break;
            }
            std::thread::sleep(self.debounce_delay - quiet_for);
        }
        // Events arriving after this drain stay queued and trigger another reload.
        let mut coalesced = 0usize;
        while let Ok(event) = self.event_receiver.try_recv() {
            latest = event;
            coalesced += 1;
        }
        if coalesced > 0 {
            log::trace!("Coalesced {} config change events", coalesced);
        }
        log::info!("Config file settled: {}", latest.path.display());
        latest
    }
}

/// Turns config file reloads into discrete [`SettingChange`] notifications.
#[derive(Debug)]
pub struct SettingsWatcher {
    watcher: ConfigWatcher,
    path: PathBuf,
    current: Config,
}

impl SettingsWatcher {
    /// Watch `path`, treating `current` as the configuration already applied.
    pub fn new(path: &Path, current: Config) -> Result<Self> {
        let watcher = ConfigWatcher::new(path, current.watch_debounce_ms)?;
        Ok(Self {
            watcher,
            path: path.to_path_buf(),
            current,
        })
    }

    /// The configuration as of the last successful reload.
    pub fn current(&self) -> &Config {
        &self.current
    }

    /// Drain pending reloads without blocking.
    pub fn poll(&mut self) -> Vec<SettingChange> {
        let mut changes = Vec::new();
        while self.watcher.try_recv_settled().is_some() {
            changes.extend(self.reload());
        }
        changes
    }

    /// Block up to `timeout` for a change, let it settle, then reload.
    pub fn wait(&mut self, timeout: Duration) -> Vec<SettingChange> {
        if self.watcher.recv_settled(timeout).is_none() {
            return Vec::new();
        }
        let mut changes = self.reload();
        changes.extend(self.poll());
        changes
    }

    /// Re-read the file and diff it against the current configuration.
    ///
    /// A file that fails to load keeps the previous configuration in effect.
    pub fn reload(&mut self) -> Vec<SettingChange> {
        match Config::load_from(&self.path) {
            Ok(new) => {
                let changes = Config::diff(&self.current, &new);
                self.current = new;
                changes
            }
            Err(e) => {
                log::warn!("Ignoring config reload from {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }
}
