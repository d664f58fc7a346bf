//! Live reload manager.
//!
//! Coordinates file watching and WebSocket broadcasting for live reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, sleep_until};

use super::debouncer::{ReloadDebouncer, WatchEvent, WatchEventKind};

/// Tells connected clients to reload the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ReloadSignal;

/// Stylesheet extension watched alongside the document.
const STYLESHEET_EXTENSION: &str = "css";

/// Manages file watching and broadcasting reload signals.
pub(crate) struct LiveReloadManager {
    source: PathBuf,
    stylesheets: Vec<PathBuf>,
    debounce: Duration,
    broadcaster: broadcast::Sender<ReloadSignal>,
    watcher: Option<RecommendedWatcher>,
}

impl LiveReloadManager {
    /// Create a new live reload manager.
    ///
    /// # Arguments
    ///
    /// * `source` - Absolute path of the markdown document
    /// * `stylesheets` - Local stylesheets the document loads
    /// * `debounce` - Quiet period before a reload is sent
    /// * `broadcaster` - Broadcast channel sender for reload signals
    #[must_use]
    pub(crate) fn new(
        source: PathBuf,
        stylesheets: Vec<PathBuf>,
        debounce: Duration,
        broadcaster: broadcast::Sender<ReloadSignal>,
    ) -> Self {
        Self {
            source,
            stylesheets,
            debounce,
            broadcaster,
            watcher: None,
        }
    }

    /// Directories to watch: the source directory recursively, plus the
    /// directory of every stylesheet outside it.
    fn watch_roots(&self) -> Vec<(PathBuf, RecursiveMode)> {
        let source_dir = self
            .source
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let mut roots = vec![(source_dir.clone(), RecursiveMode::Recursive)];

        for sheet in &self.stylesheets {
            let Some(dir) = sheet.parent() else {
                continue;
            };
            if dir.starts_with(&source_dir) || roots.iter().any(|(root, _)| root == dir) {
                continue;
            }
            roots.push((dir.to_path_buf(), RecursiveMode::NonRecursive));
        }
        roots
    }

    /// Extensions that trigger a reload.
    fn extensions(&self) -> Vec<String> {
        let mut extensions = vec![STYLESHEET_EXTENSION.to_owned()];
        if let Some(ext) = self.source.extension().and_then(|e| e.to_str()) {
            extensions.push(ext.to_ascii_lowercase());
        }
        extensions
    }

    /// Start the file watcher.
    ///
    /// Spawns a background task that debounces file changes and broadcasts
    /// reload signals to connected WebSocket clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the watcher cannot be created or the source
    /// directory cannot be watched. Extra stylesheet directories that cannot be
    /// watched are skipped with a warning.
    pub(crate) fn start(&mut self) -> Result<(), notify::Error> {
        let (tx, rx) = mpsc::channel::<Result<WatchEvent, notify::Error>>(100);

        // Create watcher with callback that sends events to channel
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    for watch_event in convert_event(event) {
                        // Use blocking_send since callback is sync
                        let _ = tx.blocking_send(Ok(watch_event));
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(Err(e));
                }
            }
        })?;

        for (index, (root, mode)) in self.watch_roots().into_iter().enumerate() {
            match watcher.watch(&root, mode) {
                Ok(()) => tracing::debug!(path = %root.display(), "Watching directory"),
                Err(e) if index == 0 => return Err(e),
                Err(e) => {
                    tracing::warn!(path = %root.display(), error = %e, "Cannot watch stylesheet directory");
                }
            }
        }
        self.watcher = Some(watcher);

        let extensions = self.extensions();
        let extensions: Vec<&str> = extensions.iter().map(String::as_str).collect();
        let debouncer = ReloadDebouncer::new(self.debounce, &extensions);

        tokio::spawn(run_watch_loop(rx, debouncer, self.broadcaster.clone()));

        Ok(())
    }

    /// Get a receiver for reload signals.
    #[must_use]
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ReloadSignal> {
        self.broadcaster.subscribe()
    }
}

/// Convert a notify event into one watch event per affected path.
fn convert_event(event: Event) -> Vec<WatchEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => WatchEventKind::Create,
        EventKind::Modify(_) => WatchEventKind::Write,
        _ => WatchEventKind::Other,
    };
    let at = Instant::now();

    event
        .paths
        .into_iter()
        .map(|path| WatchEvent { path, kind, at })
        .collect()
}

/// Drive the debouncer until the event stream ends or reports an error.
///
/// Waits for whichever comes first: the next filesystem event or the pending
/// deadline. A watcher error ends the loop; it is not restarted.
pub(crate) async fn run_watch_loop(
    mut events: mpsc::Receiver<Result<WatchEvent, notify::Error>>,
    mut debouncer: ReloadDebouncer,
    broadcaster: broadcast::Sender<ReloadSignal>,
) {
    loop {
        let deadline = debouncer.deadline();

        tokio::select! {
            message = events.recv() => match message {
                Some(Ok(event)) => {
                    if debouncer.record(&event) {
                        tracing::debug!(path = %event.path.display(), kind = ?event.kind, "Recorded filesystem event");
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "File watcher failed, live reload stopped");
                    break;
                }
                None => break,
            },
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if debouncer.fire(Instant::now()) {
                    let clients = broadcaster.send(ReloadSignal).unwrap_or(0);
                    tracing::info!(clients, "Reload signal sent");
                }
            }
        }
    }
}
