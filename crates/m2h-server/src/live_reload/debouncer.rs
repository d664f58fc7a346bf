//! Reload debouncing.
//!
//! Collapses bursts of filesystem events into a single reload. Editors often
//! emit several events per save (write, truncate, rename), and a stylesheet
//! rebuild may land right after the document save.
//!
//! ```text
//! Idle ──qualifying event──► Pending{deadline}
//! Pending ──qualifying event──► Pending{new deadline}
//! Pending ──deadline reached──► (reload) ──► Idle
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;

/// Kind of filesystem event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WatchEventKind {
    Write,
    Create,
    Other,
}

/// A raw filesystem event.
#[derive(Clone, Debug)]
pub(crate) struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchEventKind,
    pub at: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Pending { deadline: Instant },
}

/// Debounce state machine for one watched document.
///
/// Owned by the watch loop; not shared between tasks.
#[derive(Debug)]
pub(crate) struct ReloadDebouncer {
    window: Duration,
    extensions: Vec<String>,
    state: State,
}

impl ReloadDebouncer {
    /// Create a debouncer that reacts to files with one of `extensions`.
    pub(crate) fn new(window: Duration, extensions: &[&str]) -> Self {
        Self {
            window,
            extensions: extensions.iter().map(|ext| ext.to_ascii_lowercase()).collect(),
            state: State::Idle,
        }
    }

    fn is_watched(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|w| w.eq_ignore_ascii_case(ext)))
    }

    /// Record an event. Returns `true` if it (re)armed the reload timer.
    ///
    /// Only writes and creations of watched extensions qualify. A qualifying
    /// event while pending replaces the deadline.
    pub(crate) fn record(&mut self, event: &WatchEvent) -> bool {
        if event.kind == WatchEventKind::Other || !self.is_watched(&event.path) {
            return false;
        }
        self.state = State::Pending {
            deadline: event.at + self.window,
        };
        true
    }

    /// When the pending reload is due, if any.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        match self.state {
            State::Idle => None,
            State::Pending { deadline } => Some(deadline),
        }
    }

    /// Consume the pending reload if its deadline has passed.
    ///
    /// Returns `true` exactly once per quiet period.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.state {
            State::Pending { deadline } if now >= deadline => {
                self.state = State::Idle;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WINDOW: Duration = Duration::from_millis(300);

    fn event(path: &str, kind: WatchEventKind, at: Instant) -> WatchEvent {
        WatchEvent {
            path: PathBuf::from(path),
            kind,
            at,
        }
    }

    fn debouncer() -> ReloadDebouncer {
        ReloadDebouncer::new(WINDOW, &["md", "css"])
    }

    #[test]
    fn test_single_event_fires_after_window() {
        let mut debouncer = debouncer();
        let start = Instant::now();

        assert!(debouncer.record(&event("/d/a.md", WatchEventKind::Write, start)));
        assert_eq!(debouncer.deadline(), Some(start + WINDOW));

        assert!(!debouncer.fire(start + Duration::from_millis(299)));
        assert!(debouncer.fire(start + WINDOW));
        assert_eq!(debouncer.deadline(), None);
        assert!(!debouncer.fire(start + WINDOW * 2));
    }

    #[test]
    fn test_burst_resets_deadline() {
        let mut debouncer = debouncer();
        let start = Instant::now();

        for offset in [0, 50, 100] {
            let at = start + Duration::from_millis(offset);
            debouncer.record(&event("/d/a.md", WatchEventKind::Write, at));
        }

        let last = start + Duration::from_millis(100);
        assert_eq!(debouncer.deadline(), Some(last + WINDOW));
        assert!(!debouncer.fire(start + WINDOW));
        assert!(debouncer.fire(last + WINDOW));
    }

    #[test]
    fn test_unwatched_extension_ignored() {
        let mut debouncer = debouncer();
        let now = Instant::now();

        assert!(!debouncer.record(&event("/d/image.png", WatchEventKind::Write, now)));
        assert!(!debouncer.record(&event("/d/Makefile", WatchEventKind::Create, now)));
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn test_other_kinds_ignored() {
        let mut debouncer = debouncer();

        assert!(!debouncer.record(&event("/d/a.md", WatchEventKind::Other, Instant::now())));
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn test_stylesheet_and_uppercase_extension() {
        let mut debouncer = debouncer();
        let now = Instant::now();

        assert!(debouncer.record(&event("/d/theme.css", WatchEventKind::Create, now)));
        assert!(debouncer.record(&event("/d/README.MD", WatchEventKind::Write, now)));
    }
}
