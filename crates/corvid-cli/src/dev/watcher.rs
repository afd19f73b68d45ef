//! File system watcher with filtering and debouncing for development mode.
//!
//! Watches the configured source trees and forwards create/modify events
//! through a channel. Filtering decisions live in [`ChangeFilter`], kept
//! separate from the watcher so relevance and debounce rules are plain
//! synchronous code.

use crate::error::Result;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was created
    Created,
    /// File was modified
    Modified,
}

/// A file system change observed under a watched source root.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    /// Path affected by the change
    pub path: PathBuf,
    /// What happened to it
    pub kind: ChangeKind,
    /// Whether the path is a directory
    pub is_directory: bool,
}

/// Decides which watch events trigger a rebuild.
///
/// An event passes when it names a regular file with the configured source
/// extension, outside any hidden directory, and arrives at least one
/// debounce interval after the previous accepted event. The debounce gate
/// is global across all watched files; editors that touch several files at
/// once still cause a single rebuild.
#[derive(Debug)]
pub struct ChangeFilter {
    source_ext: String,
    debounce: Duration,
    last_accepted: Option<Instant>,
}

impl ChangeFilter {
    pub fn new(source_ext: impl Into<String>, debounce: Duration) -> Self {
        Self {
            source_ext: source_ext.into(),
            debounce,
            last_accepted: None,
        }
    }

    /// Decide whether `event` should trigger a rebuild, updating the
    /// debounce gate on acceptance.
    pub fn accept(&mut self, event: &WatchEvent) -> bool {
        self.accept_at(event, Instant::now())
    }

    /// [`accept`](Self::accept) with an injected clock reading.
    pub fn accept_at(&mut self, event: &WatchEvent, now: Instant) -> bool {
        // Relevance is checked before the debounce gate so irrelevant
        // events never consume the window
        if event.is_directory || !Self::is_relevant(&event.path, &self.source_ext) {
            return false;
        }

        if let Some(last) = self.last_accepted {
            if now.duration_since(last) < self.debounce {
                return false;
            }
        }

        self.last_accepted = Some(now);
        true
    }

    /// Check whether a path is a source file the dev loop cares about.
    fn is_relevant(path: &Path, source_ext: &str) -> bool {
        let has_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == source_ext);
        if !has_ext {
            return false;
        }

        // Ignore anything inside hidden directories (.build, .git, ...)
        // and hidden files themselves
        for component in path.components() {
            if let std::path::Component::Normal(name) = component {
                if name.to_string_lossy().starts_with('.') {
                    return false;
                }
            }
        }

        true
    }
}

/// Watches source trees and sends change events through a channel.
pub struct SourceWatcher {
    /// Underlying notify watchers, one per root; kept alive for the
    /// watcher's lifetime
    _watchers: Vec<RecommendedWatcher>,
    /// Roots actually being watched
    roots: Vec<PathBuf>,
}

impl SourceWatcher {
    /// Start watching `roots` recursively.
    ///
    /// Roots that do not exist are skipped with a warning rather than
    /// failing the whole session. Only create and modify events are
    /// forwarded; removals and metadata-only events are dropped at the
    /// source.
    ///
    /// # Errors
    ///
    /// Returns error if a watcher cannot be registered on an existing root.
    pub fn new(roots: &[PathBuf]) -> Result<(Self, mpsc::Receiver<WatchEvent>)> {
        let (tx, rx) = mpsc::channel(100);

        let mut watchers = Vec::new();
        let mut watched = Vec::new();

        for root in roots {
            if !root.exists() {
                crate::ui::warning(&format!(
                    "Source directory {} does not exist, not watching it",
                    root.display()
                ));
                continue;
            }

            let tx = tx.clone();
            let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
                if let Ok(event) = res {
                    let kind = match event.kind {
                        notify::EventKind::Create(_) => ChangeKind::Created,
                        notify::EventKind::Modify(_) => ChangeKind::Modified,
                        _ => return,
                    };

                    for path in event.paths {
                        let is_directory = path.is_dir();
                        let _ = tx.blocking_send(WatchEvent {
                            path,
                            kind,
                            is_directory,
                        });
                    }
                }
            })?;

            watcher.watch(root, RecursiveMode::Recursive)?;
            watchers.push(watcher);
            watched.push(root.clone());
        }

        Ok((
            Self {
                _watchers: watchers,
                roots: watched,
            },
            rx,
        ))
    }

    /// Roots actually being watched (existing ones only).
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}
