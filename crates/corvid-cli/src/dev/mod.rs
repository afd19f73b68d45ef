//! Development mode: watch, rebuild, serve, reload.
//!
//! The dev loop wires four pieces together: a [`SourceWatcher`] feeding file
//! change events through a channel, a [`ChangeFilter`] deciding which events
//! trigger work, a [`BuildCoordinator`] serializing rebuilds, and an HTTP
//! server whose status endpoint lets the browser poll for a new artifact
//! fingerprint and reload itself.

pub mod config;
pub mod coordinator;
pub mod server;
pub mod watcher;

pub use config::DevConfig;
pub use coordinator::{BuildCoordinator, BuildOutcome, BuildRequest, BuildSettings};
pub use server::{build_router, serve, ServerState};
pub use watcher::{ChangeFilter, ChangeKind, SourceWatcher, WatchEvent};
