//! Corvid - a development tool for Swift WebAssembly apps.
//!
//! Provides one-shot builds, a static server for the built app, and a
//! watch-rebuild-reload development loop. The browser side polls a status
//! endpoint for the published artifact fingerprint and reloads itself when
//! it changes.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod hash;
pub mod logger;
pub mod project;
pub mod ui;

pub use error::{CliError, ConfigError, Result, SetupError};
