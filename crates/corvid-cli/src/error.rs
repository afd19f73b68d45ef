//! Error handling for the Corvid CLI.
//!
//! The error hierarchy separates the two failure classes the tool cares
//! about:
//!
//! - **Setup errors** are fatal and happen before any server or watch loop
//!   starts (missing toolchain, not inside an app, missing public directory).
//!   They carry remediation hints and terminate the process with exit code 1.
//! - **Build failures** inside the dev loop are *not* errors at all: they are
//!   [`crate::dev::BuildOutcome::Failed`] values, contained entirely inside
//!   the build coordinator. Only the one-shot `corvid build` command promotes
//!   a failed build to [`CliError::Build`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
///
/// This is the primary error type returned by CLI commands. It automatically
/// converts from domain-specific errors via `From` implementations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Fatal pre-loop failures with actionable remediation text
    #[error("{0}")]
    Setup(#[from] SetupError),

    /// Configuration-related errors (invalid syntax, bad values)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// One-shot build failure (`corvid build` exits 1 on this)
    #[error("Build failed: {0}")]
    Build(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Fatal setup errors, reported before any server starts.
#[derive(Debug, Error)]
pub enum SetupError {
    /// No `Package.swift` in the current directory or its parents
    #[error("Not inside a Swift WebAssembly app\n\nHint: corvid looks for Package.swift in the current directory or up to three parent directories")]
    AppRootNotFound,

    /// The `swift` executable could not be invoked at all
    #[error("Swift toolchain not found\n\nHint: install Swift and make sure `swift` is on your PATH")]
    SwiftNotFound,

    /// The configured WebAssembly SDK is not installed
    #[error("Swift SDK '{0}' is not installed\n\nHint: install the matching SwiftWasm SDK with `swift sdk install`, or set \"swift_sdk\" in corvid.config.json")]
    SdkMissing(String),

    /// `corvid serve` needs an existing public directory
    #[error("Public directory not found: {}\n\nHint: run `corvid build` first", .0.display())]
    PublicDirMissing(PathBuf),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// I/O error while reading config
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a [`CliError`] to a miette [`Report`](miette::Report) for
/// user-facing diagnostics.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Setup(e) => miette::miette!("{}", e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_app_root_hint() {
        let msg = SetupError::AppRootNotFound.to_string();
        assert!(msg.contains("Package.swift"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_setup_error_sdk_missing() {
        let msg = SetupError::SdkMissing("swift-6.2.3-RELEASE_wasm".to_string()).to_string();
        assert!(msg.contains("swift-6.2.3-RELEASE_wasm"));
        assert!(msg.contains("swift sdk install"));
    }

    #[test]
    fn test_setup_error_public_dir_missing() {
        let msg = SetupError::PublicDirMissing(PathBuf::from("public")).to_string();
        assert!(msg.contains("public"));
        assert!(msg.contains("corvid build"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "port".to_string(),
            value: "99999".to_string(),
            hint: "Ports must fit in 16 bits".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'port'"));
        assert!(msg.contains("99999"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_cli_error_from_setup_error() {
        let err: CliError = SetupError::AppRootNotFound.into();
        assert!(matches!(err, CliError::Setup(_)));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let config_err = ConfigError::InvalidValue {
            field: "f".to_string(),
            value: "v".to_string(),
            hint: "h".to_string(),
        };
        let err: CliError = config_err.into();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_miette_conversion_preserves_message() {
        let report = cli_error_to_miette(CliError::Server("bind failed".to_string()));
        assert!(report.to_string().contains("bind failed"));
    }
}
