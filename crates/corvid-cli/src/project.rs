//! App-root discovery and toolchain preflight checks.
//!
//! Both checks run before any server or watch loop starts; their failures
//! are [`SetupError`]s that terminate the process with remediation text.

use crate::error::{Result, SetupError};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Marker file identifying the root of a Swift app.
pub const PROJECT_MARKER: &str = "Package.swift";

/// How many parent directories to search above the current one.
const MAX_PARENT_DEPTH: usize = 3;

/// Find the app root starting from the current working directory.
pub fn find_app_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    locate_app_root(&cwd).ok_or_else(|| SetupError::AppRootNotFound.into())
}

/// Find the directory containing [`PROJECT_MARKER`], checking `start` and up
/// to three of its parents.
pub fn locate_app_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    if current.join(PROJECT_MARKER).exists() {
        return Some(current);
    }

    for _ in 0..MAX_PARENT_DEPTH {
        current = current.parent()?.to_path_buf();
        if current.join(PROJECT_MARKER).exists() {
            return Some(current);
        }
    }

    None
}

/// Verify the configured SwiftWasm SDK is installed.
///
/// Runs `swift sdk list` and checks the SDK identifier appears in its
/// output. A missing `swift` executable and a missing SDK are distinct
/// setup errors.
pub async fn verify_toolchain(sdk: &str) -> Result<()> {
    let output = Command::new("swift")
        .args(["sdk", "list"])
        .output()
        .await
        .map_err(|_| SetupError::SwiftNotFound)?;

    let installed = String::from_utf8_lossy(&output.stdout);
    if !installed.contains(sdk) {
        return Err(SetupError::SdkMissing(sdk.to_string()).into());
    }

    Ok(())
}
