//! `corvid build` - compile the app to WebAssembly once.

use crate::cli::BuildArgs;
use crate::config::AppConfig;
use crate::dev::{BuildCoordinator, BuildOutcome, BuildRequest, BuildSettings};
use crate::error::{CliError, Result};
use crate::project;

/// One-shot builds show more diagnostics than the dev loop, where the next
/// save replaces them anyway.
const ONE_SHOT_ERROR_LINES: usize = 10;

pub async fn execute(args: &BuildArgs, verbose: bool) -> Result<()> {
    let app_root = project::find_app_root()?;
    let config = AppConfig::load(&app_root)?;
    project::verify_toolchain(&config.swift_sdk).await?;

    tracing::debug!(app_root = %app_root.display(), "building app");

    let mut settings = BuildSettings::from_config(&config, &app_root, args.release, args.optimize_size);
    settings.max_error_lines = ONE_SHOT_ERROR_LINES;
    // Verbose mode streams the compiler straight to the terminal
    settings.capture_output = !verbose;

    let coordinator = BuildCoordinator::new(settings);
    match coordinator.request_build().await {
        BuildRequest::Ran(BuildOutcome::Succeeded { .. }) => Ok(()),
        BuildRequest::Ran(BuildOutcome::Failed { reason, .. }) => Err(CliError::Build(reason)),
        // A fresh coordinator has nothing in flight
        BuildRequest::Queued => Err(CliError::Custom("build unexpectedly queued".to_string())),
    }
}
