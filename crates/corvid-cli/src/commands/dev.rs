//! `corvid dev` - watch, rebuild, serve, hot reload.

use crate::cli::DevArgs;
use crate::config::AppConfig;
use crate::dev::{
    server, BuildCoordinator, BuildRequest, BuildSettings, ChangeFilter, DevConfig, ServerState,
    SourceWatcher,
};
use crate::error::{CliError, Result};
use crate::project;
use std::sync::Arc;

pub async fn execute(args: &DevArgs) -> Result<()> {
    let app_root = project::find_app_root()?;
    let config = AppConfig::load(&app_root)?;
    project::verify_toolchain(&config.swift_sdk).await?;

    let dev_config = DevConfig::from_args(args)?;

    let public_dir = config.public_dir_path(&app_root);
    std::fs::create_dir_all(&public_dir)?;

    let settings = BuildSettings::from_config(&config, &app_root, false, false);
    let coordinator = Arc::new(BuildCoordinator::new(settings));

    if dev_config.initial_build {
        if let BuildRequest::Ran(outcome) = coordinator.request_build().await {
            if !outcome.is_success() {
                crate::ui::warning("Initial build failed; fix the errors and save to rebuild");
            }
        }
    }

    let roots = config.source_roots(&app_root);
    let (watcher, mut events) = SourceWatcher::new(&roots)?;
    for root in watcher.roots() {
        crate::ui::info(&format!("Watching {}", root.display()));
    }

    let mut filter = ChangeFilter::new(config.source_ext.clone(), dev_config.debounce);

    let state = ServerState {
        coordinator: Some(Arc::clone(&coordinator)),
        public_dir,
    };
    let addr = dev_config.addr;
    let mut server_handle = tokio::spawn(server::serve(state, addr));

    if dev_config.open {
        super::utils::open_browser(&dev_config.server_url());
    }

    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => {
                        if filter.accept(&event) {
                            tracing::debug!(path = %event.path.display(), "change accepted");
                            crate::ui::info(&format!("Changed: {}", event.path.display()));
                            let coordinator = Arc::clone(&coordinator);
                            // Fire and forget: if a build is in flight this
                            // just flips the queued flag and returns
                            tokio::spawn(async move {
                                let _ = coordinator.request_build().await;
                            });
                        }
                    }
                    None => break,
                }
            }
            result = &mut server_handle => {
                return match result {
                    Ok(server_result) => server_result,
                    Err(e) => Err(CliError::Server(format!("Server task failed: {}", e))),
                };
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    crate::ui::info("Shutting down");
    Ok(())
}
