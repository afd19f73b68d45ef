//! `corvid serve` - serve the public directory without watching.

use crate::cli::ServeArgs;
use crate::config::AppConfig;
use crate::dev::{server, DevConfig, ServerState};
use crate::error::{Result, SetupError};
use crate::project;

pub async fn execute(args: &ServeArgs) -> Result<()> {
    let app_root = project::find_app_root()?;
    let config = AppConfig::load(&app_root)?;

    let public_dir = config.public_dir_path(&app_root);
    if !public_dir.is_dir() {
        return Err(SetupError::PublicDirMissing(public_dir).into());
    }

    if !config.served_artifact(&app_root).exists() {
        crate::ui::warning(&format!(
            "{} not found; run `corvid build` first",
            config.served_artifact_name()
        ));
    }

    let serve_config = DevConfig::resolve(args.port, !args.no_browser, false)?;

    if serve_config.open {
        let url = serve_config.server_url();
        tokio::spawn(async move {
            // Give the listener a moment to come up
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            super::utils::open_browser(&url);
        });
    }

    let state = ServerState {
        coordinator: None,
        public_dir,
    };
    server::serve(state, serve_config.addr).await
}
