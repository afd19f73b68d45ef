use crate::config::AppConfig;
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use std::path::Path;

impl AppConfig {
    /// Load configuration for the app rooted at `app_root`.
    /// Priority: environment variables > config file > defaults
    pub fn load(app_root: &Path) -> Result<Self> {
        let mut figment =
            Figment::new().merge(Serialized::defaults(Self::default_config(app_root)));

        // Merge corvid.config.json if it exists (overrides by key)
        let config_file = app_root.join(Self::FILE_NAME);
        if config_file.exists() {
            figment = figment.merge(Json::file(config_file));
        }

        // Environment variables (CORVID_APP_NAME, CORVID_SWIFT_SDK, ...)
        figment = figment.merge(Env::prefixed("CORVID_"));

        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: format!("Check {} syntax and field types", Self::FILE_NAME),
            }
            .into()
        })
    }

    /// Default configuration values for an app rooted at `app_root`.
    pub(crate) fn default_config(app_root: &Path) -> Self {
        let app_name = app_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "App".to_string());

        Self {
            app_name,
            swift_sdk: "swift-6.2.3-RELEASE_wasm".to_string(),
            wasm_target: "wasm32-unknown-wasip1/debug".to_string(),
            public_dir: "public".to_string(),
            build_dir: ".build".to_string(),
            source_dirs: vec!["Sources".to_string()],
            source_ext: "swift".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_config_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(temp.path()).unwrap();

        assert_eq!(config.swift_sdk, "swift-6.2.3-RELEASE_wasm");
        assert_eq!(config.public_dir, "public");
    }

    #[test]
    fn test_config_file_overrides_by_key_only() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(AppConfig::FILE_NAME),
            r#"{ "app_name": "Clock", "source_dirs": ["Sources", "Shared"] }"#,
        )
        .unwrap();

        let config = AppConfig::load(temp.path()).unwrap();

        // Overridden keys
        assert_eq!(config.app_name, "Clock");
        assert_eq!(
            config.source_dirs,
            vec!["Sources".to_string(), "Shared".to_string()]
        );
        // Untouched keys keep their defaults
        assert_eq!(config.swift_sdk, "swift-6.2.3-RELEASE_wasm");
        assert_eq!(config.build_dir, ".build");
    }

    #[test]
    fn test_invalid_config_file_is_a_config_error() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(AppConfig::FILE_NAME),
            r#"{ "source_dirs": "not-a-list" }"#,
        )
        .unwrap();

        let err = AppConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, crate::error::CliError::Config(_)));
    }
}
