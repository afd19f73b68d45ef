//! Configuration for a Corvid app.
//!
//! Settings come from `corvid.config.json` at the app root, with every field
//! defaulted so the file is optional. A present file overrides by key, never
//! wholesale. Priority: environment (`CORVID_*`) > file > defaults.

mod loading;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// App configuration - loaded from corvid.config.json, env, or defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// App name; also the stem of the built artifact (default: app root
    /// directory name)
    pub app_name: String,

    /// SwiftWasm SDK identifier passed to `swift build --swift-sdk`
    pub swift_sdk: String,

    /// Target subpath inside the build directory where the raw artifact
    /// lands, `<triple>/<profile>` (e.g. "wasm32-unknown-wasip1/debug")
    pub wasm_target: String,

    /// Directory served over HTTP
    pub public_dir: String,

    /// Swift build output directory
    pub build_dir: String,

    /// Source trees watched for changes
    pub source_dirs: Vec<String>,

    /// Source file extension that triggers rebuilds
    pub source_ext: String,
}

impl AppConfig {
    /// Config file name, looked up at the app root.
    pub const FILE_NAME: &'static str = "corvid.config.json";

    /// Path of the raw build artifact produced by `swift build`.
    ///
    /// Release builds land under the `release` profile directory instead of
    /// the profile named in `wasm_target`.
    pub fn artifact_source(&self, app_root: &Path, release: bool) -> PathBuf {
        let target = if release {
            match self.wasm_target.rsplit_once('/') {
                Some((triple, _profile)) => format!("{}/release", triple),
                None => self.wasm_target.clone(),
            }
        } else {
            self.wasm_target.clone()
        };

        app_root
            .join(&self.build_dir)
            .join(target)
            .join(format!("{}.wasm", self.app_name))
    }

    /// Public-facing artifact file name, distinguished from the raw build
    /// output by a fixed suffix.
    pub fn served_artifact_name(&self) -> String {
        format!("{}-v2.wasm", self.app_name)
    }

    /// Path the artifact is copied to inside the public directory.
    pub fn served_artifact(&self, app_root: &Path) -> PathBuf {
        self.public_dir_path(app_root).join(self.served_artifact_name())
    }

    /// Absolute path of the served public directory.
    pub fn public_dir_path(&self, app_root: &Path) -> PathBuf {
        app_root.join(&self.public_dir)
    }

    /// Absolute paths of the watched source trees.
    pub fn source_roots(&self, app_root: &Path) -> Vec<PathBuf> {
        self.source_dirs.iter().map(|d| app_root.join(d)).collect()
    }
}
