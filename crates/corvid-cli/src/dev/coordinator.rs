//! Build coordination: at most one compiler process at a time.
//!
//! The coordinator owns a three-state machine (idle, building, building
//! with a queued follow-up) guarded by a mutex that is never held across
//! an await point. Any number of triggers arriving mid-build collapse into
//! a single queued rebuild, so a burst of file saves costs at most two
//! compiles: the one in flight plus one catch-up.

use crate::config::AppConfig;
use crate::hash;
use crate::ui::{format_duration, format_size};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No build running
    Idle,
    /// A build is in flight
    Building,
    /// A build is in flight and another was requested meanwhile
    BuildingQueued,
}

/// Everything needed to run one build cycle.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Compiler executable
    pub program: String,
    /// Arguments passed to it
    pub args: Vec<String>,
    /// Working directory for the compiler process
    pub cwd: PathBuf,
    /// Where the compiler writes the artifact
    pub artifact_source: PathBuf,
    /// Where the artifact is published for serving
    pub artifact_dest: PathBuf,
    /// Kill the compiler after this long
    pub timeout: Duration,
    /// Error lines shown before truncating with a count
    pub max_error_lines: usize,
    /// Capture compiler output for diagnostics; when false the compiler
    /// inherits the terminal and streams its output directly
    pub capture_output: bool,
}

impl BuildSettings {
    /// Build timeout applied to every cycle.
    pub const TIMEOUT: Duration = Duration::from_secs(120);

    /// Settings for building the app described by `config`.
    pub fn from_config(
        config: &AppConfig,
        app_root: &Path,
        release: bool,
        optimize_size: bool,
    ) -> Self {
        let mut args = vec![
            "build".to_string(),
            "--swift-sdk".to_string(),
            config.swift_sdk.clone(),
        ];
        if release {
            args.push("-c".to_string());
            args.push("release".to_string());
        }
        if optimize_size {
            for flag in ["-Xswiftc", "-Osize", "-Xswiftc", "-whole-module-optimization"] {
                args.push(flag.to_string());
            }
        }

        Self {
            program: "swift".to_string(),
            args,
            cwd: app_root.to_path_buf(),
            artifact_source: config.artifact_source(app_root, release),
            artifact_dest: config.served_artifact(app_root),
            timeout: Self::TIMEOUT,
            max_error_lines: 5,
            capture_output: true,
        }
    }
}

/// Result of one completed build cycle.
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Succeeded {
        /// Fingerprint of the published artifact
        fingerprint: String,
        /// Wall time of the compile-and-publish cycle
        elapsed: Duration,
        /// Size of the published artifact
        size_bytes: u64,
    },
    Failed {
        /// One-line summary of what went wrong
        reason: String,
        /// Compiler error lines, up to the configured limit
        errors: Vec<String>,
        /// How many further error lines were truncated
        suppressed: usize,
    },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Succeeded { .. })
    }
}

/// What `request_build` did with the request.
#[derive(Debug)]
pub enum BuildRequest {
    /// This caller ran one or more build cycles; the last outcome is
    /// attached
    Ran(BuildOutcome),
    /// A build was already in flight; a follow-up has been queued and the
    /// in-flight caller will run it
    Queued,
}

/// Published-artifact fingerprint with a lazy-priming flag.
#[derive(Debug, Default)]
struct FingerprintCell {
    primed: bool,
    value: Option<String>,
}

/// Serializes builds and tracks the published artifact fingerprint.
///
/// Shared between the watch loop (which requests builds) and the HTTP
/// status endpoint (which reads `is_building` and `fingerprint`). Both
/// mutexes are held only for field access, never across an await.
pub struct BuildCoordinator {
    settings: BuildSettings,
    phase: Mutex<Phase>,
    fingerprint: Mutex<FingerprintCell>,
}

impl BuildCoordinator {
    pub fn new(settings: BuildSettings) -> Self {
        Self {
            settings,
            phase: Mutex::new(Phase::Idle),
            fingerprint: Mutex::new(FingerprintCell::default()),
        }
    }

    /// Whether a build is currently in flight.
    pub fn is_building(&self) -> bool {
        *self.phase.lock() != Phase::Idle
    }

    /// Fingerprint of the currently published artifact, if any.
    ///
    /// On first read this primes itself from the artifact already on disk,
    /// so a browser connecting before the first rebuild sees a stable
    /// baseline instead of a null-to-hash transition.
    pub fn fingerprint(&self) -> Option<String> {
        let mut cell = self.fingerprint.lock();
        if !cell.primed {
            cell.primed = true;
            if let Ok(existing) = hash::fingerprint_file(&self.settings.artifact_dest) {
                cell.value = existing;
            }
        }
        cell.value.clone()
    }

    /// Request a build.
    ///
    /// If no build is in flight, this caller runs one, then keeps running
    /// catch-up cycles as long as further requests were queued while it
    /// worked. If a build is in flight, the request is recorded as a
    /// queued follow-up and this returns immediately.
    pub async fn request_build(&self) -> BuildRequest {
        {
            let mut phase = self.phase.lock();
            match *phase {
                Phase::Idle => *phase = Phase::Building,
                Phase::Building => {
                    *phase = Phase::BuildingQueued;
                    return BuildRequest::Queued;
                }
                Phase::BuildingQueued => return BuildRequest::Queued,
            }
        }

        loop {
            let outcome = self.run_cycle().await;

            let again = {
                let mut phase = self.phase.lock();
                if *phase == Phase::BuildingQueued {
                    *phase = Phase::Building;
                    true
                } else {
                    *phase = Phase::Idle;
                    false
                }
            };

            if !again {
                return BuildRequest::Ran(outcome);
            }
        }
    }

    /// Run one compile-and-publish cycle.
    ///
    /// Any failure (compiler error, timeout, missing artifact, I/O) is a
    /// [`BuildOutcome::Failed`], never a process-level error: in the dev
    /// loop a broken build is an expected state to report and recover
    /// from.
    async fn run_cycle(&self) -> BuildOutcome {
        crate::ui::info("Building...");
        let started = Instant::now();

        let mut command = Command::new(&self.settings.program);
        command.args(&self.settings.args).current_dir(&self.settings.cwd);
        if self.settings.capture_output {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        let output = match tokio::time::timeout(self.settings.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return self.failed(format!("Failed to run {}: {}", self.settings.program, e))
            }
            Err(_) => {
                return self.failed(format!(
                    "Build timed out after {}",
                    format_duration(self.settings.timeout)
                ))
            }
        };

        if !output.status.success() {
            let reason = match output.status.code() {
                Some(code) => format!("Build failed with exit code {}", code),
                None => "Build terminated by signal".to_string(),
            };

            if !self.settings.capture_output {
                // Output already streamed to the terminal
                return self.failed(reason);
            }

            let diagnostics = String::from_utf8_lossy(&output.stderr);
            let (errors, suppressed) =
                extract_error_lines(&diagnostics, self.settings.max_error_lines);
            return self.report_failure(reason, errors, suppressed);
        }

        // Publish before fingerprinting so the fingerprint always describes
        // the file the server is actually handing out
        if !self.settings.artifact_source.exists() {
            return self.failed(format!(
                "Build succeeded but produced no artifact at {}",
                self.settings.artifact_source.display()
            ));
        }

        if let Some(parent) = self.settings.artifact_dest.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return self.failed(format!("Failed to create {}: {}", parent.display(), e));
            }
        }
        if let Err(e) = std::fs::copy(&self.settings.artifact_source, &self.settings.artifact_dest)
        {
            return self.failed(format!(
                "Failed to publish artifact to {}: {}",
                self.settings.artifact_dest.display(),
                e
            ));
        }

        let fingerprint = match hash::fingerprint_file(&self.settings.artifact_dest) {
            Ok(Some(fp)) => fp,
            Ok(None) => return self.failed("Published artifact vanished before hashing".into()),
            Err(e) => return self.failed(format!("Failed to hash artifact: {}", e)),
        };

        let size_bytes = std::fs::metadata(&self.settings.artifact_dest)
            .map(|m| m.len())
            .unwrap_or(0);
        let elapsed = started.elapsed();

        {
            let mut cell = self.fingerprint.lock();
            cell.primed = true;
            cell.value = Some(fingerprint.clone());
        }

        crate::ui::success(&format!(
            "Build finished in {} ({})",
            format_duration(elapsed),
            format_size(size_bytes)
        ));
        crate::ui::info(&format!("Hash: {}...", &fingerprint[..8.min(fingerprint.len())]));

        BuildOutcome::Succeeded {
            fingerprint,
            elapsed,
            size_bytes,
        }
    }

    fn failed(&self, reason: String) -> BuildOutcome {
        self.report_failure(reason, Vec::new(), 0)
    }

    fn report_failure(
        &self,
        reason: String,
        errors: Vec<String>,
        suppressed: usize,
    ) -> BuildOutcome {
        crate::ui::error(&reason);
        for line in &errors {
            eprintln!("    {}", line);
        }
        if suppressed > 0 {
            eprintln!("    ... and {} more errors", suppressed);
        }

        BuildOutcome::Failed {
            reason,
            errors,
            suppressed,
        }
    }
}

/// Pull compiler error lines out of captured diagnostics.
///
/// Returns up to `limit` lines containing an `error:` marker plus the count
/// of matching lines beyond the limit.
pub fn extract_error_lines(diagnostics: &str, limit: usize) -> (Vec<String>, usize) {
    let matching: Vec<&str> = diagnostics
        .lines()
        .filter(|line| line.to_lowercase().contains("error:"))
        .collect();

    let suppressed = matching.len().saturating_sub(limit);
    let errors = matching
        .into_iter()
        .take(limit)
        .map(|line| line.trim().to_string())
        .collect();

    (errors, suppressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_lines_filters_and_trims() {
        let diagnostics = "\
Compiling App...
  /app/Sources/Main.swift:3:5: error: cannot find 'foo' in scope
note: did you mean 'for'?
/app/Sources/Main.swift:9:1: Error: missing return
";
        let (errors, suppressed) = extract_error_lines(diagnostics, 5);
        assert_eq!(
            errors,
            vec![
                "/app/Sources/Main.swift:3:5: error: cannot find 'foo' in scope",
                "/app/Sources/Main.swift:9:1: Error: missing return",
            ]
        );
        assert_eq!(suppressed, 0);
    }

    #[test]
    fn test_extract_error_lines_truncates_past_limit() {
        let diagnostics: String = (0..8)
            .map(|i| format!("Main.swift:{}:1: error: problem {}\n", i, i))
            .collect();
        let (errors, suppressed) = extract_error_lines(&diagnostics, 5);
        assert_eq!(errors.len(), 5);
        assert_eq!(suppressed, 3);
    }

    #[test]
    fn test_extract_error_lines_empty_diagnostics() {
        let (errors, suppressed) = extract_error_lines("warning: unused variable\n", 5);
        assert!(errors.is_empty());
        assert_eq!(suppressed, 0);
    }

    #[test]
    fn test_build_settings_from_config_debug() {
        let root = Path::new("/work/Counter");
        let config = AppConfig::default_config(root);
        let settings = BuildSettings::from_config(&config, root, false, false);

        assert_eq!(settings.program, "swift");
        assert_eq!(
            settings.args,
            vec!["build", "--swift-sdk", "swift-6.2.3-RELEASE_wasm"]
        );
        assert_eq!(settings.cwd, PathBuf::from("/work/Counter"));
        assert_eq!(settings.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_build_settings_release_and_size_flags() {
        let root = Path::new("/work/Counter");
        let config = AppConfig::default_config(root);
        let settings = BuildSettings::from_config(&config, root, true, true);

        assert_eq!(
            settings.args,
            vec![
                "build",
                "--swift-sdk",
                "swift-6.2.3-RELEASE_wasm",
                "-c",
                "release",
                "-Xswiftc",
                "-Osize",
                "-Xswiftc",
                "-whole-module-optimization",
            ]
        );
        assert!(settings
            .artifact_source
            .to_string_lossy()
            .contains("release"));
    }

    #[test]
    fn test_coordinator_starts_idle_without_fingerprint() {
        let temp = tempfile::TempDir::new().unwrap();
        let settings = BuildSettings {
            program: "true".to_string(),
            args: vec![],
            cwd: temp.path().to_path_buf(),
            artifact_source: temp.path().join("App.wasm"),
            artifact_dest: temp.path().join("public/App-v2.wasm"),
            timeout: Duration::from_secs(1),
            max_error_lines: 5,
            capture_output: true,
        };
        let coordinator = BuildCoordinator::new(settings);

        assert!(!coordinator.is_building());
        assert_eq!(coordinator.fingerprint(), None);
    }

    #[test]
    fn test_fingerprint_primes_from_existing_artifact() {
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("public/App-v2.wasm");
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::fs::write(&dest, b"previous build").unwrap();

        let settings = BuildSettings {
            program: "true".to_string(),
            args: vec![],
            cwd: temp.path().to_path_buf(),
            artifact_source: temp.path().join("App.wasm"),
            artifact_dest: dest.clone(),
            timeout: Duration::from_secs(1),
            max_error_lines: 5,
            capture_output: true,
        };
        let coordinator = BuildCoordinator::new(settings);

        let primed = coordinator.fingerprint();
        assert_eq!(primed, Some(crate::hash::fingerprint_bytes(b"previous build")));

        // Priming happens once; later disk changes don't leak in via reads
        std::fs::write(&dest, b"changed behind our back").unwrap();
        assert_eq!(coordinator.fingerprint(), primed);
    }
}
