//! Blender subprocess orchestrator.
//!
//! Each call spawns a headless Blender that runs the entrypoint script on
//! one job file and writes one report file.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::error::{BlenderError, BlenderResult};
use crate::report::{HostJob, HostReport};

const EMBEDDED_ENTRYPOINT_PY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../blender/entrypoint.py"
));

/// Default timeout for Blender execution (10 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Environment variable overriding the entrypoint script.
pub const ENTRYPOINT_ENV: &str = "SWCA_BLENDER_ENTRYPOINT";

/// What the entrypoint does with a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Run the `.gr2` importer on a `paths.json`.
    ImportCharacter,
    /// Run the `.gr2` importer on a single model file.
    ImportModel,
    /// Describe every object and collection.
    Inspect,
    /// Replay journaled scene operations.
    Apply,
}

impl HostMode {
    /// Returns the string identifier for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            HostMode::ImportCharacter => "import_character",
            HostMode::ImportModel => "import_model",
            HostMode::Inspect => "inspect",
            HostMode::Apply => "apply",
        }
    }
}

/// Configuration for the Blender orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Path to the Blender executable.
    pub blender_path: Option<PathBuf>,
    /// Path to the Python entrypoint script.
    pub entrypoint_path: PathBuf,
    /// Timeout for Blender execution.
    pub timeout: Duration,
    /// Whether to capture Blender's stderr.
    pub capture_output: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            blender_path: None,
            entrypoint_path: PathBuf::from("blender/entrypoint.py"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            capture_output: true,
        }
    }
}

impl OrchestratorConfig {
    /// Creates a new config with the given entrypoint path.
    pub fn with_entrypoint(entrypoint_path: impl Into<PathBuf>) -> Self {
        Self {
            entrypoint_path: entrypoint_path.into(),
            ..Default::default()
        }
    }

    /// Sets the Blender executable path.
    pub fn blender_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.blender_path = Some(path.into());
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// The Blender subprocess orchestrator.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: OrchestratorConfig,
}

struct ResolvedEntrypoint {
    path: PathBuf,
    _tempfile: Option<tempfile::NamedTempFile>,
}

impl Orchestrator {
    /// Creates a new orchestrator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new orchestrator with the given configuration.
    pub fn with_config(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    /// Finds the Blender executable path.
    pub fn find_blender(&self) -> BlenderResult<PathBuf> {
        if let Some(ref path) = self.config.blender_path {
            if path.exists() {
                return Ok(path.clone());
            }
            log::warn!("configured Blender {} does not exist", path.display());
        }

        if let Ok(path) = std::env::var("BLENDER_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        let blender_names = if cfg!(windows) {
            vec!["blender.exe", "blender"]
        } else {
            vec!["blender"]
        };
        for name in blender_names {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }

        let common_paths = if cfg!(windows) {
            vec![
                "C:\\Program Files\\Blender Foundation\\Blender 4.1\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender 4.0\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender 3.6\\blender.exe",
            ]
        } else if cfg!(target_os = "macos") {
            vec![
                "/Applications/Blender.app/Contents/MacOS/Blender",
                "/Applications/Blender.app/Contents/MacOS/blender",
            ]
        } else {
            vec![
                "/usr/bin/blender",
                "/usr/local/bin/blender",
                "/snap/bin/blender",
            ]
        };
        common_paths
            .into_iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
            .ok_or(BlenderError::BlenderNotFound)
    }

    fn resolve_entrypoint(&self) -> BlenderResult<ResolvedEntrypoint> {
        if self.config.entrypoint_path.exists() {
            return Ok(ResolvedEntrypoint {
                path: self.config.entrypoint_path.clone(),
                _tempfile: None,
            });
        }

        if let Ok(path) = std::env::var(ENTRYPOINT_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(ResolvedEntrypoint {
                    path,
                    _tempfile: None,
                });
            }
            return Err(BlenderError::EntrypointNotFound { path });
        }

        let mut file = tempfile::Builder::new()
            .prefix("swca_blender_entrypoint_")
            .suffix(".py")
            .tempfile()?;
        file.write_all(EMBEDDED_ENTRYPOINT_PY.as_bytes())?;
        file.flush()?;

        Ok(ResolvedEntrypoint {
            path: file.path().to_path_buf(),
            _tempfile: Some(file),
        })
    }

    /// Runs one job file through Blender.
    ///
    /// A report with `ok == false` becomes [`BlenderError::JobFailed`].
    pub fn run(
        &self,
        mode: HostMode,
        job_path: &Path,
        report_path: &Path,
    ) -> BlenderResult<HostReport> {
        let blender_path = self.find_blender()?;
        let entrypoint = self.resolve_entrypoint()?;

        // blender --background --factory-startup --python entrypoint.py -- --mode <mode> --job <path> --report <path>
        let mut cmd = Command::new(&blender_path);
        cmd.arg("--background")
            .arg("--factory-startup")
            .arg("--python")
            .arg(&entrypoint.path)
            .arg("--")
            .arg("--mode")
            .arg(mode.as_str())
            .arg("--job")
            .arg(job_path)
            .arg("--report")
            .arg(report_path);

        if self.config.capture_output {
            // Only stderr is read; an unread stdout pipe could fill and block Blender.
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        log::debug!("running {} {}", blender_path.display(), mode.as_str());
        let child = cmd.spawn().map_err(BlenderError::SpawnFailed)?;
        let (status, stderr) =
            wait_with_timeout(child, self.config.timeout, self.config.capture_output)?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            return Err(BlenderError::process_failed(exit_code, stderr));
        }

        let report_content =
            std::fs::read_to_string(report_path).map_err(|e| BlenderError::ReadReportFailed {
                path: report_path.to_path_buf(),
                source: e,
            })?;
        let report: HostReport =
            serde_json::from_str(&report_content).map_err(BlenderError::ParseReportFailed)?;

        if !report.ok {
            return Err(BlenderError::job_failed(
                report
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        Ok(report)
    }

    /// Writes `job` to a temporary file and runs it.
    pub fn run_job(&self, mode: HostMode, job: &HostJob) -> BlenderResult<HostReport> {
        let temp_dir = tempfile::tempdir()?;
        let job_path = temp_dir.path().join("job.json");
        let report_path = temp_dir.path().join("report.json");

        let json = serde_json::to_string_pretty(job).map_err(BlenderError::SerializeJobFailed)?;
        std::fs::write(&job_path, json).map_err(BlenderError::WriteJobFailed)?;

        self.run(mode, &job_path, &report_path)
    }
}

fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    capture_output: bool,
) -> BlenderResult<(ExitStatus, String)> {
    let start = Instant::now();

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(BlenderError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(BlenderError::SpawnFailed(e)),
        }
    };

    let mut stderr = String::new();
    if capture_output {
        if let Some(mut err) = child.stderr.take() {
            let _ = err.read_to_string(&mut stderr);
        }
    }

    Ok((status, stderr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_mode_as_str() {
        assert_eq!(HostMode::ImportCharacter.as_str(), "import_character");
        assert_eq!(HostMode::ImportModel.as_str(), "import_model");
        assert_eq!(HostMode::Inspect.as_str(), "inspect");
        assert_eq!(HostMode::Apply.as_str(), "apply");
    }

    #[test]
    fn test_config_builder() {
        let config = OrchestratorConfig::with_entrypoint("custom/path.py")
            .blender_path("/usr/bin/blender")
            .timeout_secs(60);

        assert_eq!(config.entrypoint_path, PathBuf::from("custom/path.py"));
        assert_eq!(config.blender_path, Some(PathBuf::from("/usr/bin/blender")));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(
            OrchestratorConfig::default().timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_wait_with_timeout_captures_stderr() {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "echo gr2 1>&2"]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", "echo gr2 1>&2"]);
            cmd
        };
        cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        let child = cmd.spawn().unwrap();

        let (status, stderr) = wait_with_timeout(child, Duration::from_secs(5), true).unwrap();
        assert!(status.success());
        assert!(stderr.contains("gr2"));
    }

    #[test]
    #[cfg(unix)]
    fn test_wait_with_timeout_kills_slow_process() {
        let child = Command::new("sh")
            .args(["-c", "sleep 5"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let err = wait_with_timeout(child, Duration::from_millis(200), false).unwrap_err();
        assert!(matches!(err, BlenderError::Timeout { .. }));
    }

    #[test]
    fn test_resolve_entrypoint_falls_back_to_embedded() {
        if std::env::var_os(ENTRYPOINT_ENV).is_some() {
            eprintln!("{} is set; skipping embedded entrypoint test", ENTRYPOINT_ENV);
            return;
        }

        let orchestrator =
            Orchestrator::with_config(OrchestratorConfig::with_entrypoint("does/not/exist.py"));
        let entrypoint = orchestrator.resolve_entrypoint().unwrap();
        assert!(entrypoint.path.exists());

        let content = std::fs::read_to_string(&entrypoint.path).unwrap();
        assert!(content.contains("SWTOR Character Assembler Blender Entrypoint"));
    }
}
