use crate::core::config::Config;
use crate::error::{GoupError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"go[0-9]+[0-9.]+[0-9]+").expect("valid version regex"))
}

/// First Go version token (`go1.22.0`) in `text`.
pub fn version_token(text: &str) -> Option<&str> {
    version_pattern().find(text).map(|m| m.as_str())
}

/// Version implied by a download URL such as
/// `https://go.dev/dl/go1.22.0.linux-amd64.tar.gz`, if it names one.
pub fn available_version(url: &url::Url) -> Option<String> {
    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    version_token(file_name)
        .or_else(|| version_token(url.as_str()))
        .map(str::to_string)
}

/// Reports the version of the Go toolchain that is currently installed.
pub trait VersionProbe {
    fn installed_version(&self) -> Result<String>;
}

/// Runs `go version` on the installed toolchain.
#[derive(Debug, Clone)]
pub struct CommandVersionProbe {
    binary: PathBuf,
    search_path: bool,
}

impl CommandVersionProbe {
    pub fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            search_path: false,
        }
    }

    /// Probes the toolchain under the configured install root, falling back
    /// to `go` on `PATH` when the root holds none.
    pub fn for_config(config: &Config) -> Self {
        Self {
            binary: config.go_binary(),
            search_path: true,
        }
    }

    fn resolve(&self) -> Result<PathBuf> {
        if self.binary.exists() {
            return Ok(self.binary.clone());
        }

        if self.search_path {
            if let Ok(found) = which::which("go") {
                return Ok(found);
            }
        }

        Err(GoupError::version_error(format!(
            "no installed Go toolchain found at {}",
            self.binary.display()
        )))
    }
}

impl VersionProbe for CommandVersionProbe {
    fn installed_version(&self) -> Result<String> {
        let binary = self.resolve()?;
        log::debug!("probing {}", binary.display());

        let output = run_version(&binary)?;
        version_token(&output)
            .map(str::to_string)
            .ok_or_else(|| {
                GoupError::version_error(format!(
                    "unexpected output from '{} version': {}",
                    binary.display(),
                    output.trim()
                ))
            })
    }
}

/// Output of `<binary> version`.
pub fn run_version(binary: &Path) -> Result<String> {
    let output = Command::new(binary).arg("version").output().map_err(|e| {
        GoupError::version_error(format!("failed to run '{} version': {e}", binary.display()))
    })?;

    if !output.status.success() {
        return Err(GoupError::version_error(format!(
            "'{} version' exited with {}: {}",
            binary.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
