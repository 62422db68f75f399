use crate::error::{GoupError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Replaces the toolchain under an install root with the contents of an archive.
pub trait Installer {
    fn install(&self, root: &Path, archive: &Path) -> Result<()>;
}

/// Installs with `rm` and `tar` subprocesses, optionally through a privilege
/// escalation program such as `sudo`.
///
/// If removal succeeds and extraction fails, `<root>/go` is left absent.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    elevate: Option<String>,
}

struct Step {
    name: &'static str,
    program: &'static str,
    args: Vec<OsString>,
}

impl CommandInstaller {
    pub fn new(elevate: Option<String>) -> Self {
        let elevate = elevate.filter(|_| !running_as_root());
        Self { elevate }
    }

    fn steps(root: &Path, archive: &Path) -> Vec<Step> {
        vec![
            Step {
                name: "remove previous installation",
                program: "rm",
                args: vec!["-rf".into(), root.join("go").into_os_string()],
            },
            Step {
                name: "extract archive",
                program: "tar",
                args: vec![
                    "-C".into(),
                    root.as_os_str().to_os_string(),
                    "-xzf".into(),
                    archive.as_os_str().to_os_string(),
                ],
            },
        ]
    }

    fn command(&self, step: &Step) -> Command {
        let mut command = match &self.elevate {
            Some(elevate) => {
                let mut command = Command::new(elevate);
                command.arg(step.program);
                command
            }
            None => Command::new(step.program),
        };
        command.args(&step.args);
        command
    }

    fn run(&self, step: &Step) -> Result<()> {
        let mut command = self.command(step);
        log::debug!("running {command:?}");

        // stdin stays attached so an elevation password prompt still works.
        let output = command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| GoupError::Install {
                step: step.name.to_string(),
                status: "not started".to_string(),
                stderr: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(GoupError::Install {
                step: step.name.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        if !stderr.is_empty() {
            log::debug!("{}: {stderr}", step.name);
        }
        Ok(())
    }
}

impl Installer for CommandInstaller {
    fn install(&self, root: &Path, archive: &Path) -> Result<()> {
        for step in Self::steps(root, archive) {
            self.run(&step)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn running_as_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

/// Finds the install root of the `go` binary on `PATH`.
pub fn detect_install_root() -> Result<PathBuf> {
    let binary = which::which("go")
        .map_err(|_| GoupError::not_found("unable to get path to 'go'"))?;
    let binary = binary.canonicalize().unwrap_or(binary);
    log::debug!("active go binary: {}", binary.display());

    install_root_from_binary(&binary)
}

/// `/usr/local/go/bin/go` -> `/usr/local`.
pub fn install_root_from_binary(binary: &Path) -> Result<PathBuf> {
    binary
        .ancestors()
        .skip(1)
        .find(|dir| dir.file_name().is_some_and(|name| name == "go"))
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            GoupError::not_found(format!(
                "invalid path: {} is not inside a 'go' distribution directory",
                binary.display()
            ))
        })
}
