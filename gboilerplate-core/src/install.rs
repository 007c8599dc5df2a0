use std::{fmt, path::Path, process::Stdio};

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Package manager invocation, written in a registry as `["yarn", "install"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for InstallCommand {
    fn default() -> Self {
        Self {
            program: "yarn".to_string(),
            args: vec!["install".to_string()],
        }
    }
}

impl TryFrom<Vec<String>> for InstallCommand {
    type Error = String;

    fn try_from(mut words: Vec<String>) -> std::result::Result<Self, Self::Error> {
        if words.is_empty() {
            return Err("install command must name a program".to_string());
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
        })
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub success: bool,
    pub code: Option<i32>,
    /// Whatever the package manager wrote to stderr: warnings and errors.
    pub diagnostics: String,
}

#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, command: &InstallCommand, cwd: &Path) -> Result<InstallReport>;
}

/// Runs the install command as a child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInstaller;

#[async_trait]
impl Installer for ProcessInstaller {
    async fn install(&self, command: &InstallCommand, cwd: &Path) -> Result<InstallReport> {
        info!("Running `{}` in {}", command, cwd.display());

        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| Error::Install {
                program: command.program.clone(),
                source,
            })?;

        let report = InstallReport {
            success: output.status.success(),
            code: output.status.code(),
            diagnostics: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        };
        debug!("`{}` exited with {:?}", command, report.code);

        Ok(report)
    }
}
