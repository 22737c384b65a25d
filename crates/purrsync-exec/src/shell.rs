//! List producers backed by shell commands

use std::process::{Command, Output};
use std::sync::Arc;

use purrsync_core::{ListProducer, PackageProducer, Production};

use crate::error::{ExecError, Result};
use crate::lines::split_lines;

/// Placeholder replaced by the package name in package command templates.
pub const PACKAGE_PLACEHOLDER: &str = "{}";

/// Run `command` through `sh -c` and capture its output.
///
/// A non-zero exit is [`ExecError::CommandFailed`].
pub fn run_shell(command: &str) -> Result<Vec<u8>> {
    tracing::debug!(command, "Running shell command");

    let output: Output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|source| ExecError::Io {
            command: command.to_string(),
            source,
        })?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        Err(ExecError::CommandFailed {
            command: command.to_string(),
            code,
            stderr,
        })
    }
}

/// Produces one element per line printed by a shell command.
///
/// The command runs again on every production run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellProducer {
    command: String,
}

impl ShellProducer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl ListProducer for ShellProducer {
    fn describe(&self) -> String {
        format!("`{}`", self.command)
    }

    fn produce(&self) -> purrsync_core::Result<Production<'_>> {
        let stdout = run_shell(&self.command)?;
        Ok(Box::new(split_lines(&stdout).into_iter().map(Ok)))
    }
}

/// Builds a [`ShellProducer`] per package from a command template.
///
/// Every `{}` in the template is replaced with the package name, e.g.
/// `qlist {}` or `pacman -Qlq {}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellPackageProducer {
    template: String,
}

impl ShellPackageProducer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The command listing the files of `name`.
    pub fn command_for(&self, name: &str) -> String {
        self.template.replace(PACKAGE_PLACEHOLDER, name)
    }
}

impl PackageProducer for ShellPackageProducer {
    fn for_package(&self, name: &str) -> Arc<dyn ListProducer> {
        Arc::new(ShellProducer::new(self.command_for(name)))
    }
}
