//! The rsync transfer backend

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use purrsync_core::{Transfer, TransferRequest};

use crate::error::{ExecError, Result};

const RSYNC: &str = "rsync";

/// Runs one `rsync --files-from` invocation per partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rsync {
    bin: PathBuf,
    args: Vec<String>,
}

impl Rsync {
    /// Use an explicit rsync binary.
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            args: Vec::new(),
        }
    }

    /// Locate `rsync` on PATH.
    pub fn discover() -> Result<Self> {
        let bin = resolve_path(RSYNC).ok_or(ExecError::RsyncNotFound)?;
        tracing::debug!(bin = %bin.display(), "Found rsync");
        Ok(Self::new(bin))
    }

    /// The configured binary if given, else [`discover`](Self::discover).
    pub fn resolve(bin: Option<&Path>) -> Result<Self> {
        match bin {
            Some(bin) if !bin.as_os_str().is_empty() => Ok(Self::new(bin)),
            _ => Self::discover(),
        }
    }

    /// Extra arguments, whitespace separated, e.g. `"-aAX --delete"`.
    pub fn with_args(mut self, args: &str) -> Self {
        self.args = args.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// `<bin> <args...> --files-from=<list> <source>/ <destination>/`
    pub fn command(&self, request: &TransferRequest<'_>) -> Command {
        let mut files_from = OsString::from("--files-from=");
        files_from.push(request.files_from);

        let mut cmd = Command::new(&self.bin);
        cmd.args(&self.args)
            .arg(files_from)
            .arg(with_trailing_slash(request.source))
            .arg(with_trailing_slash(request.destination));
        cmd
    }
}

impl Transfer for Rsync {
    fn transfer(&self, request: &TransferRequest<'_>) -> purrsync_core::Result<()> {
        let mut cmd = self.command(request);
        tracing::debug!(partition = request.partition, command = ?cmd, "Running rsync");

        let failed = |reason: String| purrsync_core::Error::TransferFailed {
            partition: request.partition.to_string(),
            reason,
        };

        let status = cmd
            .status()
            .map_err(|e| failed(format!("could not run {}: {}", self.bin.display(), e)))?;
        if !status.success() {
            return Err(failed(format!("{} exited with {}", self.bin.display(), status)));
        }
        Ok(())
    }
}

/// Directory argument with exactly one trailing `/`, so rsync copies the
/// contents rather than the directory itself.
fn with_trailing_slash(dir: &Path) -> OsString {
    let text = dir.to_string_lossy();
    let mut arg = OsString::from(text.trim_end_matches('/'));
    arg.push("/");
    arg
}

/// Resolve a command name to its full path
fn resolve_path(command: &str) -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let which_cmd = "where";
    #[cfg(not(target_os = "windows"))]
    let which_cmd = "which";

    let output = Command::new(which_cmd).arg(command).output().ok()?;

    if output.status.success() {
        let path_str = String::from_utf8_lossy(&output.stdout);
        let first_line = path_str.lines().next()?.trim();
        if !first_line.is_empty() {
            return Some(PathBuf::from(first_line));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request<'a>(source: &'a Path, list: &'a Path, dest: &'a Path) -> TransferRequest<'a> {
        TransferRequest {
            partition: "main",
            source,
            files_from: list,
            destination: dest,
        }
    }

    #[test]
    fn test_command_line_layout() {
        let rsync = Rsync::new("/usr/bin/rsync").with_args("-a  --delete\t-v");
        let cmd = rsync.command(&request(
            Path::new("/etc"),
            Path::new("/tmp/lists/main.list"),
            Path::new("/backup/main/root/"),
        ));

        assert_eq!(cmd.get_program(), "/usr/bin/rsync");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-a",
                "--delete",
                "-v",
                "--files-from=/tmp/lists/main.list",
                "/etc/",
                "/backup/main/root/",
            ]
        );
    }

    #[test]
    fn test_resolve_prefers_explicit_bin() {
        let rsync = Rsync::resolve(Some(Path::new("/opt/rsync/bin/rsync"))).unwrap();
        assert_eq!(rsync.bin(), Path::new("/opt/rsync/bin/rsync"));
    }

    #[test]
    fn test_trailing_slash_root() {
        assert_eq!(with_trailing_slash(Path::new("/")), OsString::from("/"));
        assert_eq!(with_trailing_slash(Path::new("src//")), OsString::from("src/"));
    }
}
