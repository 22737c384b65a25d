//! Destination directory layout

use std::fs;
use std::path::{Path, PathBuf};

use purrsync_fs::DestPath;

use crate::{Error, Result};

/// Sub-roots of a local sync destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestLayout {
    destination: PathBuf,
}

impl DestLayout {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Whether the destination names a remote host.
    ///
    /// Follows rsync's syntax: `rsync://...`, or a `:` appearing before
    /// any `/` (`host:path`, `user@host:path`).
    pub fn is_remote(&self) -> bool {
        let dest = self.destination.to_string_lossy();
        if dest.starts_with("rsync://") {
            return true;
        }
        match dest.find(':') {
            Some(idx) if idx > 0 => !dest[..idx].contains('/'),
            _ => false,
        }
    }

    pub fn main_root(&self) -> PathBuf {
        DestPath::main_root(&self.destination)
    }

    pub fn package_root(&self, name: &str) -> PathBuf {
        DestPath::package_root(&self.destination, name)
    }

    pub fn orphan_root(&self) -> PathBuf {
        DestPath::orphan_root(&self.destination)
    }

    /// Create the given sub-roots.
    ///
    /// Remote destinations are not supported and always fail.
    pub fn create(&self, dirs: &[PathBuf]) -> Result<()> {
        self.ensure_local()?;
        for dir in dirs {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
            tracing::debug!(dir = %dir.display(), "Created destination directory");
        }
        Ok(())
    }

    /// Fail with [`Error::NotImplemented`] for a remote destination.
    pub fn ensure_local(&self) -> Result<()> {
        if self.is_remote() {
            return Err(Error::NotImplemented {
                feature: format!(
                    "remote destination preparation ({})",
                    self.destination.display()
                ),
            });
        }
        Ok(())
    }
}
