//! Destination layout components.

use std::path::{Path, PathBuf};

/// Sub-root components laid out under a sync destination.
///
/// The main partition goes to `main/root`, each package to
/// `pkg/<name>/root` and the orphan partition to `orphan/root`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestPath {
    /// The `main` directory (sync-set)
    Main,
    /// The `pkg` directory (one subdirectory per package)
    Packages,
    /// The `orphan` directory (files claimed by no package)
    Orphan,
    /// The `root` leaf under each partition directory
    Root,
}

impl DestPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Packages => "pkg",
            Self::Orphan => "orphan",
            Self::Root => "root",
        }
    }

    /// `main/root` under `dest`.
    pub fn main_root(dest: &Path) -> PathBuf {
        dest.join(Self::Main).join(Self::Root)
    }

    /// `pkg/<name>/root` under `dest`.
    ///
    /// Package names containing `/` map to nested directories.
    pub fn package_root(dest: &Path, name: &str) -> PathBuf {
        dest.join(Self::Packages).join(name).join(Self::Root)
    }

    /// `orphan/root` under `dest`.
    pub fn orphan_root(dest: &Path) -> PathBuf {
        dest.join(Self::Orphan).join(Self::Root)
    }
}

impl AsRef<Path> for DestPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for DestPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for DestPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
