//! Error types for purrsync-core

use std::path::PathBuf;

/// Result type for purrsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in purrsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A path list file was expected but does not exist
    #[error("Path list not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A path list file could not be read or written
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A list producer yielded an element that is not a UTF-8 string
    #[error("{producer} yielded a non-string element at position {index}")]
    TypeCheck { producer: String, index: usize },

    /// A path could not be expressed relative to the target root
    #[error("{path} is not under root {root}")]
    PrefixMismatch { path: String, root: String },

    /// Package lookup referenced an absent entry
    #[error("Package not found: {name}")]
    KeyNotFound { name: String },

    /// Package name that would escape the package directory
    #[error("Invalid package name: {name:?}")]
    InvalidPackageName { name: String },

    /// Explicitly unsupported operation
    #[error("Not implemented: {feature}")]
    NotImplemented { feature: String },

    /// Write requested on a set without a backing file
    #[error("Path set has no backing file")]
    NoBackingFile,

    /// A list producer could not be started or failed while running
    #[error("Producer failed: {message}")]
    Producer { message: String },

    /// The transfer backend failed for one partition
    #[error("Transfer of {partition} failed: {reason}")]
    TransferFailed { partition: String, reason: String },

    /// Run configuration is incomplete or inconsistent
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Filesystem error from purrsync-fs
    #[error(transparent)]
    Fs(purrsync_fs::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<purrsync_fs::Error> for Error {
    fn from(err: purrsync_fs::Error) -> Self {
        match err {
            purrsync_fs::Error::NotFound { path } => Self::FileNotFound { path },
            purrsync_fs::Error::Io { path, source } => Self::Io { path, source },
            other => Self::Fs(other),
        }
    }
}
