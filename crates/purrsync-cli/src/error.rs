//! Error types for purrsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from purrsync-core
    #[error(transparent)]
    Core(#[from] purrsync_core::Error),

    /// Error from purrsync-exec
    #[error(transparent)]
    Exec(#[from] purrsync_exec::ExecError),

    /// Error from purrsync-fs
    #[error(transparent)]
    Fs(#[from] purrsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
