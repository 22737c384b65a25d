//! Error types for subprocess operations

/// Errors that can occur while running external programs
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The program could not be started
    #[error("Failed to run `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Subprocess exited with non-zero status
    #[error("`{command}` failed (exit code {code}): {stderr}")]
    CommandFailed {
        command: String,
        /// Exit code, or -1 when terminated by a signal
        code: i32,
        /// Captured stderr output
        stderr: String,
    },

    /// No rsync binary on PATH and none configured
    #[error("rsync not found on PATH. Install rsync or pass --rsync-bin.")]
    RsyncNotFound,
}

/// Result type alias for subprocess operations
pub type Result<T> = std::result::Result<T, ExecError>;

impl From<ExecError> for purrsync_core::Error {
    fn from(err: ExecError) -> Self {
        purrsync_core::Error::Producer {
            message: err.to_string(),
        }
    }
}
