//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use backoff::ExponentialBackoff;
use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Tuning for [`write_atomic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying when another writer holds the lock
    pub lock_timeout: Duration,
    /// Flush file contents to disk before the rename
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial
/// write. An advisory lock on a hidden `.<name>.lock` sidecar serializes
/// writers; it is retried with exponential backoff until
/// `config.lock_timeout` elapses.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let file_name = native_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lock_path = native_path.with_file_name(format!(".{}.lock", file_name));
    let temp_path = native_path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    let lock_file = acquire_lock(&lock_path, &native_path, config.lock_timeout)?;

    let result = write_and_rename(&temp_path, &native_path, content, config.enable_fsync);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    lock_file
        .unlock()
        .map_err(|_| Error::LockFailed { path: native_path.clone() })?;
    let _ = fs::remove_file(&lock_path);

    result
}

fn acquire_lock(lock_path: &Path, target: &Path, timeout: Duration) -> Result<File> {
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| Error::io(lock_path, e))?;

    let policy = ExponentialBackoff {
        current_interval: Duration::from_millis(10),
        initial_interval: Duration::from_millis(10),
        max_elapsed_time: Some(timeout),
        ..ExponentialBackoff::default()
    };

    backoff::retry(policy, || {
        lock_file
            .try_lock_exclusive()
            .map_err(backoff::Error::transient)
    })
    .map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    Ok(lock_file)
}

fn write_and_rename(temp_path: &Path, target: &Path, content: &[u8], fsync: bool) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    if fsync {
        temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    }
    drop(temp_file);

    fs::rename(temp_path, target).map_err(|e| Error::io(target, e))
}

/// Read text content from a file.
///
/// A missing file is reported as [`Error::NotFound`].
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound { path: native_path.clone() },
        _ => Error::io(&native_path, e),
    })
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str, config: RobustnessConfig) -> Result<()> {
    write_atomic(path, content.as_bytes(), config)
}
