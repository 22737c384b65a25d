//! External programs behind purrsync's seams
//!
//! This crate provides the subprocess side of a sync run:
//!
//! - **shell**: list producers running `sh -c` commands, including the
//!   per-package command template
//! - **stdin**: the one-shot producer reading paths piped to the process
//! - **rsync**: the [`Transfer`](purrsync_core::Transfer) backend invoking
//!   `rsync --files-from`

pub mod error;
mod lines;
pub mod rsync;
pub mod shell;
pub mod stdin;

pub use error::{ExecError, Result};
pub use rsync::Rsync;
pub use shell::{ShellPackageProducer, ShellProducer, run_shell};
pub use stdin::{ReaderProducer, StdinProducer};
