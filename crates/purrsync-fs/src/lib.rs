//! Filesystem layer for purrsync
//!
//! Provides lexical path canonicalization, safe I/O for path list files,
//! format-agnostic configuration loading and the destination layout
//! components shared by the sync engine.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::DestPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
