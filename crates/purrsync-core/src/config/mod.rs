//! Run configuration
//!
//! A run is configured from layered sources, later layers overriding
//! earlier ones:
//!
//! 1. **Defaults** - [`RunConfig::default`]
//! 2. **Config file** - TOML, JSON or YAML, loaded with `purrsync_fs::ConfigStore`
//! 3. **Command line** - flags given to the `purrsync` binary
//!
//! # Example
//!
//! ```ignore
//! use purrsync_core::config::RunConfig;
//! use purrsync_fs::{ConfigStore, NormalizedPath};
//!
//! let file: RunConfig = ConfigStore::new().load(&NormalizedPath::new("purrsync.toml"))?;
//! let config = RunConfig::default().merge(file).merge(cli_flags);
//! config.validate()?;
//! ```

mod run;

pub use run::RunConfig;
