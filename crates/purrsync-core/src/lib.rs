//! Path-set algebra and partitioning for purrsync
//!
//! This crate implements the core of a sync run:
//!
//! - **PathSet**: unordered path strings with root-aware set algebra
//! - **List producers**: one-shot sources of path and package names
//! - **PackageIndex**: package name to the set of files it owns
//! - **Partitioner**: sync-set, per-package subsets and orphans
//! - **SyncEngine**: one transfer per partition through a pluggable backend
//!
//! # Architecture
//!
//! ```text
//!                   purrsync-cli
//!                  /            \
//!        purrsync-exec           |
//!                  \             |
//!                   purrsync-core
//!                        |
//!                   purrsync-fs
//! ```
//!
//! # Example
//!
//! ```
//! use purrsync_core::{PackageIndex, PathSet, Partitioner};
//!
//! let main = PathSet::from_members(["a", "b", "c", "d"]).with_root("/src");
//! let ignore = PathSet::from_members(["c"]).with_root("/src");
//! let mut packages = PackageIndex::new().with_root("/src");
//! packages.populate(["pkg_a"]).unwrap();
//!
//! let partitioner = Partitioner::new(&main, &ignore, &packages);
//! assert_eq!(partitioner.sync_set().unwrap().len(), 3);
//! ```

pub mod config;
pub mod error;
pub mod package;
pub mod partition;
pub mod pathset;
pub mod producer;
pub mod sync;

pub use config::RunConfig;
pub use error::{Error, Result};
pub use package::PackageIndex;
pub use partition::{PackageSyncSets, Partition, Partitioner};
pub use pathset::PathSet;
pub use producer::{ListProducer, PackageFn, PackageProducer, Production, StaticProducer};
pub use sync::{DestLayout, SyncEngine, SyncOptions, SyncReport, Transfer, TransferRequest};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_file_not_found_displays_path() {
        let error = Error::FileNotFound {
            path: PathBuf::from("/var/lib/purrsync/main.list"),
        };
        let display = format!("{}", error);
        assert!(
            display.contains("/var/lib/purrsync/main.list"),
            "Error display should contain the path, got: {}",
            display
        );
    }

    #[test]
    fn fs_not_found_maps_to_file_not_found() {
        let error: Error = purrsync_fs::Error::NotFound {
            path: PathBuf::from("/missing"),
        }
        .into();
        assert!(matches!(error, Error::FileNotFound { .. }));
    }
}
