//! SyncEngine implementation
//!
//! The SyncEngine persists each partition as a path list file and hands
//! it to the transfer backend together with the matching destination
//! sub-root.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::partition::{PackageSyncSets, Partitioner};
use crate::pathset::PathSet;

use super::layout::DestLayout;
use super::transfer::{Transfer, TransferRequest};

const MAIN: &str = "main";
const ORPHAN: &str = "orphan";
const LIST_EXTENSION: &str = "list";

/// Report from a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Actions taken during the run
    pub actions: Vec<String>,
    /// Number of partitions synced, or that would be in dry-run mode
    pub partitions: usize,
}

impl SyncReport {
    /// Add an action to the report
    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }
}

/// Options for a sync run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Sync each package's subset to `pkg/<name>/root`
    pub package: bool,
    /// Sync files claimed by no package to `orphan/root`
    pub orphan: bool,
    /// If true, write the path lists but create no directories and
    /// transfer nothing. Actions are prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Engine running one transfer per partition
///
/// - **prepare**: create the destination sub-roots
/// - **sync_main**: transfer the sync-set to `main/root`
/// - **sync_packages**: transfer each package subset to `pkg/<name>/root`
/// - **sync_orphans**: transfer the orphan set to `orphan/root`
pub struct SyncEngine<'a, T> {
    /// Directory the path lists are relative to
    source: PathBuf,
    layout: DestLayout,
    partitioner: Partitioner<'a>,
    /// Staging directory for the path list files
    list_dir: PathBuf,
    transfer: T,
    options: SyncOptions,
}

impl<'a, T: Transfer> SyncEngine<'a, T> {
    /// Create a new SyncEngine
    ///
    /// # Arguments
    ///
    /// * `source` - Directory the partition paths are relative to
    /// * `layout` - Destination sub-root layout
    /// * `partitioner` - Source of the partitions
    /// * `list_dir` - Directory receiving one path list file per partition
    /// * `transfer` - Backend performing the copies
    pub fn new(
        source: impl Into<PathBuf>,
        layout: DestLayout,
        partitioner: Partitioner<'a>,
        list_dir: impl Into<PathBuf>,
        transfer: T,
    ) -> Self {
        Self {
            source: source.into(),
            layout,
            partitioner,
            list_dir: list_dir.into(),
            transfer,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    pub fn layout(&self) -> &DestLayout {
        &self.layout
    }

    /// Path list file for the `main` or `orphan` partition.
    pub fn list_path(&self, partition: &str) -> PathBuf {
        self.list_dir.join(format!("{}.{}", partition, LIST_EXTENSION))
    }

    /// Path list file for a package partition.
    pub fn package_list_path(&self, name: &str) -> PathBuf {
        self.list_dir
            .join("pkg")
            .join(format!("{}.{}", name, LIST_EXTENSION))
    }

    /// Create the destination sub-roots needed by the enabled partitions.
    ///
    /// Returns the directories. A remote destination fails with
    /// `NotImplemented`, also in dry-run mode.
    pub fn prepare(&self) -> Result<Vec<PathBuf>> {
        self.layout.ensure_local()?;

        let mut dirs = vec![self.layout.main_root()];
        if self.options.package {
            dirs.extend(
                self.partitioner
                    .packages()
                    .names()
                    .map(|name| self.layout.package_root(name)),
            );
        }
        if self.options.orphan {
            dirs.push(self.layout.orphan_root());
        }

        if !self.options.dry_run {
            self.layout.create(&dirs)?;
        }
        Ok(dirs)
    }

    /// Transfer the sync-set to `main/root`.
    pub fn sync_main(&self) -> Result<String> {
        let sync_set = self.partitioner.sync_set()?;
        self.transfer_partition(MAIN, &sync_set, self.list_path(MAIN), self.layout.main_root())
    }

    /// Transfer each package subset, one at a time, as the returned
    /// iterator is advanced.
    pub fn sync_packages(&self) -> Result<PackageTransfers<'_, 'a, T>> {
        Ok(PackageTransfers {
            engine: self,
            sets: self.partitioner.package_sync_sets()?,
        })
    }

    /// Transfer the orphan set to `orphan/root`.
    pub fn sync_orphans(&self) -> Result<String> {
        let orphan_set = self.partitioner.orphan_set()?;
        self.transfer_partition(
            ORPHAN,
            &orphan_set,
            self.list_path(ORPHAN),
            self.layout.orphan_root(),
        )
    }

    /// Prepare the destination and transfer every enabled partition.
    pub fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for dir in self.prepare()? {
            report = report.with_action(self.describe(("Created", "create"), dir.display().to_string()));
        }

        report = report.with_action(self.sync_main()?);
        report.partitions += 1;

        if self.options.package {
            for outcome in self.sync_packages()? {
                let (_, action) = outcome?;
                report = report.with_action(action);
                report.partitions += 1;
            }
        }

        if self.options.orphan {
            report = report.with_action(self.sync_orphans()?);
            report.partitions += 1;
        }

        Ok(report)
    }

    fn transfer_partition(
        &self,
        partition: &str,
        set: &PathSet,
        list_file: PathBuf,
        destination: PathBuf,
    ) -> Result<String> {
        set.write_to(&list_file)?;

        if !self.options.dry_run {
            self.transfer.transfer(&TransferRequest {
                partition,
                source: &self.source,
                files_from: &list_file,
                destination: &destination,
            })?;
            tracing::info!(
                partition,
                paths = set.len(),
                destination = %destination.display(),
                "Transferred partition"
            );
        }

        Ok(self.describe(
            ("Synced", "sync"),
            format!("{} paths ({}) to {}", set.len(), partition, destination.display()),
        ))
    }

    /// `"<Past> <object>"`, or `"[dry-run] Would <base> <object>"`.
    fn describe(&self, (past, base): (&str, &str), object: String) -> String {
        if self.options.dry_run {
            format!("[dry-run] Would {} {}", base, object)
        } else {
            format!("{} {}", past, object)
        }
    }
}

/// Lazy per-package transfers; each step transfers one package.
pub struct PackageTransfers<'e, 'a, T> {
    engine: &'e SyncEngine<'a, T>,
    sets: PackageSyncSets<'a>,
}

impl<T: Transfer> Iterator for PackageTransfers<'_, '_, T> {
    /// `(package name, action)`
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.sets.next()?;
        Some(entry.and_then(|(name, set)| {
            let list_file = self.engine.package_list_path(&name);
            let destination = self.engine.layout.package_root(&name);
            let action = self.engine.transfer_partition(&name, &set, list_file, destination)?;
            Ok((name, action))
        }))
    }
}

impl<T> std::fmt::Debug for SyncEngine<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("source", &self.source)
            .field("layout", &self.layout)
            .field("list_dir", &self.list_dir)
            .field("options", &self.options)
            .finish()
    }
}
