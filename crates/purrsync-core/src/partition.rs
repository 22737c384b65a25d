//! Splitting a sync run into main, per-package and orphan partitions

use crate::package::{self, PackageIndex};
use crate::pathset::PathSet;
use crate::Result;

/// Derives the partitions of one run from its inputs.
///
/// - sync-set: main set minus ignore set
/// - per-package sets: sync-set intersected with each package
/// - orphan set: sync-set minus every per-package set
///
/// The derivation is pure; calling any method again on the same inputs
/// yields the same sets.
#[derive(Debug, Clone, Copy)]
pub struct Partitioner<'a> {
    main: &'a PathSet,
    ignore: &'a PathSet,
    packages: &'a PackageIndex,
}

impl<'a> Partitioner<'a> {
    pub fn new(main: &'a PathSet, ignore: &'a PathSet, packages: &'a PackageIndex) -> Self {
        Self {
            main,
            ignore,
            packages,
        }
    }

    pub fn packages(&self) -> &'a PackageIndex {
        self.packages
    }

    /// Files eligible for synchronization.
    pub fn sync_set(&self) -> Result<PathSet> {
        self.main.difference(self.ignore)
    }

    /// Per-package subsets of the sync-set, computed one at a time.
    pub fn package_sync_sets(&self) -> Result<PackageSyncSets<'a>> {
        Ok(PackageSyncSets::new(self.sync_set()?, self.packages))
    }

    /// Sync-set members claimed by no package.
    pub fn orphan_set(&self) -> Result<PathSet> {
        let sync_set = self.sync_set()?;
        let mut orphans = sync_set.copy();
        for entry in PackageSyncSets::new(sync_set, self.packages) {
            let (_, package_set) = entry?;
            orphans = orphans.difference(&package_set)?;
        }
        Ok(orphans)
    }

    /// All three partitions at once.
    pub fn partition(&self) -> Result<Partition> {
        let sync_set = self.sync_set()?;
        let mut orphan_set = sync_set.copy();
        let mut packages = Vec::with_capacity(self.packages.len());

        for entry in PackageSyncSets::new(sync_set.copy(), self.packages) {
            let (name, package_set) = entry?;
            orphan_set = orphan_set.difference(&package_set)?;
            packages.push((name, package_set));
        }

        Ok(Partition {
            sync_set,
            packages,
            orphan_set,
        })
    }
}

/// Eagerly computed partitions of one run.
#[derive(Debug, Clone)]
pub struct Partition {
    pub sync_set: PathSet,
    /// `(package name, sync-set ∩ package)` in index order
    pub packages: Vec<(String, PathSet)>,
    pub orphan_set: PathSet,
}

/// Lazy, one-shot sequence of `(name, sync-set ∩ package)` pairs.
#[derive(Debug)]
pub struct PackageSyncSets<'a> {
    sync_set: PathSet,
    packages: package::Iter<'a>,
}

impl<'a> PackageSyncSets<'a> {
    fn new(sync_set: PathSet, packages: &'a PackageIndex) -> Self {
        Self {
            sync_set,
            packages: packages.iter(),
        }
    }
}

impl Iterator for PackageSyncSets<'_> {
    type Item = Result<(String, PathSet)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (name, package_set) = self.packages.next()?;
        Some(
            self.sync_set
                .intersection(package_set)
                .map(|set| (name.to_string(), set)),
        )
    }
}
