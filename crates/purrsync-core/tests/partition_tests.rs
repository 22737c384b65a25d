//! Tests for the Partitioner

use pretty_assertions::assert_eq;
use purrsync_core::{ListProducer, PackageFn, PackageIndex, PathSet, Partitioner, StaticProducer};
use std::collections::HashSet;
use std::sync::Arc;

const ROOT: &str = "/src";

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| format!("{}/{}", ROOT, s)).collect()
}

fn packages(contents: &[(&str, &[&str])]) -> PackageIndex {
    let owned: Vec<(String, Vec<String>)> = contents
        .iter()
        .map(|(name, files)| (name.to_string(), files.iter().map(|f| f.to_string()).collect()))
        .collect();
    let producer = PackageFn::new("fixture", move |name: &str| {
        let files = owned
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f.clone())
            .unwrap_or_default();
        Arc::new(StaticProducer::new(files)) as Arc<dyn ListProducer>
    });

    let mut index = PackageIndex::new()
        .with_root(ROOT)
        .with_producer(Arc::new(producer));
    index
        .populate(contents.iter().map(|(name, _)| *name))
        .unwrap();
    index
}

fn abc_packages() -> PackageIndex {
    packages(&[("pkg_a", &["a"]), ("pkg_b", &["b"]), ("pkg_c", &["c"])])
}

#[test]
fn test_partition_without_ignores() {
    let main = PathSet::from_members(["a", "b", "c", "d"]).with_root(ROOT);
    let ignore = PathSet::new().with_root(ROOT);
    let index = abc_packages();
    let partitioner = Partitioner::new(&main, &ignore, &index);

    assert_eq!(partitioner.sync_set().unwrap().normalized(), set(&["a", "b", "c", "d"]));

    let per_package: Vec<(String, HashSet<String>)> = partitioner
        .package_sync_sets()
        .unwrap()
        .map(|entry| {
            let (name, s) = entry.unwrap();
            (name, s.normalized())
        })
        .collect();
    assert_eq!(
        per_package,
        vec![
            ("pkg_a".to_string(), set(&["a"])),
            ("pkg_b".to_string(), set(&["b"])),
            ("pkg_c".to_string(), set(&["c"])),
        ]
    );

    assert_eq!(partitioner.orphan_set().unwrap().normalized(), set(&["d"]));
}

#[test]
fn test_partition_with_ignores() {
    let main = PathSet::from_members(["a", "b", "c", "d"]).with_root(ROOT);
    let ignore = PathSet::from_members(["c"]).with_root(ROOT);
    let index = abc_packages();
    let partition = Partitioner::new(&main, &ignore, &index).partition().unwrap();

    assert_eq!(partition.sync_set.normalized(), set(&["a", "b", "d"]));
    let pkg_c = partition
        .packages
        .iter()
        .find(|(name, _)| name == "pkg_c")
        .map(|(_, s)| s)
        .unwrap();
    assert!(pkg_c.is_empty());
    assert_eq!(partition.orphan_set.normalized(), set(&["d"]));
}

#[test]
fn test_shared_file_is_not_orphaned() {
    let main = PathSet::from_members(["lib/shared.so", "etc/own.conf"]).with_root(ROOT);
    let ignore = PathSet::new().with_root(ROOT);
    let index = packages(&[
        ("one", &["lib/shared.so"]),
        ("two", &["lib/shared.so"]),
    ]);
    let partition = Partitioner::new(&main, &ignore, &index).partition().unwrap();

    assert_eq!(partition.packages[0].1.normalized(), set(&["lib/shared.so"]));
    assert_eq!(partition.packages[1].1.normalized(), set(&["lib/shared.so"]));
    assert_eq!(partition.orphan_set.normalized(), set(&["etc/own.conf"]));
}

#[test]
fn test_package_files_outside_main_set_are_dropped() {
    let main = PathSet::from_members(["a"]).with_root(ROOT);
    let ignore = PathSet::new().with_root(ROOT);
    let index = packages(&[("pkg", &["a", "not-in-main"])]);
    let partition = Partitioner::new(&main, &ignore, &index).partition().unwrap();

    assert_eq!(partition.packages[0].1.normalized(), set(&["a"]));
}

#[test]
fn test_no_packages_everything_is_orphan() {
    let main = PathSet::from_members(["a", "b"]).with_root(ROOT);
    let ignore = PathSet::new().with_root(ROOT);
    let index = PackageIndex::new().with_root(ROOT);
    let partitioner = Partitioner::new(&main, &ignore, &index);

    assert_eq!(partitioner.package_sync_sets().unwrap().count(), 0);
    assert_eq!(partitioner.orphan_set().unwrap().normalized(), set(&["a", "b"]));
}

#[test]
fn test_partitioning_is_repeatable() {
    let main = PathSet::from_members(["a", "b", "c", "d"]).with_root(ROOT);
    let ignore = PathSet::from_members(["b"]).with_root(ROOT);
    let index = abc_packages();
    let partitioner = Partitioner::new(&main, &ignore, &index);

    let first = partitioner.partition().unwrap();
    let second = partitioner.partition().unwrap();

    assert_eq!(first.sync_set, second.sync_set);
    assert_eq!(first.orphan_set, second.orphan_set);
    assert_eq!(first.packages.len(), second.packages.len());
}

#[test]
fn test_ignore_set_with_other_root_is_rebased() {
    let main = PathSet::from_members(["etc/hosts", "etc/fstab"]).with_root("/");
    let ignore = PathSet::from_members(["fstab"]).with_root("/etc");
    let index = PackageIndex::new().with_root("/");

    let sync_set = Partitioner::new(&main, &ignore, &index).sync_set().unwrap();

    assert!(sync_set.contains("etc/hosts"));
    assert_eq!(sync_set.len(), 1);
}

#[test]
fn test_current_directory_root() {
    let main = PathSet::from_members(["a", "./b", "sub/c"]).with_root(".");
    let ignore = PathSet::from_members(["sub/c"]).with_root(".");
    let index = PackageIndex::new().with_root(".");

    let sync_set = Partitioner::new(&main, &ignore, &index).sync_set().unwrap();

    let expected: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    assert_eq!(sync_set.normalized(), expected);
}
