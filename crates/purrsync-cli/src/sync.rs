//! The sync run driven by the command line

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;

use purrsync_core::producer::drain;
use purrsync_core::{
    DestLayout, ListProducer, PackageIndex, PathSet, Partitioner, RunConfig, SyncEngine,
    SyncReport,
};
use purrsync_exec::{Rsync, ShellPackageProducer, ShellProducer};
use purrsync_fs::{ConfigStore, NormalizedPath};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Layer defaults, the config file and the command line.
pub fn load_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = RunConfig::default();
    if let Some(path) = &cli.config {
        let file: RunConfig = ConfigStore::new().load(&NormalizedPath::new(path))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        config = config.merge(file);
    }
    Ok(config.merge(cli.run_config()))
}

/// Run one sync with `config`.
///
/// `input` supplies the initial members of the main set, normally the
/// paths piped on stdin.
pub fn run_sync(config: &RunConfig, input: &dyn ListProducer) -> Result<SyncReport> {
    config.validate()?;
    let (Some(source), Some(destination), Some(root)) =
        (&config.source, &config.destination, config.root()?)
    else {
        return Err(CliError::user("source and destination are required"));
    };

    let main = load_set(
        &root,
        Some(input),
        config.main_file.as_deref(),
        config.main_exec.as_deref(),
    )?;
    let ignore = load_set(
        &root,
        None,
        config.ignore_file.as_deref(),
        config.ignore_exec.as_deref(),
    )?;
    let packages = if config.package {
        load_packages(&root, config)?
    } else {
        PackageIndex::new().with_root(root.clone())
    };
    tracing::info!(
        main = main.len(),
        ignore = ignore.len(),
        packages = packages.len(),
        "Loaded path lists"
    );

    let list_dir = tempfile::Builder::new().prefix("purrsync-").tempdir()?;
    let engine = SyncEngine::new(
        source,
        DestLayout::new(destination),
        Partitioner::new(&main, &ignore, &packages),
        list_dir.path(),
        rsync(config)?,
    )
    .with_options(config.sync_options());

    Ok(engine.run()?)
}

/// Print the actions of a finished run.
pub fn print_report(report: &SyncReport, dry_run: bool) {
    for action in &report.actions {
        println!("{} {}", "=>".blue().bold(), action);
    }
    if dry_run {
        println!(
            "{} {} partition(s) would be synced",
            "DRY-RUN".yellow().bold(),
            report.partitions
        );
    } else {
        println!("{} Synced {} partition(s)", "OK".green().bold(), report.partitions);
    }
}

/// A root-relative set from an initial producer, a list file and a
/// shell command, in that order.
fn load_set(
    root: &NormalizedPath,
    initial: Option<&dyn ListProducer>,
    file: Option<&Path>,
    exec: Option<&str>,
) -> Result<PathSet> {
    let mut set = PathSet::new().with_root(root.clone());
    if let Some(initial) = initial {
        set.extend(drain(initial)?);
    }
    if let Some(file) = file {
        set = set.with_file(file);
        set.read()?;
    }
    if let Some(command) = exec {
        set = set.with_producer(Arc::new(ShellProducer::new(command)));
        set.update_from_producer()?;
    }
    Ok(set)
}

/// The package index from `--package-list-exec` or `--package-dir`.
///
/// Package names come from the list command when given, else from the
/// files under the package directory. With both a package command and a
/// package directory, the freshly produced lists are saved to the
/// directory.
fn load_packages(root: &NormalizedPath, config: &RunConfig) -> Result<PackageIndex> {
    let mut index = PackageIndex::new().with_root(root.clone());
    if let Some(dir) = &config.package_dir {
        index = index.with_dir(dir);
    }
    if let Some(template) = &config.package_exec {
        index = index.with_producer(Arc::new(ShellPackageProducer::new(template)));
    }

    if let Some(command) = &config.package_list_exec {
        index.populate_from(&ShellProducer::new(command))?;
        match (&config.package_dir, &config.package_exec) {
            (Some(_), Some(_)) => index.write()?,
            (Some(_), None) => index.read()?,
            _ => {}
        }
    } else if config.package_dir.is_some() {
        index.discover()?;
    } else {
        tracing::warn!("--package given without --package-list-exec or --package-dir");
    }
    Ok(index)
}

fn rsync(config: &RunConfig) -> Result<Rsync> {
    let resolved = Rsync::resolve(config.rsync_bin.as_deref());
    let rsync = match resolved {
        Ok(rsync) => rsync,
        // Nothing is executed in dry-run mode.
        Err(e) if config.dry_run => {
            tracing::debug!(error = %e, "rsync unavailable, continuing dry run");
            Rsync::new(PathBuf::from("rsync"))
        }
        Err(e) => return Err(e.into()),
    };
    Ok(match &config.rsync_args {
        Some(args) => rsync.with_args(args),
        None => rsync,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use purrsync_core::StaticProducer;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_set_merges_sources() {
        let temp = TempDir::new().unwrap();
        let list = temp.path().join("main.list");
        fs::write(&list, "from-file\n").unwrap();

        let stdin = StaticProducer::new(["from-stdin"]);

        let set = load_set(
            &NormalizedPath::new("/src"),
            Some(&stdin as &dyn ListProducer),
            Some(list.as_path()),
            Some("echo from-exec"),
        )
        .unwrap();

        assert_eq!(set.sorted(), vec!["from-exec", "from-file", "from-stdin"]);
    }

    #[test]
    fn test_load_packages_writes_produced_lists() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("pkgdb");
        let config = RunConfig {
            package: true,
            package_dir: Some(dir.clone()),
            package_exec: Some("echo usr/share/{}".into()),
            package_list_exec: Some("echo vim; echo zsh".into()),
            ..RunConfig::default()
        };

        let index = load_packages(&NormalizedPath::new("/"), &config).unwrap();

        assert_eq!(index.names().collect::<Vec<_>>(), vec!["vim", "zsh"]);
        assert_eq!(fs::read_to_string(dir.join("zsh")).unwrap(), "usr/share/zsh");
    }

    #[test]
    fn test_load_packages_discovers_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("pkgdb");
        fs::create_dir_all(dir.join("app-editors")).unwrap();
        fs::write(dir.join("app-editors/vim"), "usr/bin/vim\n").unwrap();
        let config = RunConfig {
            package: true,
            package_dir: Some(dir),
            ..RunConfig::default()
        };

        let index = load_packages(&NormalizedPath::new("/"), &config).unwrap();

        assert!(index.get("app-editors/vim").unwrap().contains("usr/bin/vim"));
    }
}
