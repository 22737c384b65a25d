//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use purrsync_core::RunConfig;

/// A wrapper for rsync.
///
/// Syncs the files named on stdin, in MAIN_FILE and by MAIN_EXEC to
/// DEST/main/root, optionally splitting them per package into
/// DEST/pkg/<name>/root and DEST/orphan/root.
#[derive(Parser, Debug)]
#[command(name = "purrsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source for rsync
    #[arg(value_name = "SRC")]
    pub source: Option<String>,

    /// Destination for rsync
    #[arg(value_name = "DEST")]
    pub destination: Option<String>,

    /// Main list of files to sync
    #[arg(short = 'm', long, value_name = "MAIN_FILE")]
    pub main_file: Option<PathBuf>,

    /// Ignore list of files
    #[arg(short = 'i', long, value_name = "IGNORE_FILE")]
    pub ignore_file: Option<PathBuf>,

    /// Create a directory in DEST for packaged files
    #[arg(short = 'p', long)]
    pub package: bool,

    /// Create a directory in DEST for orphaned files (files without packages)
    #[arg(short = 'o', long)]
    pub orphan: bool,

    /// Package directory of package file lists
    #[arg(short = 'D', long, value_name = "PKG_DIR")]
    pub package_dir: Option<PathBuf>,

    /// Use MAIN_EXEC to produce a file list
    #[arg(short = 'x', long, value_name = "MAIN_EXEC")]
    pub main_exec: Option<String>,

    /// Use IGNORE_EXEC to produce an ignore list
    #[arg(short = 'y', long, value_name = "IGNORE_EXEC")]
    pub ignore_exec: Option<String>,

    /// Use PKG_EXEC to produce a file list for each package, {} is replaced
    /// with the package name
    #[arg(short = 'e', long, value_name = "PKG_EXEC")]
    pub package_exec: Option<String>,

    /// Use PKG_LIST_EXEC to produce a list of packages
    #[arg(short = 'L', long, value_name = "PKG_LIST_EXEC")]
    pub package_list_exec: Option<String>,

    /// Use alternative root, instead of SRC for file lists
    #[arg(short = 'r', long, value_name = "ALT_ROOT")]
    pub alt_root: Option<String>,

    /// Use these arguments with rsync
    #[arg(short = 'A', long, value_name = "RSYNC_ARGS", allow_hyphen_values = true)]
    pub rsync_args: Option<String>,

    /// Alternative path to the rsync binary
    #[arg(short = 'B', long, value_name = "RSYNC_BIN")]
    pub rsync_bin: Option<PathBuf>,

    /// Config file (TOML, JSON or YAML) with defaults for any option
    #[arg(short = 'c', long, env = "PURRSYNC_CONFIG", value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the path lists and show what would be synced
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The command line layer of the run configuration.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            source: self.source.clone(),
            destination: self.destination.clone(),
            main_file: self.main_file.clone(),
            ignore_file: self.ignore_file.clone(),
            package: self.package,
            orphan: self.orphan,
            package_dir: self.package_dir.clone(),
            main_exec: self.main_exec.clone(),
            ignore_exec: self.ignore_exec.clone(),
            package_exec: self.package_exec.clone(),
            package_list_exec: self.package_list_exec.clone(),
            alt_root: self.alt_root.clone(),
            rsync_args: self.rsync_args.clone(),
            rsync_bin: self.rsync_bin.clone(),
            dry_run: self.dry_run,
        }
    }
}
