//! Options of a single sync run

use std::path::PathBuf;

use purrsync_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::sync::SyncOptions;
use crate::{Error, Result};

/// Every option of a sync run.
///
/// Field names in config files are kebab-case, matching the long command
/// line flags (`main-file`, `package-list-exec`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RunConfig {
    /// Source directory handed to the transfer backend
    pub source: Option<String>,
    /// Destination; sub-roots are laid out beneath it
    pub destination: Option<String>,
    /// Main list of files to sync
    pub main_file: Option<PathBuf>,
    /// List of files to leave out
    pub ignore_file: Option<PathBuf>,
    /// Sync each package's files to `pkg/<name>/root`
    pub package: bool,
    /// Sync files owned by no package to `orphan/root`
    pub orphan: bool,
    /// Directory of per-package path lists
    pub package_dir: Option<PathBuf>,
    /// Shell command printing the main file list
    pub main_exec: Option<String>,
    /// Shell command printing the ignore list
    pub ignore_exec: Option<String>,
    /// Shell command printing one package's files; `{}` is the package name
    pub package_exec: Option<String>,
    /// Shell command printing the package names
    pub package_list_exec: Option<String>,
    /// Root the file lists are relative to, instead of the source
    pub alt_root: Option<String>,
    /// Extra arguments for rsync, whitespace separated
    pub rsync_args: Option<String>,
    /// Alternative rsync binary
    pub rsync_bin: Option<PathBuf>,
    /// Write the path lists but transfer nothing
    pub dry_run: bool,
}

impl RunConfig {
    /// Overlay `other` on top of `self`.
    ///
    /// Values set in `other` win; flags are enabled if either layer
    /// enables them.
    pub fn merge(self, other: RunConfig) -> RunConfig {
        RunConfig {
            source: other.source.or(self.source),
            destination: other.destination.or(self.destination),
            main_file: other.main_file.or(self.main_file),
            ignore_file: other.ignore_file.or(self.ignore_file),
            package: self.package || other.package,
            orphan: self.orphan || other.orphan,
            package_dir: other.package_dir.or(self.package_dir),
            main_exec: other.main_exec.or(self.main_exec),
            ignore_exec: other.ignore_exec.or(self.ignore_exec),
            package_exec: other.package_exec.or(self.package_exec),
            package_list_exec: other.package_list_exec.or(self.package_list_exec),
            alt_root: other.alt_root.or(self.alt_root),
            rsync_args: other.rsync_args.or(self.rsync_args),
            rsync_bin: other.rsync_bin.or(self.rsync_bin),
            dry_run: self.dry_run || other.dry_run,
        }
    }

    /// Root the file lists are interpreted against: the alternative root
    /// if set, else the source.
    ///
    /// A relative root is made absolute against the current directory, so
    /// `purrsync . DEST` works.
    pub fn root(&self) -> Result<Option<NormalizedPath>> {
        let Some(root) = self.alt_root.as_deref().or(self.source.as_deref()) else {
            return Ok(None);
        };
        let absolute = std::path::absolute(root).map_err(|e| Error::io(root, e))?;
        Ok(Some(NormalizedPath::new(absolute)))
    }

    /// Options for the sync engine.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            package: self.package,
            orphan: self.orphan,
            dry_run: self.dry_run,
        }
    }

    /// Check that the layered configuration can drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.source.as_deref().is_none_or(str::is_empty) {
            return Err(Error::InvalidConfig {
                message: "no source given".into(),
            });
        }
        if self.destination.as_deref().is_none_or(str::is_empty) {
            return Err(Error::InvalidConfig {
                message: "no destination given".into(),
            });
        }
        if self.package_exec.is_some() && self.package_list_exec.is_none() && self.package_dir.is_none() {
            return Err(Error::InvalidConfig {
                message: "--package-exec needs package names from --package-list-exec or --package-dir".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RunConfig {
        RunConfig {
            source: Some("/etc".into()),
            destination: Some("/backup".into()),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_merge_later_layer_wins() {
        let file = RunConfig {
            rsync_args: Some("-a".into()),
            main_exec: Some("find /etc".into()),
            ..base()
        };
        let cli = RunConfig {
            rsync_args: Some("-av --delete".into()),
            ..RunConfig::default()
        };

        let merged = RunConfig::default().merge(file).merge(cli);

        assert_eq!(merged.rsync_args.as_deref(), Some("-av --delete"));
        assert_eq!(merged.main_exec.as_deref(), Some("find /etc"));
        assert_eq!(merged.source.as_deref(), Some("/etc"));
    }

    #[test]
    fn test_merge_flags_are_sticky() {
        let file = RunConfig {
            orphan: true,
            ..RunConfig::default()
        };
        let merged = file.merge(RunConfig::default());
        assert!(merged.orphan);
    }

    #[test]
    fn test_root_prefers_alt_root() {
        let config = RunConfig {
            alt_root: Some("/mnt/gentoo/etc".into()),
            ..base()
        };
        assert_eq!(config.root().unwrap(), Some(NormalizedPath::new("/mnt/gentoo/etc")));
        assert_eq!(base().root().unwrap(), Some(NormalizedPath::new("/etc")));
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let config = RunConfig {
            source: Some(".".into()),
            ..base()
        };
        let cwd = NormalizedPath::new(std::env::current_dir().unwrap());

        let root = config.root().unwrap().unwrap();

        assert!(root.is_absolute());
        assert_eq!(root, cwd);
        assert_eq!(
            RunConfig {
                alt_root: Some("./sub/../lists".into()),
                ..base()
            }
            .root()
            .unwrap(),
            Some(cwd.join("lists"))
        );
    }

    #[test]
    fn test_root_unset() {
        assert_eq!(RunConfig::default().root().unwrap(), None);
    }

    #[test]
    fn test_validate_requires_source_and_destination() {
        assert!(base().validate().is_ok());
        let missing = RunConfig {
            destination: None,
            ..base()
        };
        assert!(matches!(missing.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_validate_package_exec_needs_names() {
        let config = RunConfig {
            package_exec: Some("qlist {}".into()),
            ..base()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sync_options() {
        let config = RunConfig {
            package: true,
            dry_run: true,
            ..base()
        };
        let options = config.sync_options();
        assert!(options.package && options.dry_run && !options.orphan);
    }
}
