//! End-to-end tests that invoke the compiled `purrsync` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn purrsync() -> Command {
    let mut cmd = Command::cargo_bin("purrsync").unwrap();
    cmd.env_remove("PURRSYNC_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// A source tree with lists: main {a, b, c}, ignore {c}, package `one`
/// owning `a`.
struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        for name in ["a", "b", "c"] {
            fs::write(src.join(name), name).unwrap();
        }
        fs::write(temp.path().join("main.list"), "a\nb\nc\n").unwrap();
        fs::write(temp.path().join("ignore.list"), "c\n").unwrap();
        fs::create_dir_all(temp.path().join("pkgdb")).unwrap();
        fs::write(temp.path().join("pkgdb/one"), "a\n").unwrap();
        Self { temp }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    fn arg(&self, name: &str) -> String {
        self.path(name).to_string_lossy().into_owned()
    }

    fn full_run(&self, rsync_bin: &str, extra: &[&str]) -> Command {
        let mut cmd = purrsync();
        cmd.args(["-p", "-o", "-B", rsync_bin])
            .args(["-m", &self.arg("main.list")])
            .args(["-i", &self.arg("ignore.list")])
            .args(["-D", &self.arg("pkgdb")])
            .args(extra)
            .arg(self.arg("src"))
            .arg(self.arg("dest"));
        cmd
    }
}

#[test]
fn test_help_output() {
    purrsync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("A wrapper for rsync"))
        .stdout(predicate::str::contains("--package-list-exec"));
}

#[test]
fn test_version_output() {
    purrsync()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("purrsync"));
}

#[test]
fn test_missing_source_is_error() {
    purrsync()
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("no source given"));
}

#[test]
fn test_dry_run_executes_nothing() {
    let fixture = Fixture::new();

    fixture
        .full_run("false", &["--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run] Would sync 2 paths (main)"))
        .stdout(predicate::str::contains("[dry-run] Would sync 1 paths (one)"))
        .stdout(predicate::str::contains("[dry-run] Would sync 1 paths (orphan)"))
        .stdout(predicate::str::contains("3 partition(s) would be synced"));

    assert!(!fixture.path("dest").exists());
}

#[test]
fn test_run_prepares_destination() {
    let fixture = Fixture::new();

    fixture
        .full_run("true", &[])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 3 partition(s)"));

    assert!(fixture.path("dest/main/root").is_dir());
    assert!(fixture.path("dest/pkg/one/root").is_dir());
    assert!(fixture.path("dest/orphan/root").is_dir());
}

#[test]
fn test_failing_rsync_is_reported() {
    let fixture = Fixture::new();

    fixture
        .full_run("false", &[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transfer of main failed"));
}

#[test]
fn test_paths_from_stdin() {
    let fixture = Fixture::new();

    purrsync()
        .args(["-n", "-B", "false"])
        .arg(fixture.arg("src"))
        .arg(fixture.arg("dest"))
        .write_stdin("a\nb\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would sync 2 paths (main)"));
}

#[test]
fn test_current_directory_source() {
    let fixture = Fixture::new();

    for source in [".", "./"] {
        purrsync()
            .current_dir(fixture.path("src"))
            .args(["-n", "-B", "false", source])
            .arg(fixture.arg("dest"))
            .write_stdin("a\nb\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Would sync 2 paths (main)"));
    }
}

#[test]
fn test_exec_sources() {
    let fixture = Fixture::new();

    purrsync()
        .args(["-n", "-o", "-p", "-B", "false"])
        .args(["-x", "printf 'a\\nb\\nc\\n'"])
        .args(["-y", "echo b"])
        .args(["-L", "echo one"])
        .args(["-e", "echo {}-owns-nothing; echo a"])
        .arg(fixture.arg("src"))
        .arg(fixture.arg("dest"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Would sync 2 paths (main)"))
        .stdout(predicate::str::contains("Would sync 1 paths (one)"))
        .stdout(predicate::str::contains("Would sync 1 paths (orphan)"));
}

#[test]
fn test_remote_destination_not_implemented() {
    let fixture = Fixture::new();

    purrsync()
        .args(["-n", "-B", "false", "-m", &fixture.arg("main.list")])
        .arg(fixture.arg("src"))
        .arg("backup-host:/srv/backup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not implemented"));
}

#[test]
fn test_missing_main_file() {
    let fixture = Fixture::new();

    purrsync()
        .args(["-n", "-B", "false", "-m", &fixture.arg("absent.list")])
        .arg(fixture.arg("src"))
        .arg(fixture.arg("dest"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path list not found"));
}

#[test]
fn test_config_file_supplies_options() {
    let fixture = Fixture::new();
    let config = fixture.path("purrsync.toml");
    fs::write(
        &config,
        format!(
            "source = {:?}\ndestination = {:?}\nmain-file = {:?}\nrsync-bin = \"false\"\ndry-run = true\n",
            fixture.arg("src"),
            fixture.arg("dest"),
            fixture.arg("main.list"),
        ),
    )
    .unwrap();

    purrsync()
        .args(["-c", &config.to_string_lossy()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would sync 3 paths (main)"));
}

#[test]
fn test_command_line_overrides_config_file() {
    let fixture = Fixture::new();
    let config = fixture.path("purrsync.yaml");
    fs::write(
        &config,
        format!(
            "source: {}\ndestination: /nonexistent/ignored\nrsync-bin: \"false\"\n",
            fixture.arg("src"),
        ),
    )
    .unwrap();

    purrsync()
        .env("PURRSYNC_CONFIG", &config)
        .args(["-n", "-m", &fixture.arg("main.list")])
        .arg(fixture.arg("src"))
        .arg(fixture.arg("dest"))
        .assert()
        .success()
        .stdout(predicate::str::contains(fixture.arg("dest")));
}
