//! End-to-end tests for the cache command.
//!
//! These tests invoke the actual CLI binary and validate cache inspection
//! and pruning against a synthetic cache tree in the Maven mirror layout.

mod common;
use common::prelude::*;

fn seed_cache(temp: &assert_fs::TempDir) -> assert_fs::fixture::ChildPath {
    let cache = temp.child("cache");
    cache
        .child("com/acme/widget/1.0-SNAPSHOT/widget-1.0-20210101.100000-1.tar.gz")
        .write_str("payload")
        .unwrap();
    cache
        .child("com/acme/widget/1.0-SNAPSHOT/widget-1.0-20210101.100000-1.pom")
        .write_str("<project/>")
        .unwrap();
    cache
        .child("org/other/gadget/2.1/gadget-2.1.jar")
        .write_str("payload")
        .unwrap();
    cache
}

/// Cache list shows one row per artifact version.
#[test]
fn test_cache_list_populated() {
    let temp = assert_fs::TempDir::new().unwrap();
    let cache = seed_cache(&temp);

    let mut cmd = cargo_bin_cmd!("prebuilt-cache");
    cmd.arg("cache")
        .arg("--cache-root")
        .arg(cache.path())
        .arg("list")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("com.acme"))
        .stdout(predicate::str::contains("widget"))
        .stdout(predicate::str::contains("1.0-SNAPSHOT"))
        .stdout(predicate::str::contains("org.other"))
        .stdout(predicate::str::contains("Total: 2 cached artifact versions"));
}

/// The optional pattern filters by artifact name.
#[test]
fn test_cache_list_pattern_filter() {
    let temp = assert_fs::TempDir::new().unwrap();
    let cache = seed_cache(&temp);

    let mut cmd = cargo_bin_cmd!("prebuilt-cache");
    cmd.arg("cache")
        .arg("--cache-root")
        .arg(cache.path())
        .arg("list")
        .arg("wid*")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("widget"))
        .stdout(predicate::str::contains("gadget").not());
}

/// Cache list with nonexistent cache directory shows appropriate message.
#[test]
fn test_cache_list_nonexistent() {
    let temp = assert_fs::TempDir::new().unwrap();
    let cache = temp.child("nonexistent-cache");

    let mut cmd = cargo_bin_cmd!("prebuilt-cache");
    cmd.arg("cache")
        .arg("--cache-root")
        .arg(cache.path())
        .arg("list")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Cache directory does not exist"));
}

/// Clean without a filter is an error with hints.
#[test]
fn test_cache_clean_requires_filter() {
    let temp = assert_fs::TempDir::new().unwrap();
    let cache = seed_cache(&temp);

    let mut cmd = cargo_bin_cmd!("prebuilt-cache");
    cmd.arg("cache")
        .arg("--cache-root")
        .arg(cache.path())
        .arg("clean")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ERROR: "))
        .stderr(predicate::str::contains("--all"));
}

/// Dry-run reports what would go without deleting anything.
#[test]
fn test_cache_clean_dry_run() {
    let temp = assert_fs::TempDir::new().unwrap();
    let cache = seed_cache(&temp);

    let mut cmd = cargo_bin_cmd!("prebuilt-cache");
    cmd.arg("cache")
        .arg("--cache-root")
        .arg(cache.path())
        .arg("clean")
        .arg("--all")
        .arg("--dry-run")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Dry run"));

    cache
        .child("org/other/gadget/2.1/gadget-2.1.jar")
        .assert(predicate::path::exists());
}

/// Clean --all --yes removes every version directory.
#[test]
fn test_cache_clean_all() {
    let temp = assert_fs::TempDir::new().unwrap();
    let cache = seed_cache(&temp);

    let mut cmd = cargo_bin_cmd!("prebuilt-cache");
    cmd.arg("cache")
        .arg("--cache-root")
        .arg(cache.path())
        .arg("clean")
        .arg("--all")
        .arg("--yes")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Deleted 2 cache entries"));

    cache
        .child("org/other/gadget/2.1")
        .assert(predicate::path::missing());
}
