//! End-to-end tests for the `newbrands` binary that need no database.

use assert_cmd::Command;
use predicates::prelude::*;

const DB_VARS: [&str; 10] = [
    "DB_HOST",
    "DB_PORT",
    "DB_USER",
    "DB_PASS",
    "DB_NAME",
    "DB_PREFIX",
    "SHOP_ID",
    "MIN_PRODUCTS",
    "REPORT_POLICY",
    "RUST_LOG",
];

/// The binary, run inside `dir` with every configuration variable cleared.
fn newbrands(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("newbrands").unwrap();
    cmd.current_dir(dir);
    for var in DB_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn missing_db_vars_abort_and_list_names() {
    let tmp = tempfile::tempdir().unwrap();

    newbrands(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("DB_USER, DB_PASS, DB_NAME"));

    assert!(!tmp.path().join("docs").exists());
}

#[test]
fn only_missing_names_are_reported() {
    let tmp = tempfile::tempdir().unwrap();

    newbrands(tmp.path())
        .env("DB_USER", "report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DB_PASS, DB_NAME"))
        .stderr(predicate::str::contains("DB_USER").not());
}

#[test]
fn env_file_supplies_credentials() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(".env"),
        "# shop database\nDB_USER=report\nDB_PASS='s3cret'\nDB_NAME=shop\n",
    )
    .unwrap();

    newbrands(tmp.path())
        .args(["--dry-run", "--since", "2024-01-01", "--until", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("report@127.0.0.1:3306/shop"))
        .stdout(predicate::str::contains("policy=shop-scoped"))
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();

    newbrands(tmp.path())
        .env("DB_USER", "report")
        .env("DB_PASS", "secret")
        .env("DB_NAME", "shop")
        .args(["--dry-run", "--policy", "unscoped", "--out-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WITH first_product AS"));

    assert!(!tmp.path().join("out").exists());
}

#[test]
fn empty_window_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();

    newbrands(tmp.path())
        .env("DB_USER", "report")
        .env("DB_PASS", "secret")
        .env("DB_NAME", "shop")
        .args(["--since", "2025-01-01", "--until", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty date range"));
}

#[test]
fn unreachable_database_fails_without_output() {
    let tmp = tempfile::tempdir().unwrap();

    newbrands(tmp.path())
        .env("DB_HOST", "127.0.0.1")
        .env("DB_PORT", "1")
        .env("DB_USER", "report")
        .env("DB_PASS", "secret")
        .env("DB_NAME", "shop")
        .timeout(std::time::Duration::from_secs(60))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to connect to 127.0.0.1:1/shop"));

    assert!(!tmp.path().join("docs").exists());
}
