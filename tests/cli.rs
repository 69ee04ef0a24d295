//! Integration tests for the dbport CLI.
//!
//! These tests run the compiled binary and verify its output. Tests that
//! reach the engine install fake `mysql`/`mysqldump` executables into a
//! temp directory and point PATH at it; live-run tests have the fakes log
//! their invocations so we can tell executed from merely planned.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

fn dbport() -> Command {
    Command::cargo_bin("dbport").unwrap()
}

/// Write a fake client executable that appends its name to `$CALL_LOG`
/// (when set) and exits zero.
fn install_fake_client(dir: &Path, name: &str) {
    let path = dir.join(name);
    let script = format!("#!/bin/sh\nif [ -n \"$CALL_LOG\" ]; then echo {name} >> \"$CALL_LOG\"; fi\nexit 0\n");
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
}

const SCHEMA_ONLY_CONFIG: &str = r#"
portages:
  - source:
      host: prod-db
      user: reader
      password: pw
      name: appdb
    dest:
      host: qa-db
      user: root
      password: rootpw
      name: appdb_qa
    fetch_data: false
"#;

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn cli_no_args_shows_usage() {
    dbport()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn cli_help_flag_shows_help() {
    dbport()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Port MySQL schema"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--quiet"));
}

#[test]
fn cli_version_flag_shows_version() {
    dbport()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dbport"));
}

// ============================================================================
// Configuration handling
// ============================================================================

#[test]
fn missing_config_reports_and_exits_zero() {
    dbport()
        .arg("/definitely/not/here.yml")
        .assert()
        .success()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn malformed_config_reports_parse_failure() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("broken.yml");
    config.write_str("portages: [not: [valid").unwrap();

    dbport()
        .arg(config.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Could not parse configuration file"));
}

#[test]
fn empty_portages_is_reported() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("empty.yml");
    config.write_str("portages: []").unwrap();

    dbport()
        .arg(config.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("no portages"));
}

#[test]
fn unsupported_db_type_warns_and_continues() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("portage.yml");
    config
        .write_str(
            r#"
portages:
  - db_type: postgres
    source: {host: a, user: u, password: p, name: db}
    dest: {host: b, user: u, password: p, name: db_copy}
"#,
        )
        .unwrap();

    // no clients on PATH: the job must be skipped before the engine is built
    let empty_bin = temp.child("bin");
    empty_bin.create_dir_all().unwrap();

    dbport()
        .arg(config.path())
        .env("PATH", empty_bin.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("only mysql portages are supported"));
}

#[test]
fn missing_client_is_fatal() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("portage.yml");
    config.write_str(SCHEMA_ONLY_CONFIG).unwrap();
    let empty_bin = temp.child("bin");
    empty_bin.create_dir_all().unwrap();

    dbport()
        .arg(config.path())
        .env("PATH", empty_bin.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("mysqldump"))
        .stderr(predicate::str::contains("not found in PATH"));
}

// ============================================================================
// Dry-run and live execution
// ============================================================================

#[test]
fn dry_run_prints_commands_and_executes_none() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("portage.yml");
    config.write_str(SCHEMA_ONLY_CONFIG).unwrap();

    let bin = temp.child("bin");
    bin.create_dir_all().unwrap();
    install_fake_client(bin.path(), "mysql");
    install_fake_client(bin.path(), "mysqldump");
    let call_log = temp.child("calls.log");

    dbport()
        .arg(config.path())
        .arg("--dry-run")
        .env("PATH", bin.path())
        .env("CALL_LOG", call_log.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting portage (dry run)"))
        .stdout(predicate::str::contains("--no-data"))
        .stdout(predicate::str::contains("Dumping empty schema from prod-db.appdb"))
        .stdout(predicate::str::contains("appdb_qa"))
        .stdout(predicate::str::contains("Portage complete"));

    call_log.assert(predicate::path::missing());
}

#[test]
fn quiet_dry_run_prints_only_the_commands() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("portage.yml");
    config.write_str(SCHEMA_ONLY_CONFIG).unwrap();

    let bin = temp.child("bin");
    bin.create_dir_all().unwrap();
    install_fake_client(bin.path(), "mysql");
    install_fake_client(bin.path(), "mysqldump");

    dbport()
        .arg(config.path())
        .args(["--quiet", "--dry-run"])
        .env("PATH", bin.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("mysqldump"))
        .stdout(predicate::str::contains("Starting portage").not())
        .stdout(predicate::str::contains("Portage complete").not());
}

#[test]
fn live_run_invokes_both_clients() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("portage.yml");
    config.write_str(SCHEMA_ONLY_CONFIG).unwrap();

    let bin = temp.child("bin");
    bin.create_dir_all().unwrap();
    install_fake_client(bin.path(), "mysql");
    install_fake_client(bin.path(), "mysqldump");
    let call_log = temp.child("calls.log");

    dbport()
        .arg(config.path())
        .env("PATH", bin.path())
        .env("CALL_LOG", call_log.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Portage complete"));

    // one schema dump, one load
    let calls = std::fs::read_to_string(call_log.path()).unwrap();
    assert_eq!(calls.lines().collect::<Vec<_>>(), ["mysqldump", "mysql"]);
}

#[test]
fn missing_update_script_reports_but_run_continues() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("portage.yml");
    config
        .write_str(
            r#"
portages:
  - source: {host: prod-db, user: reader, password: pw, name: appdb}
    dest: {host: qa-db, user: root, password: rootpw, name: appdb_qa}
    fetch_data: false
    update: [missing.sql]
"#,
        )
        .unwrap();

    let bin = temp.child("bin");
    bin.create_dir_all().unwrap();
    install_fake_client(bin.path(), "mysql");
    install_fake_client(bin.path(), "mysqldump");

    dbport()
        .arg(config.path())
        .arg("--dry-run")
        .env("PATH", bin.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("missing.sql does not exist"))
        .stdout(predicate::str::contains("Portage complete"));
}

#[test]
fn debug_mode_prints_parsed_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("portage.yml");
    config.write_str(SCHEMA_ONLY_CONFIG).unwrap();

    let bin = temp.child("bin");
    bin.create_dir_all().unwrap();
    install_fake_client(bin.path(), "mysql");
    install_fake_client(bin.path(), "mysqldump");

    dbport()
        .arg(config.path())
        .args(["--debug", "--dry-run"])
        .env("PATH", bin.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PortageJob"))
        .stdout(predicate::str::contains("prod-db"));
}
