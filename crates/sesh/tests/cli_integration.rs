//! CLI integration tests for the sesh command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Configuration commands work against temporary directories
//! - Connection failures are reported with a non-zero exit code
//!
//! Note: These tests do not require a running Redis server.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the sesh binary, isolated from the caller's config.
fn sesh(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sesh").unwrap();
    cmd.current_dir(dir.path())
        .env("SESH_CONFIG_DIR", dir.path().join("user"))
        .env_remove("SESH_REDIS_URL")
        .env_remove("SESH_REDIS_PASSWORD")
        .env_remove("SESH_REDIS_PREFIX")
        .env_remove("RUST_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    let dir = TempDir::new().unwrap();
    sesh(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sessions stored in Redis"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    sesh(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sesh"));
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    sesh(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ping"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("dump"))
        .stdout(predicate::str::contains("ttl"))
        .stdout(predicate::str::contains("release"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_set_requires_arguments() {
    let dir = TempDir::new().unwrap();
    sesh(&dir)
        .args(["set", "sid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_set_rejects_unknown_type() {
    let dir = TempDir::new().unwrap();
    sesh(&dir)
        .args(["set", "sid", "k", "v", "--type", "date"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_config_dir_env() {
    let dir = TempDir::new().unwrap();
    sesh(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_local_then_show() {
    let dir = TempDir::new().unwrap();
    sesh(&dir)
        .args(["config", "init", "--local"])
        .assert()
        .success();
    assert!(dir.path().join("sesh.toml").is_file());

    sesh(&dir)
        .args(["config", "init", "--local"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    sesh(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("redis://127.0.0.1:6379"))
        .stdout(predicate::str::contains("decode_policy"));
}

#[test]
fn test_config_show_redacts_password() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("sesh.toml"),
        "[redis]\nurl = \"redis://cache:6379\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    sesh(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("redis://cache:6379"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_which_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("sesh.toml"), "[redis]\nprefix = \"x:\"\n").unwrap();

    sesh(&dir)
        .args(["--json", "config", "which"])
        .env("SESH_REDIS_PREFIX", "env:")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"loaded\": true"))
        .stdout(predicate::str::contains("SESH_REDIS_PREFIX"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Connection Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ping_unreachable_fails() {
    let dir = TempDir::new().unwrap();
    sesh(&dir)
        .args(["--url", "redis://127.0.0.1:1", "ping"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unreachable"));
}

#[test]
fn test_get_unreachable_fails() {
    let dir = TempDir::new().unwrap();
    sesh(&dir)
        .args(["--url", "redis://127.0.0.1:1", "get", "sid", "k"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not reach Redis"));
}
