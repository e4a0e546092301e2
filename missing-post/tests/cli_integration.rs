//! CLI integration tests for missing-post
//!
//! These never reach the network: every case fails or finishes before the
//! first API call.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CREDENTIAL_VARS: [&str; 4] = ["API_KEY", "API_KEY_SECRET", "ACCESS_TOKEN", "ACCESS_SECRET"];

/// Command with a clean environment and fake X credentials
fn cmd_with_credentials() -> Command {
    let mut cmd = Command::cargo_bin("missing-post").unwrap();
    cmd.env_clear();
    for var in CREDENTIAL_VARS {
        cmd.env(var, format!("test-{}", var.to_lowercase()));
    }
    cmd
}

#[test]
fn test_help_lists_environment() {
    Command::cargo_bin("missing-post")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("API_KEY"))
        .stdout(predicate::str::contains("DB_HOST"))
        .stdout(predicate::str::contains("EXIT CODES"));
}

#[test]
fn test_missing_credentials_exit_1() {
    Command::cargo_bin("missing-post")
        .unwrap()
        .env_clear()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load configuration"))
        .stderr(predicate::str::contains(
            "Missing required environment variable: API_KEY",
        ));
}

#[test]
fn test_invalid_db_port_exit_1() {
    cmd_with_credentials()
        .env("DB_PORT", "not-a-port")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid value for DB_PORT: not-a-port"));
}

#[test]
fn test_invalid_log_format_is_usage_error() {
    Command::cargo_bin("missing-post")
        .unwrap()
        .args(["--log-format", "yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid log format"));
}

#[test]
fn test_post_image_missing_file() {
    cmd_with_credentials()
        .args(["post-image", "/nonexistent/dir/photo.png"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to post /nonexistent/dir/photo.png"))
        .stderr(predicate::str::contains("Failed to read media file"));
}

#[test]
fn test_post_image_rejects_non_image() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.txt");
    std::fs::write(&path, "not an image").unwrap();

    cmd_with_credentials()
        .arg("post-image")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported image type"));
}

#[test]
fn test_post_image_dry_run() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("your-image.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    cmd_with_credentials()
        .arg("post-image")
        .arg(&path)
        .args(["--text", "ทดสอบ", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would post"))
        .stdout(predicate::str::contains("ทดสอบ"));
}
