//! Error scenario integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn volux_bin(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("volux").expect("binary built");
    cmd.env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_RUNTIME_DIR", dir.path())
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn config_get_unknown_key() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "get", "unknown_key"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_unknown_key() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "set", "unknown_key", "value"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Valid keys"));
}

#[test]
fn config_set_invalid_bool() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "set", "always_visible", "maybe"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'true' or 'false'"));
}

#[test]
fn config_set_invalid_volume_tool() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "set", "volume_tool", "mixer9000"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid volume tool"));
}

#[test]
fn config_set_invalid_mode() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "set", "mode", "sideways"])
        .assert()
        .code(1);
}

#[test]
fn gesture_box_size_rejects_text_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "gesture-box-size", "abc", "100"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Please enter valid numbers"));
    assert!(!dir
        .path()
        .join("config")
        .join("volux")
        .join("preferences.toml")
        .exists());
}

#[test]
fn ctl_without_daemon_fails() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["ctl", "status"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No daemon running"));
}

#[test]
fn ctl_pointer_with_unknown_widget_is_usage_error() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["ctl", "pointer", "slider", "down", "1", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid widget"));
}

#[test]
fn ctl_move_rejects_unknown_state() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["ctl", "move", "sideways"])
        .assert()
        .code(2);
}

#[test]
fn ctl_gesture_box_size_rejects_non_numbers() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["ctl", "gesture-box-size", "wide", "100"])
        .assert()
        .code(2);
}
