//! CLI integration tests

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with config and runtime dirs isolated in `dir`
fn volux_bin(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("volux").expect("binary built");
    cmd.env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_RUNTIME_DIR", dir.path())
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("RUST_LOG");
    cmd
}

fn prefs_file(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("config").join("volux").join("preferences.toml")
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("gesture box"))
        .stdout(predicate::str::contains("--headless"))
        .stdout(predicate::str::contains("--no-persist"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("ctl"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("volux"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("volux"))
        .stdout(predicate::str::contains("preferences.toml"));
}

#[test]
fn config_init_then_list_shows_defaults() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir).args(["config", "init"]).assert().success();
    assert!(prefs_file(&dir).exists());

    volux_bin(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode: buttons"))
        .stdout(predicate::str::contains("auto_hide_delay: 3000"))
        .stdout(predicate::str::contains("opacity: 0.8"));
}

#[test]
fn config_init_twice_fails() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir).args(["config", "init"]).assert().success();
    volux_bin(&dir)
        .args(["config", "init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_set_then_get() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "set", "opacity", "0.5"])
        .assert()
        .success();
    volux_bin(&dir)
        .args(["config", "get", "opacity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.5"));
}

#[test]
fn config_set_clamps_auto_hide_delay() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "set", "auto_hide_delay", "60s"])
        .assert()
        .success();
    volux_bin(&dir)
        .args(["config", "get", "auto_hide_delay"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10000"));
}

#[test]
fn config_mode_is_a_radio_group() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "set", "mode", "gesture-box"])
        .assert()
        .success();
    volux_bin(&dir)
        .args(["config", "get", "floating_buttons"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
    volux_bin(&dir)
        .args(["config", "get", "mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gesture-box"));
}

#[test]
fn gesture_box_size_is_clamped() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "gesture-box-size", "10", "900"])
        .assert()
        .success();
    volux_bin(&dir)
        .args(["config", "get", "gesture_box_width"])
        .assert()
        .success()
        .stdout(predicate::str::contains("40"));
    volux_bin(&dir)
        .args(["config", "get", "gesture_box_height"])
        .assert()
        .success()
        .stdout(predicate::str::contains("400"));
}

#[test]
fn reset_positions_forgets_saved_coordinates() {
    let dir = TempDir::new().unwrap();
    volux_bin(&dir)
        .args(["config", "set", "floating_buttons_x", "321"])
        .assert()
        .success();
    volux_bin(&dir)
        .args(["config", "reset-positions"])
        .assert()
        .success();
    volux_bin(&dir)
        .args(["config", "get", "floating_buttons_x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));

    let content = fs::read_to_string(prefs_file(&dir)).unwrap();
    assert!(!content.contains("321"));
}
