use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary config directory
fn temp_config_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get the session file path in the temp dir
fn session_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".buddy-dash").join("session.json")
}

const BINARY_NAME: &str = "buddy-dash";

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("dashboard for marketplace buddies"));
}

#[test]
/// Logout command should delete an existing session file.
fn logout_deletes_session_file() {
    let tmp = temp_config_dir();
    let session_path = session_file_path(&tmp);
    fs::create_dir_all(session_path.parent().unwrap()).unwrap();
    fs::write(&session_path, "{}").unwrap();

    // Ensure the file exists
    assert!(session_path.exists());

    // Run the command
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("logout")
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Signing out"));

    // Confirm the file was deleted
    assert!(!session_path.exists());
}

#[test]
/// Starting without a stored session should fail with a login hint.
fn start_without_session_points_to_login() {
    let tmp = temp_config_dir();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("start")
        .arg("--headless")
        .env("HOME", tmp.path())
        .assert()
        .failure()
        .stderr(contains("login"));
}
