//! Exit status of the `cv-helper` binary.

use std::path::Path;
use std::process::{Command, Output};

fn run_cli(config_dir: &Path, args: &[&str]) -> Output {
    // Point at a missing config file so the user's own config is never read
    let config = config_dir.join("config.toml");
    Command::new(env!("CARGO_BIN_EXE_cv-helper"))
        .arg("-c")
        .arg(&config)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("run cv-helper")
}

#[test]
fn test_missing_video_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["-f", "play_video", "-p", "/nonexistent.mp4"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: "), "stderr was: {}", stderr);
    assert!(stderr.contains("/nonexistent.mp4"));
}

#[test]
fn test_missing_image_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["-f", "read_image", "-p", "/nonexistent.png"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: "));
}

#[test]
fn test_function_without_path_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["-f", "write_video"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--path"));
}

#[test]
fn test_config_show_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["config", "show"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Quit key: q"));
}

#[test]
fn test_invalid_frame_rate_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["-f", "play_video", "-p", "clip.mp4", "-r", "0"]);

    // clap reports usage errors with status 2
    assert_eq!(output.status.code(), Some(2));
}
