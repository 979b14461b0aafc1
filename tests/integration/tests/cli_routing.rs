//! CLI routing integration tests.
//!
//! These tests parse real argument vectors and run them in-process against a
//! memory-backed configuration, so no platform keychain is touched.

use std::path::{Path, PathBuf};

use clap::Parser;
use keyward_cli::{run, Cli};
use keyward_core::StoreConfig;
use tempfile::TempDir;

/// Write a memory-backed config into `dir` and return its path.
fn memory_config(dir: &Path) -> PathBuf {
    let path = dir.join("keyward.json5");
    std::fs::write(
        &path,
        "{ service_id: 'chat.keyward.cli-test', backend: 'memory', audit: { enabled: false } }",
    )
    .unwrap();
    path
}

fn run_args(config: &Path, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["keyward", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv)?)
}

#[test]
fn test_cli_save_with_hex() {
    let dir = TempDir::new().unwrap();
    let config = memory_config(dir.path());
    run_args(&config, &["save", "noiseStaticKey", "--hex", "0011aabb"]).unwrap();
}

#[test]
fn test_cli_save_rejects_invalid_input() {
    let dir = TempDir::new().unwrap();
    let config = memory_config(dir.path());
    assert!(run_args(&config, &["save", "token", "--hex", "zz"]).is_err());
    assert!(run_args(&config, &["save", "bad/name", "--hex", "00"]).is_err());
}

#[test]
fn test_cli_load_missing_fails() {
    let dir = TempDir::new().unwrap();
    let config = memory_config(dir.path());
    assert!(run_args(&config, &["load", "absent"]).is_err());
}

#[test]
fn test_cli_delete_absent_succeeds() {
    let dir = TempDir::new().unwrap();
    let config = memory_config(dir.path());
    run_args(&config, &["delete", "absent"]).unwrap();
}

#[test]
fn test_cli_purge_requires_yes() {
    let dir = TempDir::new().unwrap();
    let config = memory_config(dir.path());
    assert!(run_args(&config, &["purge"]).is_err());
    run_args(&config, &["purge", "--yes"]).unwrap();
}

#[test]
fn test_cli_verify_fresh_store_fails() {
    let dir = TempDir::new().unwrap();
    let config = memory_config(dir.path());
    assert!(run_args(&config, &["verify"]).is_err());
}

#[test]
fn test_cli_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh").join("keyward.json5");

    run_args(&path, &["config", "init"]).unwrap();
    assert!(StoreConfig::load(&path).is_ok());
    assert!(run_args(&path, &["config", "init"]).is_err());
    run_args(&path, &["config", "init", "--force"]).unwrap();
    run_args(&path, &["config", "show"]).unwrap();
}

#[test]
fn test_cli_malformed_config_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keyward.json5");
    std::fs::write(&path, "{ backend: ").unwrap();
    assert!(run_args(&path, &["verify"]).is_err());
}

#[test]
fn test_cli_unknown_command() {
    assert!(Cli::try_parse_from(["keyward", "nonexistent-command"]).is_err());
}
