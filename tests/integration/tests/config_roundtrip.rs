//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use keyward_core::config::{BackendKind, LogLevel, StoreConfigBuilder, DEFAULT_GROUP_ID};
use keyward_core::{ConfigError, StoreConfig};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keyward.json5");

    let config = StoreConfig::default();
    config.save(&path).unwrap();

    let loaded = StoreConfig::load(&path).unwrap();
    assert_eq!(loaded.service_id, config.service_id);
    assert_eq!(loaded.group_id, config.group_id);
    assert_eq!(loaded.backend, config.backend);
    assert_eq!(loaded.audit.enabled, config.audit.enabled);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("keyward.json5");

    let config = StoreConfigBuilder::new()
        .service_id("chat.custom")
        .without_group()
        .backend(BackendKind::Memory)
        .log_level(LogLevel::Debug)
        .build_validated()
        .unwrap();
    config.save(&path).unwrap();

    let loaded = StoreConfig::load(&path).unwrap();
    assert_eq!(loaded.service_id, "chat.custom");
    assert_eq!(loaded.group_id, None);
    assert_eq!(loaded.backend, BackendKind::Memory);
    assert_eq!(loaded.logging.level, LogLevel::Debug);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn test_config_json5_comments_and_defaults() {
    let config = StoreConfig::parse(
        r#"{
            // only the service is overridden
            service_id: 'chat.partial',
        }"#,
    )
    .unwrap();
    assert_eq!(config.service_id, "chat.partial");
    assert_eq!(config.group_id.as_deref(), Some(DEFAULT_GROUP_ID));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_load_nonexistent() {
    let result = StoreConfig::load(Path::new("/nonexistent/keyward.json5"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_config_parse_invalid() {
    let result = StoreConfig::parse("not valid json5 {");
    assert!(result.is_err());
}

#[test]
fn test_config_validation_reports_every_problem() {
    let config = StoreConfigBuilder::new()
        .service_id("has space")
        .group_id("")
        .build();
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("service_id"));
    assert!(err.contains("group_id"));
}

#[test]
fn test_cli_config_init_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keyward.json5");

    keyward_cli::commands::config::init(&path, false).unwrap();
    let loaded = keyward_cli::load_config(Some(&path)).unwrap();
    assert!(loaded.audit.enabled);
    assert!(loaded.audit_file().is_some());
}
