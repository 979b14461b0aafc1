//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default keychain service identifier.
pub const DEFAULT_SERVICE_ID: &str = "chat.keyward";

/// Default shared access group.
pub const DEFAULT_GROUP_ID: &str = "group.chat.keyward";

/// Main Keyward store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Service identifier scoping every entry to this application.
    #[serde(default = "default_service_id")]
    pub service_id: String,

    /// Shared access group. `null` keeps entries app-private.
    #[serde(default = "default_group_id")]
    pub group_id: Option<String>,

    /// Override for the backend's group-scope capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_group_scope: Option<bool>,

    /// Keychain backend.
    #[serde(default)]
    pub backend: BackendKind,

    /// Audit settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            service_id: default_service_id(),
            group_id: default_group_id(),
            supports_group_scope: None,
            backend: BackendKind::default(),
            audit: AuditConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_service_id() -> String {
    DEFAULT_SERVICE_ID.to_string()
}

fn default_group_id() -> Option<String> {
    Some(DEFAULT_GROUP_ID.to_string())
}

/// Keychain backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Platform keychain or keyring.
    #[default]
    Native,
    /// Process-local map, lost on exit.
    Memory,
}

/// Audit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Emit audit records.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Append JSON lines to this file instead of the log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

fn default_true() -> bool {
    true
}
