//! Configuration loading and persistence.

use super::{BackendKind, LogLevel, StoreConfig};
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum length of a keychain service or group identifier.
const MAX_IDENTIFIER_LEN: usize = 255;

impl StoreConfig {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = paths::config_file()?;
        self.save(&path)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `KEYWARD_SERVICE_ID` / `KEYWARD_GROUP_ID` overrides.
    ///
    /// A group override of `none` disables the shared access group.
    pub fn apply_env_overrides(&mut self) {
        if let Some(service) = env::get_var(env::vars::KEYWARD_SERVICE_ID) {
            self.service_id = service;
        }
        if let Some(group) = env::get_var(env::vars::KEYWARD_GROUP_ID) {
            self.group_id = if group.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(group)
            };
        }
    }

    /// Load from the default path, falling back to defaults if no file exists,
    /// then apply environment overrides.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let mut config = match Self::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(path)) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        // 1. Service identifier
        if let Some(problem) = identifier_problem(&self.service_id) {
            errors.push(format!("service_id {}", problem));
        }

        // 2. Group identifier, when present
        if let Some(group) = &self.group_id {
            if let Some(problem) = identifier_problem(group) {
                errors.push(format!("group_id {}", problem));
            }
        }

        // 3. Forcing group scope on requires a group to scope to
        if self.supports_group_scope == Some(true) && self.group_id.is_none() {
            errors.push("supports_group_scope is true but group_id is not set".to_string());
        }

        // 4. Audit file must name a file
        if let Some(file) = &self.audit.file {
            if file.file_name().is_none() {
                errors.push(format!(
                    "audit.file '{}' does not name a file",
                    file.display()
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Resolved audit log path, if file auditing is configured.
    pub fn audit_file(&self) -> Option<PathBuf> {
        self.audit
            .file
            .as_ref()
            .map(|p| paths::expand_tilde(&p.to_string_lossy()))
    }
}

fn identifier_problem(id: &str) -> Option<&'static str> {
    if id.is_empty() {
        Some("must not be empty")
    } else if id.len() > MAX_IDENTIFIER_LEN {
        Some("exceeds 255 characters")
    } else if id.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else {
        None
    }
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service identifier.
    pub fn service_id(mut self, service_id: impl Into<String>) -> Self {
        self.config.service_id = service_id.into();
        self
    }

    /// Set the shared access group.
    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.config.group_id = Some(group_id.into());
        self
    }

    /// Keep entries app-private.
    pub fn without_group(mut self) -> Self {
        self.config.group_id = None;
        self
    }

    /// Override the backend's group-scope capability.
    pub fn supports_group_scope(mut self, supported: bool) -> Self {
        self.config.supports_group_scope = Some(supported);
        self
    }

    /// Select the keychain backend.
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Write audit records to a JSON-lines file.
    pub fn audit_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.audit.file = Some(path.into());
        self
    }

    /// Disable audit records.
    pub fn audit_disabled(mut self) -> Self {
        self.config.audit.enabled = false;
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> StoreConfig {
        self.config
    }

    /// Build and validate the configuration.
    pub fn build_validated(self) -> Result<StoreConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
