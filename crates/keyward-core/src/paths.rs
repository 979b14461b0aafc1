//! Path resolution utilities.

use crate::env;
use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the Keyward base directory (`$KEYWARD_HOME` or ~/.keyward).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = env::get_var(env::vars::KEYWARD_HOME) {
        return Ok(expand_tilde(&home));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".keyward"))
}

/// Get the main config file path (`$KEYWARD_CONFIG` or ~/.keyward/keyward.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    if let Some(path) = env::get_var(env::vars::KEYWARD_CONFIG) {
        return Ok(expand_tilde(&path));
    }
    Ok(base_dir()?.join("keyward.json5"))
}

/// Get the audit log directory (~/.keyward/audit).
pub fn audit_dir() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("audit"))
}

/// Get the default audit log file (~/.keyward/audit/keychain.jsonl).
pub fn audit_file() -> Result<PathBuf, ConfigError> {
    Ok(audit_dir()?.join("keychain.jsonl"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
