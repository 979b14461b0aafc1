//! Audit logging types.
//!
//! Audit records name the logical key and the outcome. They never carry
//! payload bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Timestamp.
    pub timestamp: DateTime<Utc>,

    /// Event details.
    pub event: AuditEvent,
}

impl AuditEntry {
    /// Create a new audit entry stamped with the current time.
    pub fn new(event: AuditEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// An audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A keychain mutation completed.
    KeychainOperation {
        operation: KeychainOperation,
        key_name: String,
        success: bool,
    },

    /// The keychain returned an unexpected status.
    KeychainError { code: i32, context: String },
}

impl AuditEvent {
    /// Record the outcome of a keychain mutation.
    pub fn operation(operation: KeychainOperation, key_name: impl Into<String>, success: bool) -> Self {
        Self::KeychainOperation {
            operation,
            key_name: key_name.into(),
            success,
        }
    }

    /// Record an unexpected keychain status.
    pub fn error(code: i32, context: impl Into<String>) -> Self {
        Self::KeychainError {
            code,
            context: context.into(),
        }
    }

    /// The logical key this event concerns, if any.
    pub fn key_name(&self) -> Option<&str> {
        match self {
            Self::KeychainOperation { key_name, .. } => Some(key_name),
            Self::KeychainError { .. } => None,
        }
    }
}

/// Keychain mutation kinds that are audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeychainOperation {
    Save,
    Delete,
}

impl KeychainOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Delete => "delete",
        }
    }
}
