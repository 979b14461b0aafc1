//! Core types for keychain addressing.

use crate::error::{Result, SecretError};

/// Prefix applied to every logical name before it reaches the keychain.
pub const KEY_PREFIX: &str = "identity_";

/// Logical name of the long-lived static identity key.
pub const IDENTITY_KEY_NAME: &str = "noiseStaticKey";

/// Maximum allowed length for a logical name.
pub const MAX_NAME_LEN: usize = 128;

/// When a stored item may be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Accessibility {
    /// Readable only while the device or session is unlocked.
    #[default]
    WhenUnlocked,
}

/// What the keychain backend can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether items may be scoped to a shared access group.
    pub supports_group_scope: bool,
}

impl Capabilities {
    /// A backend that honors access groups.
    pub const GROUP_SCOPED: Self = Self {
        supports_group_scope: true,
    };

    /// A backend limited to app-private items.
    pub const APP_ONLY: Self = Self {
        supports_group_scope: false,
    };
}

/// Provider-level address of a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemQuery<'a> {
    pub service: &'a str,
    pub account: &'a str,
    pub access_group: Option<&'a str>,
    pub accessibility: Accessibility,
}

impl<'a> ItemQuery<'a> {
    pub fn new(service: &'a str, account: &'a str) -> Self {
        Self {
            service,
            account,
            access_group: None,
            accessibility: Accessibility::WhenUnlocked,
        }
    }

    pub fn with_group(mut self, group: Option<&'a str>) -> Self {
        self.access_group = group;
        self
    }
}

/// Validate that a logical name is safe to derive a keychain account from.
///
/// Allowed: ASCII alphanumeric, underscore, hyphen, dot. Max length 128.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SecretError::InvalidName(
            "name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(SecretError::InvalidName(format!(
            "name exceeds maximum length of {MAX_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(SecretError::InvalidName(format!(
            "name contains invalid characters (allowed: alphanumeric, underscore, hyphen, dot): {name}"
        )));
    }
    Ok(())
}

/// Derive the keychain account for a logical name.
pub fn account_for(name: &str) -> String {
    format!("{KEY_PREFIX}{name}")
}
