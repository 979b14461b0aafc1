//! Error types for secret management.
//!
//! No variant carries payload bytes. Names and status codes only.

use thiserror::Error;

/// OSStatus-compatible code for a missing item.
pub const STATUS_NOT_FOUND: i32 = -25300;
/// OSStatus-compatible code for a duplicate item.
pub const STATUS_DUPLICATE_ITEM: i32 = -25299;
/// OSStatus-compatible code for a missing access-group entitlement.
pub const STATUS_MISSING_ENTITLEMENT: i32 = -34018;

/// Non-success statuses reported by a [`crate::KeychainProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("item not found")]
    NotFound,

    #[error("duplicate item")]
    DuplicateItem,

    #[error("missing entitlement for access group")]
    MissingEntitlement,

    #[error("keychain status {0}")]
    Failure(i32),
}

impl ProviderError {
    /// Classify a raw status code.
    pub fn from_code(code: i32) -> Self {
        match code {
            STATUS_NOT_FOUND => Self::NotFound,
            STATUS_DUPLICATE_ITEM => Self::DuplicateItem,
            STATUS_MISSING_ENTITLEMENT => Self::MissingEntitlement,
            other => Self::Failure(other),
        }
    }

    /// The raw status code.
    pub fn code(&self) -> i32 {
        match self {
            Self::NotFound => STATUS_NOT_FOUND,
            Self::DuplicateItem => STATUS_DUPLICATE_ITEM,
            Self::MissingEntitlement => STATUS_MISSING_ENTITLEMENT,
            Self::Failure(code) => *code,
        }
    }
}

/// Errors that can occur during secret operations.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Invalid secret name: {0}")]
    InvalidName(String),

    #[error("Shared access group unavailable")]
    EntitlementDenied,

    #[error("Keychain {context} failed: {source}")]
    Provider {
        context: &'static str,
        #[source]
        source: ProviderError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] keyward_core::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SecretError {
    pub(crate) fn provider(context: &'static str, source: ProviderError) -> Self {
        match source {
            ProviderError::MissingEntitlement => Self::EntitlementDenied,
            source => Self::Provider { context, source },
        }
    }

    /// Status code of the underlying provider failure, if any.
    pub fn status_code(&self) -> Option<i32> {
        match self {
            Self::Provider { source, .. } => Some(source.code()),
            Self::EntitlementDenied => Some(STATUS_MISSING_ENTITLEMENT),
            _ => None,
        }
    }
}

/// Convenience result alias for secret operations.
pub type Result<T> = std::result::Result<T, SecretError>;
