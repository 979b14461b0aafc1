//! The keychain provider boundary.

use keyward_core::SecretBytes;

use crate::error::ProviderError;
use crate::types::{Capabilities, ItemQuery};

/// A secure key-value facility addressed by (service, account, access group).
///
/// Implementations must:
/// - Keep item data out of logs and error values
/// - Be safe to call from several threads at once
/// - Report a scoped request they cannot honor as
///   [`ProviderError::MissingEntitlement`]
pub trait KeychainProvider: Send + Sync {
    /// What this backend supports when no override is configured.
    fn capabilities(&self) -> Capabilities;

    /// Add a new item.
    ///
    /// # Errors
    /// - `DuplicateItem` if the account already exists in the service
    fn insert(&self, query: &ItemQuery<'_>, payload: &[u8]) -> Result<(), ProviderError>;

    /// Read an item's data.
    ///
    /// # Errors
    /// - `NotFound` if no item matches
    fn lookup(&self, query: &ItemQuery<'_>) -> Result<SecretBytes, ProviderError>;

    /// Remove an item.
    ///
    /// # Errors
    /// - `NotFound` if no item matches
    fn delete(&self, query: &ItemQuery<'_>) -> Result<(), ProviderError>;

    /// Remove every item of a service.
    ///
    /// # Errors
    /// - `NotFound` if the service holds no items
    fn delete_service(&self, service: &str) -> Result<(), ProviderError>;
}
