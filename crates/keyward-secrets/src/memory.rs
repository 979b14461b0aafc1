//! In-memory keychain provider.
//!
//! Intended for tests and ephemeral sessions: items are lost when the process
//! exits. Payloads are held in [`SecretBytes`] so removed items are zeroed.
//!
//! Items are unique per (service, account). A scoped query only matches an
//! item saved under the same access group, while an unscoped query matches
//! regardless of group, which mirrors how platform keychains search every
//! group the caller may read.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use keyward_core::SecretBytes;
use parking_lot::{Mutex, RwLock};

use crate::error::ProviderError;
use crate::provider::KeychainProvider;
use crate::types::{Capabilities, ItemQuery};

/// Provider operations, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOp {
    Insert,
    Lookup,
    Delete,
    DeleteService,
}

struct StoredItem {
    access_group: Option<String>,
    data: SecretBytes,
}

/// In-memory implementation of [`KeychainProvider`].
pub struct MemoryKeychain {
    items: RwLock<HashMap<(String, String), StoredItem>>,
    deny_group_scope: AtomicBool,
    failures: Mutex<HashMap<ProviderOp, ProviderError>>,
    calls: AtomicUsize,
}

impl MemoryKeychain {
    /// Create an empty keychain that honors access groups.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            deny_group_scope: AtomicBool::new(false),
            failures: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Reject every scoped request with `MissingEntitlement`, as a process
    /// without the access-group entitlement would see.
    pub fn deny_group_scope(self) -> Self {
        self.deny_group_scope.store(true, Ordering::SeqCst);
        self
    }

    /// Toggle entitlement denial on a shared instance.
    pub fn set_deny_group_scope(&self, deny: bool) {
        self.deny_group_scope.store(deny, Ordering::SeqCst);
    }

    /// Make every call of `op` fail with `error` until cleared.
    pub fn fail_operation(&self, op: ProviderOp, error: ProviderError) {
        self.failures.lock().insert(op, error);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    /// Number of provider calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored items across all services.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Check if no items are stored.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Access group an item was stored under, if the item exists.
    pub fn stored_group(&self, service: &str, account: &str) -> Option<Option<String>> {
        self.items
            .read()
            .get(&(service.to_string(), account.to_string()))
            .map(|item| item.access_group.clone())
    }

    /// Count the call, then apply injected failures and entitlement denial.
    fn precheck(&self, op: ProviderOp, access_group: Option<&str>) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.lock().get(&op) {
            return Err(*error);
        }
        if access_group.is_some() && self.deny_group_scope.load(Ordering::SeqCst) {
            return Err(ProviderError::MissingEntitlement);
        }
        Ok(())
    }
}

impl Default for MemoryKeychain {
    fn default() -> Self {
        Self::new()
    }
}

fn item_key(query: &ItemQuery<'_>) -> (String, String) {
    (query.service.to_string(), query.account.to_string())
}

fn group_matches(item: &StoredItem, query: &ItemQuery<'_>) -> bool {
    match query.access_group {
        Some(group) => item.access_group.as_deref() == Some(group),
        None => true,
    }
}

impl KeychainProvider for MemoryKeychain {
    fn capabilities(&self) -> Capabilities {
        Capabilities::GROUP_SCOPED
    }

    fn insert(&self, query: &ItemQuery<'_>, payload: &[u8]) -> Result<(), ProviderError> {
        self.precheck(ProviderOp::Insert, query.access_group)?;
        let mut items = self.items.write();
        let key = item_key(query);
        if items.contains_key(&key) {
            return Err(ProviderError::DuplicateItem);
        }
        items.insert(
            key,
            StoredItem {
                access_group: query.access_group.map(str::to_string),
                data: SecretBytes::from(payload),
            },
        );
        Ok(())
    }

    fn lookup(&self, query: &ItemQuery<'_>) -> Result<SecretBytes, ProviderError> {
        self.precheck(ProviderOp::Lookup, query.access_group)?;
        let items = self.items.read();
        match items.get(&item_key(query)) {
            Some(item) if group_matches(item, query) => Ok(item.data.clone()),
            _ => Err(ProviderError::NotFound),
        }
    }

    fn delete(&self, query: &ItemQuery<'_>) -> Result<(), ProviderError> {
        self.precheck(ProviderOp::Delete, query.access_group)?;
        let mut items = self.items.write();
        let key = item_key(query);
        match items.get(&key) {
            Some(item) if group_matches(item, query) => {
                items.remove(&key);
                Ok(())
            }
            _ => Err(ProviderError::NotFound),
        }
    }

    fn delete_service(&self, service: &str) -> Result<(), ProviderError> {
        self.precheck(ProviderOp::DeleteService, None)?;
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|(item_service, _), _| item_service != service);
        if items.len() == before {
            Err(ProviderError::NotFound)
        } else {
            Ok(())
        }
    }
}
