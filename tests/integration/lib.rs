//! Shared fixtures for the Keyward integration tests.

use std::sync::Arc;

use keyward_secrets::{Capabilities, MemoryAuditSink, MemoryKeychain, SecretStore};

pub const SERVICE: &str = "chat.keyward.integration";
pub const GROUP: &str = "group.chat.keyward.integration";

/// A store over an in-memory keychain, with its keychain and audit sink.
pub struct Fixture {
    pub store: SecretStore,
    pub keychain: Arc<MemoryKeychain>,
    pub audit: Arc<MemoryAuditSink>,
}

impl Fixture {
    /// Group-scoped store; `entitled` controls whether scoped calls succeed.
    pub fn new(entitled: bool) -> Self {
        let keychain = MemoryKeychain::new();
        keychain.set_deny_group_scope(!entitled);
        Self::over(Arc::new(keychain), SERVICE, Capabilities::GROUP_SCOPED)
    }

    /// Store that never asks for group scope.
    pub fn app_only() -> Self {
        Self::over(Arc::new(MemoryKeychain::new()), SERVICE, Capabilities::APP_ONLY)
    }

    /// Store for `service` over an existing keychain.
    pub fn over(keychain: Arc<MemoryKeychain>, service: &str, capabilities: Capabilities) -> Self {
        let audit = Arc::new(MemoryAuditSink::new());
        let store = SecretStore::new(keychain.clone(), service)
            .with_group(GROUP)
            .with_capabilities(capabilities)
            .with_audit(audit.clone());
        Self {
            store,
            keychain,
            audit,
        }
    }
}
