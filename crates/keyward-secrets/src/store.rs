//! The secret store.
//!
//! [`SecretStore`] maps logical names to keychain items under a single service
//! identifier. Scoped operations first target the shared access group; when
//! the provider reports a missing entitlement the identical request is retried
//! without the group. Of the failure statuses only that one triggers the
//! retry; a scoped miss is also looked up among app-private items.
//!
//! The boolean/optional surface (`save`, `load`, `delete`, `delete_all`)
//! absorbs every provider error. The `try_*` methods expose the classified
//! [`SecretError`] for callers that want it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use keyward_core::config::BackendKind;
use keyward_core::{AuditEvent, KeychainOperation, SecretBytes, StoreConfig};
use tracing::{debug, error, warn};

use crate::audit::{AuditSink, FileAuditSink, NoopAuditSink, TracingAuditSink};
use crate::error::{ProviderError, Result, SecretError};
use crate::keychain::native_provider;
use crate::memory::MemoryKeychain;
use crate::provider::KeychainProvider;
use crate::types::{account_for, validate_name, Capabilities, ItemQuery, IDENTITY_KEY_NAME};

/// Keychain-backed store for named secrets.
pub struct SecretStore {
    provider: Arc<dyn KeychainProvider>,
    audit: Arc<dyn AuditSink>,
    service_id: String,
    group_id: Option<String>,
    capabilities: Capabilities,
    entitlement_warned: AtomicBool,
}

impl SecretStore {
    /// Create a store over `provider` for `service_id`, using the provider's
    /// own capabilities and auditing through `tracing`.
    pub fn new(provider: Arc<dyn KeychainProvider>, service_id: impl Into<String>) -> Self {
        let capabilities = provider.capabilities();
        Self {
            provider,
            audit: Arc::new(TracingAuditSink),
            service_id: service_id.into(),
            group_id: None,
            capabilities,
            entitlement_warned: AtomicBool::new(false),
        }
    }

    /// Scope entries to a shared access group when the backend allows it.
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Override the provider's capability descriptor.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Send audit events to `sink`.
    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Build a store from configuration.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        let provider: Arc<dyn KeychainProvider> = match config.backend {
            BackendKind::Native => native_provider(),
            BackendKind::Memory => Arc::new(MemoryKeychain::new()),
        };

        let mut store = Self::new(provider, config.service_id.clone());
        if let Some(group) = &config.group_id {
            store = store.with_group(group.clone());
        }
        if let Some(supported) = config.supports_group_scope {
            store = store.with_capabilities(Capabilities {
                supports_group_scope: supported,
            });
        }

        let audit: Arc<dyn AuditSink> = match (config.audit.enabled, config.audit_file()) {
            (false, _) => Arc::new(NoopAuditSink),
            (true, Some(path)) => Arc::new(FileAuditSink::open(path)?),
            (true, None) => Arc::new(TracingAuditSink),
        };
        Ok(store.with_audit(audit))
    }

    /// Build a store from the default configuration file and environment.
    pub fn from_default_config() -> Result<Self> {
        let config = StoreConfig::load_or_default()?;
        Self::from_config(&config)
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// The access group scoped requests use, if group scope is in play.
    fn scoped_group(&self) -> Option<&str> {
        if self.capabilities.supports_group_scope {
            self.group_id.as_deref()
        } else {
            None
        }
    }

    /// Run `op` scoped to the access group, retrying unscoped on a missing
    /// entitlement.
    ///
    /// A scoped `NotFound` is retried unscoped too, so app-private items
    /// written while the entitlement was missing stay readable and removable
    /// once it is granted. Only the entitlement case warns.
    fn with_group_fallback<T>(
        &self,
        context: &'static str,
        account: &str,
        op: impl Fn(&ItemQuery<'_>) -> std::result::Result<T, ProviderError>,
    ) -> std::result::Result<T, ProviderError> {
        let query = ItemQuery::new(&self.service_id, account);
        if let Some(group) = self.scoped_group() {
            match op(&query.with_group(Some(group))) {
                Err(ProviderError::MissingEntitlement) => self.note_entitlement_fallback(context),
                Err(ProviderError::NotFound) => {
                    debug!(context, "not found in access group, checking app-private items");
                }
                result => return result,
            }
        }
        op(&query)
    }

    fn note_entitlement_fallback(&self, context: &'static str) {
        if !self.entitlement_warned.swap(true, Ordering::Relaxed) {
            warn!(
                service = %self.service_id,
                group = self.group_id.as_deref().unwrap_or_default(),
                context,
                "access group entitlement missing; using app-private keychain items"
            );
        } else {
            debug!(context, "retrying without access group");
        }
    }

    /// Log and audit a failure that reaches the caller.
    fn report_failure(&self, context: &'static str, err: &SecretError) {
        if let Some(code) = err.status_code() {
            error!(service = %self.service_id, code, context, "keychain operation failed: {err}");
            self.audit.record(AuditEvent::error(code, context));
        }
    }

    // -- Result-returning surface ---------------------------------------

    /// Replace the entry `name` with `payload`.
    pub fn try_save(&self, name: &str, payload: &[u8]) -> Result<()> {
        validate_name(name)?;
        let account = account_for(name);

        match self.with_group_fallback("delete", &account, |q| self.provider.delete(q)) {
            Ok(()) | Err(ProviderError::NotFound) => {}
            Err(e) => debug!(name, code = e.code(), "could not remove previous entry"),
        }

        debug!(name, len = payload.len(), "saving secret");
        self.with_group_fallback("insert", &account, |q| self.provider.insert(q, payload))
            .map_err(|e| SecretError::provider("insert", e))
    }

    /// Read the entry `name`. `Ok(None)` when absent.
    pub fn try_load(&self, name: &str) -> Result<Option<SecretBytes>> {
        validate_name(name)?;
        let account = account_for(name);

        match self.with_group_fallback("lookup", &account, |q| self.provider.lookup(q)) {
            Ok(data) => Ok(Some(data)),
            Err(ProviderError::NotFound) => Ok(None),
            Err(e) => Err(SecretError::provider("lookup", e)),
        }
    }

    /// Remove the entry `name`. Succeeds when it was already absent.
    pub fn try_delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let account = account_for(name);

        debug!(name, "deleting secret");
        match self.with_group_fallback("delete", &account, |q| self.provider.delete(q)) {
            Ok(()) | Err(ProviderError::NotFound) => Ok(()),
            Err(e) => Err(SecretError::provider("delete", e)),
        }
    }

    /// Remove every entry of this store's service.
    pub fn try_delete_all(&self) -> Result<()> {
        debug!(service = %self.service_id, "deleting all secrets");
        match self.provider.delete_service(&self.service_id) {
            Ok(()) | Err(ProviderError::NotFound) => Ok(()),
            Err(e) => Err(SecretError::provider("delete_all", e)),
        }
    }

    // -- Boolean/optional surface ---------------------------------------

    /// Save `payload` under `name`, replacing any previous value.
    ///
    /// Returns true only when the insertion was confirmed.
    pub fn save(&self, name: &str, payload: &[u8]) -> bool {
        let result = self.try_save(name, payload);
        match &result {
            Ok(()) => {}
            Err(SecretError::InvalidName(reason)) => {
                warn!(reason = %reason, "rejected save");
                return false;
            }
            Err(SecretError::Provider {
                source: ProviderError::DuplicateItem,
                ..
            }) => {
                warn!(name, "entry reappeared between delete and insert");
            }
            Err(e) => self.report_failure("save", e),
        }
        let success = result.is_ok();
        self.audit
            .record(AuditEvent::operation(KeychainOperation::Save, name, success));
        success
    }

    /// Load the payload stored under `name`, or `None` when absent or unreadable.
    pub fn load(&self, name: &str) -> Option<SecretBytes> {
        match self.try_load(name) {
            Ok(data) => data,
            Err(SecretError::InvalidName(reason)) => {
                warn!(reason = %reason, "rejected load");
                None
            }
            Err(e) => {
                self.report_failure("load", &e);
                None
            }
        }
    }

    /// Delete `name`. True when the entry is gone, including when it never existed.
    pub fn delete(&self, name: &str) -> bool {
        let result = self.try_delete(name);
        match &result {
            Ok(()) => {}
            Err(SecretError::InvalidName(reason)) => {
                warn!(reason = %reason, "rejected delete");
                return false;
            }
            Err(e) => self.report_failure("delete", e),
        }
        let success = result.is_ok();
        self.audit
            .record(AuditEvent::operation(KeychainOperation::Delete, name, success));
        success
    }

    /// Delete every entry of this service.
    pub fn delete_all(&self) -> bool {
        match self.try_delete_all() {
            Ok(()) => true,
            Err(e) => {
                self.report_failure("delete_all", &e);
                false
            }
        }
    }

    /// Whether the static identity key is present and readable.
    pub fn verify_identity_key_exists(&self) -> bool {
        self.load(IDENTITY_KEY_NAME).is_some()
    }
}
