//! Keychain-backed secret storage for Keyward.
//!
//! [`SecretStore`] persists opaque key material under logical names through a
//! [`KeychainProvider`], retrying without the shared access group when the
//! platform reports a missing entitlement.

pub mod audit;
pub mod error;
pub mod keychain;
pub mod memory;
pub mod provider;
pub mod store;
pub mod types;

pub use audit::{AuditSink, FileAuditSink, MemoryAuditSink, NoopAuditSink, TracingAuditSink};
pub use error::{ProviderError, Result, SecretError};
pub use keychain::{native_provider, NativeKeychain};
pub use memory::{MemoryKeychain, ProviderOp};
pub use provider::KeychainProvider;
pub use store::SecretStore;
pub use types::{Accessibility, Capabilities, ItemQuery, IDENTITY_KEY_NAME, KEY_PREFIX};

pub use keyward_core::{secure_clear, SecretBytes, SecretString, SecureClear};
