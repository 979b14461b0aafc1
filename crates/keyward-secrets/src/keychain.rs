//! Native keychain providers.
//!
//! - **macOS / iOS**: generic-password items via Security.framework, with
//!   access-group scoping. Items use the platform default accessibility,
//!   `kSecAttrAccessibleWhenUnlocked`.
//! - **Other platforms**: the OS credential store via the `keyring` crate
//!   (Secret Service on Linux, Credential Manager on Windows). These stores
//!   have no access groups, so the provider reports app-only capabilities and
//!   keeps a per-service index entry so a whole service can be cleared.

use std::sync::Arc;

use crate::provider::KeychainProvider;

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub use apple::AppleKeychain as NativeKeychain;

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub use os_keyring::KeyringKeychain as NativeKeychain;

/// The platform keychain for the current target.
pub fn native_provider() -> Arc<dyn KeychainProvider> {
    Arc::new(NativeKeychain::new())
}

// ---------------------------------------------------------------------------
// Apple keychain implementation
// ---------------------------------------------------------------------------

#[cfg(any(target_os = "macos", target_os = "ios"))]
mod apple {
    use keyward_core::SecretBytes;
    use security_framework::item::{ItemClass, ItemSearchOptions};
    use security_framework::passwords::{
        delete_generic_password_options, generic_password, set_generic_password_options,
        PasswordOptions,
    };
    use tracing::trace;

    use crate::error::ProviderError;
    use crate::provider::KeychainProvider;
    use crate::types::{Capabilities, ItemQuery};

    /// Security.framework-backed keychain.
    #[derive(Debug, Default)]
    pub struct AppleKeychain;

    impl AppleKeychain {
        pub fn new() -> Self {
            Self
        }
    }

    fn options(query: &ItemQuery<'_>) -> PasswordOptions {
        let mut options = PasswordOptions::new_generic_password(query.service, query.account);
        if let Some(group) = query.access_group {
            options.set_access_group(group);
        }
        options
    }

    fn status(e: security_framework::base::Error) -> ProviderError {
        ProviderError::from_code(e.code())
    }

    impl KeychainProvider for AppleKeychain {
        fn capabilities(&self) -> Capabilities {
            Capabilities::GROUP_SCOPED
        }

        fn insert(&self, query: &ItemQuery<'_>, payload: &[u8]) -> Result<(), ProviderError> {
            trace!(service = query.service, scoped = query.access_group.is_some(), "SecItemAdd");
            set_generic_password_options(payload, options(query)).map_err(status)
        }

        fn lookup(&self, query: &ItemQuery<'_>) -> Result<SecretBytes, ProviderError> {
            trace!(service = query.service, scoped = query.access_group.is_some(), "SecItemCopyMatching");
            generic_password(options(query))
                .map(SecretBytes::new)
                .map_err(status)
        }

        fn delete(&self, query: &ItemQuery<'_>) -> Result<(), ProviderError> {
            trace!(service = query.service, scoped = query.access_group.is_some(), "SecItemDelete");
            delete_generic_password_options(options(query)).map_err(status)
        }

        fn delete_service(&self, service: &str) -> Result<(), ProviderError> {
            trace!(service, "SecItemDelete (service)");
            ItemSearchOptions::new()
                .class(ItemClass::generic_password())
                .service(service)
                .delete()
                .map_err(status)
        }
    }
}

// ---------------------------------------------------------------------------
// OS keyring implementation (Linux, Windows, BSD)
// ---------------------------------------------------------------------------

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
mod os_keyring {
    use keyring::Entry;
    use keyward_core::SecretBytes;
    use parking_lot::Mutex;
    use tracing::{trace, warn};
    use zeroize::Zeroizing;

    use crate::error::ProviderError;
    use crate::provider::KeychainProvider;
    use crate::types::{Capabilities, ItemQuery};

    /// Account holding the newline-separated list of accounts in a service.
    const INDEX_ACCOUNT: &str = "__keyward_index__";

    const STATUS_PLATFORM_FAILURE: i32 = -1;
    const STATUS_NO_STORAGE_ACCESS: i32 = -2;
    const STATUS_BAD_ENCODING: i32 = -3;
    const STATUS_INVALID: i32 = -4;
    const STATUS_AMBIGUOUS: i32 = -5;

    /// Keyring-backed keychain. Payloads are stored hex-encoded.
    #[derive(Default)]
    pub struct KeyringKeychain {
        // Serializes index read-modify-write cycles within this process.
        index_lock: Mutex<()>,
    }

    impl KeyringKeychain {
        pub fn new() -> Self {
            Self::default()
        }

        fn index(&self, service: &str) -> Result<Vec<String>, ProviderError> {
            match entry(service, INDEX_ACCOUNT)?.get_password() {
                Ok(list) => Ok(list
                    .lines()
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect()),
                Err(keyring::Error::NoEntry) => Ok(Vec::new()),
                Err(e) => Err(status(e)),
            }
        }

        fn write_index(&self, service: &str, accounts: &[String]) -> Result<(), ProviderError> {
            let index = entry(service, INDEX_ACCOUNT)?;
            if accounts.is_empty() {
                return match index.delete_password() {
                    Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                    Err(e) => Err(status(e)),
                };
            }
            index.set_password(&accounts.join("\n")).map_err(status)
        }

        fn track(&self, service: &str, account: &str) -> Result<(), ProviderError> {
            let _guard = self.index_lock.lock();
            let mut accounts = self.index(service)?;
            if !accounts.iter().any(|a| a == account) {
                accounts.push(account.to_string());
                self.write_index(service, &accounts)?;
            }
            Ok(())
        }

        fn untrack(&self, service: &str, account: &str) -> Result<(), ProviderError> {
            let _guard = self.index_lock.lock();
            let mut accounts = self.index(service)?;
            let before = accounts.len();
            accounts.retain(|a| a != account);
            if accounts.len() != before {
                self.write_index(service, &accounts)?;
            }
            Ok(())
        }
    }

    fn entry(service: &str, account: &str) -> Result<Entry, ProviderError> {
        Entry::new(service, account).map_err(status)
    }

    fn status(e: keyring::Error) -> ProviderError {
        match e {
            keyring::Error::NoEntry => ProviderError::NotFound,
            keyring::Error::NoStorageAccess(_) => ProviderError::Failure(STATUS_NO_STORAGE_ACCESS),
            keyring::Error::PlatformFailure(_) => ProviderError::Failure(STATUS_PLATFORM_FAILURE),
            keyring::Error::BadEncoding(_) => ProviderError::Failure(STATUS_BAD_ENCODING),
            keyring::Error::Ambiguous(_) => ProviderError::Failure(STATUS_AMBIGUOUS),
            _ => ProviderError::Failure(STATUS_INVALID),
        }
    }

    impl KeychainProvider for KeyringKeychain {
        fn capabilities(&self) -> Capabilities {
            Capabilities::APP_ONLY
        }

        fn insert(&self, query: &ItemQuery<'_>, payload: &[u8]) -> Result<(), ProviderError> {
            if query.access_group.is_some() {
                return Err(ProviderError::MissingEntitlement);
            }
            trace!(service = query.service, "keyring insert");
            let item = entry(query.service, query.account)?;
            match item.get_password() {
                Ok(mut existing) => {
                    zeroize::Zeroize::zeroize(&mut existing);
                    return Err(ProviderError::DuplicateItem);
                }
                Err(keyring::Error::NoEntry) => {}
                Err(e) => return Err(status(e)),
            }
            let encoded = Zeroizing::new(hex::encode(payload));
            item.set_password(&encoded).map_err(status)?;
            self.track(query.service, query.account)
        }

        fn lookup(&self, query: &ItemQuery<'_>) -> Result<SecretBytes, ProviderError> {
            if query.access_group.is_some() {
                return Err(ProviderError::MissingEntitlement);
            }
            trace!(service = query.service, "keyring lookup");
            let encoded = Zeroizing::new(
                entry(query.service, query.account)?
                    .get_password()
                    .map_err(status)?,
            );
            hex::decode(encoded.trim())
                .map(SecretBytes::new)
                .map_err(|_| {
                    warn!(service = query.service, "keyring item is not valid hex");
                    ProviderError::Failure(STATUS_BAD_ENCODING)
                })
        }

        fn delete(&self, query: &ItemQuery<'_>) -> Result<(), ProviderError> {
            if query.access_group.is_some() {
                return Err(ProviderError::MissingEntitlement);
            }
            trace!(service = query.service, "keyring delete");
            entry(query.service, query.account)?
                .delete_password()
                .map_err(status)?;
            self.untrack(query.service, query.account)
        }

        fn delete_service(&self, service: &str) -> Result<(), ProviderError> {
            let _guard = self.index_lock.lock();
            let accounts = self.index(service)?;
            if accounts.is_empty() {
                return Err(ProviderError::NotFound);
            }
            trace!(service, count = accounts.len(), "keyring delete service");
            for account in &accounts {
                match entry(service, account)?.delete_password() {
                    Ok(()) | Err(keyring::Error::NoEntry) => {}
                    Err(e) => return Err(status(e)),
                }
            }
            self.write_index(service, &[])
        }
    }

}
