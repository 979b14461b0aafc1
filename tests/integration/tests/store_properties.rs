//! Property-based tests for the secret store.

use keyward_integration_tests::{Fixture, GROUP, SERVICE};
use keyward_secrets::{Capabilities, KEY_PREFIX};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.-]{1,64}"
}

fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

proptest! {
    /// What is saved is what is loaded, with or without the entitlement.
    #[test]
    fn test_save_load_roundtrip(
        name in name_strategy(),
        payload in payload_strategy(),
        entitled in any::<bool>()
    ) {
        let fx = Fixture::new(entitled);
        prop_assert!(fx.store.save(&name, &payload));

        let loaded = fx.store.load(&name);
        prop_assert!(loaded.is_some());
        let loaded = loaded.unwrap();
        prop_assert_eq!(loaded.expose_secret(), payload.as_slice());
    }

    /// A second save fully replaces the first.
    #[test]
    fn test_overwrite_replaces(
        name in name_strategy(),
        first in payload_strategy(),
        second in payload_strategy(),
        entitled in any::<bool>()
    ) {
        let fx = Fixture::new(entitled);
        prop_assert!(fx.store.save(&name, &first));
        prop_assert!(fx.store.save(&name, &second));

        let loaded = fx.store.load(&name).unwrap();
        prop_assert_eq!(loaded.expose_secret(), second.as_slice());
        prop_assert_eq!(fx.keychain.len(), 1);
    }

    /// Delete succeeds whether or not the entry exists, and leaves nothing behind.
    #[test]
    fn test_delete_idempotent(
        name in name_strategy(),
        payload in payload_strategy(),
        saved in any::<bool>(),
        entitled in any::<bool>()
    ) {
        let fx = Fixture::new(entitled);
        if saved {
            prop_assert!(fx.store.save(&name, &payload));
        }
        prop_assert!(fx.store.delete(&name));
        prop_assert!(fx.store.delete(&name));
        prop_assert!(fx.store.load(&name).is_none());
    }

    /// Nothing survives a bulk clear.
    #[test]
    fn test_delete_all_clears_everything(
        entries in prop::collection::btree_map(name_strategy(), payload_strategy(), 0..16)
    ) {
        let fx = Fixture::app_only();
        for (name, payload) in &entries {
            prop_assert!(fx.store.save(name, payload));
        }
        prop_assert!(fx.store.delete_all());
        for name in entries.keys() {
            prop_assert!(fx.store.load(name).is_none());
        }
        prop_assert!(fx.keychain.is_empty());
    }

    /// Names outside the allowed alphabet are rejected before any keychain call.
    #[test]
    fn test_invalid_names_never_reach_keychain(
        name in "[a-z]{0,8}[ /:\u{0}é][a-z]{0,8}",
        payload in payload_strategy()
    ) {
        let fx = Fixture::new(true);
        prop_assert!(!fx.store.save(&name, &payload));
        prop_assert!(fx.store.load(&name).is_none());
        prop_assert!(!fx.store.delete(&name));
        prop_assert_eq!(fx.keychain.call_count(), 0);
    }

    /// Entries are stored under the prefixed account, group-scoped only when entitled.
    #[test]
    fn test_account_and_scope(name in name_strategy(), entitled in any::<bool>()) {
        let fx = Fixture::new(entitled);
        prop_assert!(fx.store.save(&name, b"x"));

        let account = format!("{KEY_PREFIX}{name}");
        let expected = entitled.then(|| GROUP.to_string());
        prop_assert_eq!(fx.keychain.stored_group(SERVICE, &account), Some(expected));
    }
}

#[test]
fn test_capability_off_never_scopes() {
    let fx = Fixture::app_only();
    assert_eq!(fx.store.capabilities(), Capabilities::APP_ONLY);
    assert!(fx.store.save("a", b"1"));
    assert_eq!(
        fx.keychain.stored_group(SERVICE, "identity_a"),
        Some(None)
    );
}
