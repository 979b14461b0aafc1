//! End-to-end scenarios across the public store surface.

use std::sync::Arc;

use keyward_core::config::{BackendKind, StoreConfigBuilder};
use keyward_core::{secure_clear, AuditEntry, AuditEvent, KeychainOperation};
use keyward_integration_tests::{Fixture, SERVICE};
use keyward_secrets::{
    Capabilities, MemoryKeychain, ProviderError, ProviderOp, SecretError, SecretStore,
    IDENTITY_KEY_NAME,
};

#[test]
fn test_identity_key_lifecycle() {
    let fx = Fixture::new(true);
    assert!(!fx.store.verify_identity_key_exists());

    let mut key = vec![0x42u8; 32];
    assert!(fx.store.save(IDENTITY_KEY_NAME, &key));
    secure_clear(&mut key);
    assert!(key.is_empty());

    assert!(fx.store.verify_identity_key_exists());
    assert!(fx.store.delete(IDENTITY_KEY_NAME));
    assert!(!fx.store.verify_identity_key_exists());
}

#[test]
fn test_entries_saved_scoped_remain_readable_after_entitlement_loss() {
    let fx = Fixture::new(true);
    assert!(fx.store.save("token", b"shared"));

    fx.keychain.set_deny_group_scope(true);
    assert_eq!(fx.store.load("token").unwrap().expose_secret(), b"shared");
    assert!(fx.store.save("token", b"private"));
    assert_eq!(fx.store.load("token").unwrap().expose_secret(), b"private");
    assert!(fx.store.delete("token"));
    assert!(fx.store.load("token").is_none());
}

#[test]
fn test_entries_saved_unscoped_are_replaced_after_entitlement_granted() {
    let fx = Fixture::new(false);
    assert!(fx.store.save(IDENTITY_KEY_NAME, b"old"));
    assert_eq!(
        fx.keychain.stored_group(SERVICE, "identity_noiseStaticKey"),
        Some(None)
    );

    fx.keychain.set_deny_group_scope(false);
    assert!(fx.store.save(IDENTITY_KEY_NAME, b"new"));
    assert_eq!(fx.store.load(IDENTITY_KEY_NAME).unwrap().expose_secret(), b"new");
    assert_eq!(fx.keychain.len(), 1);

    assert!(fx.store.delete(IDENTITY_KEY_NAME));
    assert_eq!(
        fx.keychain.stored_group(SERVICE, "identity_noiseStaticKey"),
        None
    );
    assert!(!fx.store.verify_identity_key_exists());
}

#[test]
fn test_service_isolation_on_shared_keychain() {
    let keychain = Arc::new(MemoryKeychain::new());
    let mine = Fixture::over(keychain.clone(), SERVICE, Capabilities::GROUP_SCOPED);
    let theirs = Fixture::over(keychain.clone(), "chat.other", Capabilities::GROUP_SCOPED);

    assert!(mine.store.save("k", b"mine"));
    assert!(theirs.store.save("k", b"theirs"));

    assert!(mine.store.delete_all());
    assert!(mine.store.load("k").is_none());
    assert_eq!(theirs.store.load("k").unwrap().expose_secret(), b"theirs");
}

#[test]
fn test_audit_trail() {
    let fx = Fixture::new(true);
    fx.store.save("a", b"payload-bytes");
    fx.store.delete("a");
    fx.keychain
        .fail_operation(ProviderOp::Delete, ProviderError::Failure(-25293));
    fx.store.delete("a");

    assert_eq!(
        fx.audit.events(),
        vec![
            AuditEvent::operation(KeychainOperation::Save, "a", true),
            AuditEvent::operation(KeychainOperation::Delete, "a", true),
            AuditEvent::error(-25293, "delete"),
            AuditEvent::operation(KeychainOperation::Delete, "a", false),
        ]
    );
}

#[test]
fn test_try_surface_classifies_errors() {
    let fx = Fixture::new(true);
    assert!(matches!(
        fx.store.try_load("no spaces"),
        Err(SecretError::InvalidName(_))
    ));
    assert!(fx.store.try_load("absent").unwrap().is_none());
    fx.store.try_delete("absent").unwrap();

    fx.keychain
        .fail_operation(ProviderOp::Lookup, ProviderError::Failure(-25308));
    let err = fx.store.try_load("absent").unwrap_err();
    assert_eq!(err.status_code(), Some(-25308));
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_file_audit_from_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let audit_path = tmp.path().join("audit").join("keychain.jsonl");
    let config = StoreConfigBuilder::new()
        .service_id("chat.keyward.file-audit")
        .backend(BackendKind::Memory)
        .audit_file(&audit_path)
        .build();

    let store = SecretStore::from_config(&config).unwrap();
    assert!(store.save(IDENTITY_KEY_NAME, b"never-in-the-log"));
    assert!(store.delete(IDENTITY_KEY_NAME));

    let content = std::fs::read_to_string(&audit_path).unwrap();
    assert!(!content.contains("never-in-the-log"));
    let entries: Vec<AuditEntry> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].event.key_name(), Some(IDENTITY_KEY_NAME));
}

#[test]
fn test_concurrent_callers() {
    let fx = Fixture::new(false);
    std::thread::scope(|s| {
        for t in 0..4u8 {
            let store = &fx.store;
            s.spawn(move || {
                for i in 0..25u8 {
                    let name = format!("t{t}-k{i}");
                    assert!(store.save(&name, &[t, i]));
                    assert_eq!(store.load(&name).unwrap().expose_secret(), &[t, i]);
                }
            });
        }
    });
    assert_eq!(fx.keychain.len(), 100);
    assert!(fx.store.delete_all());
    assert!(fx.keychain.is_empty());
}
