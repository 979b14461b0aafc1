//! Secret store commands.
//!
//! Provides `keyward save|load|delete|purge|verify`. Payloads are handled as
//! hex on the command line and wiped from memory after use.

use anyhow::{bail, Context};
use keyward_core::{secure_clear, SecretBytes, SecretString, StoreConfig};
use keyward_secrets::SecretStore;
use tracing::debug;

/// Open the store described by `config`.
pub fn open_store(config: &StoreConfig) -> anyhow::Result<SecretStore> {
    debug!(
        service = %config.service_id,
        group = config.group_id.as_deref().unwrap_or("none"),
        backend = ?config.backend,
        "opening secret store"
    );
    SecretStore::from_config(config).context("Failed to initialize secret store")
}

/// Decode a hex payload, tolerating surrounding whitespace.
pub fn decode_payload(hex_value: &str) -> anyhow::Result<SecretBytes> {
    hex::decode(hex_value.trim())
        .map(SecretBytes::new)
        .map_err(|_| anyhow::anyhow!("Secret value is not valid hex"))
}

/// Encode prompted text as its UTF-8 bytes. The text is wiped on drop.
pub fn text_payload(text: SecretString) -> SecretBytes {
    SecretBytes::from(text.expose_secret().as_bytes())
}

/// Store a secret, prompting for hidden input when no hex value is given.
///
/// `--hex` values are decoded to raw bytes; prompted text is stored as UTF-8.
pub fn save(store: &SecretStore, name: &str, hex_value: Option<String>) -> anyhow::Result<()> {
    let payload = match hex_value {
        Some(mut value) => {
            let decoded = decode_payload(&value);
            secure_clear(&mut value);
            decoded?
        }
        None => {
            let value = rpassword::prompt_password(format!("Enter value for '{name}': "))
                .context("Failed to read secret")?;
            text_payload(SecretString::new(value))
        }
    };

    if !store.save(name, payload.expose_secret()) {
        bail!("Failed to save secret '{name}'");
    }
    println!("Secret '{name}' stored.");
    Ok(())
}

/// Print a stored secret as hex.
pub fn load(store: &SecretStore, name: &str) -> anyhow::Result<()> {
    let Some(payload) = store.load(name) else {
        bail!("Secret '{name}' not found");
    };
    let mut encoded = hex::encode(payload.expose_secret());
    println!("{encoded}");
    secure_clear(&mut encoded);
    Ok(())
}

/// Delete a secret. Deleting an absent secret succeeds.
pub fn delete(store: &SecretStore, name: &str) -> anyhow::Result<()> {
    if !store.delete(name) {
        bail!("Failed to delete secret '{name}'");
    }
    println!("Secret '{name}' deleted.");
    Ok(())
}

/// Delete every secret of the store's service.
pub fn purge(store: &SecretStore, confirmed: bool) -> anyhow::Result<()> {
    if !confirmed {
        bail!(
            "Refusing to delete every secret of '{}' without --yes",
            store.service_id()
        );
    }
    if !store.delete_all() {
        bail!("Failed to delete secrets of '{}'", store.service_id());
    }
    println!("All secrets of '{}' deleted.", store.service_id());
    Ok(())
}

/// Check the identity key, failing when it is missing.
pub fn verify(store: &SecretStore) -> anyhow::Result<()> {
    if !store.verify_identity_key_exists() {
        bail!("Identity key is missing");
    }
    println!("Identity key present.");
    Ok(())
}
