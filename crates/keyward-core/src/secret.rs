//! Secure buffer handling with memory protection.
//!
//! [`SecretBytes`] and [`SecretString`] hold key material and credentials and
//! are zeroed on drop. [`SecureClear`] erases caller-owned buffers in place:
//! every byte of the backing allocation is overwritten through volatile writes
//! (via `zeroize`), after which the logical value is empty.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A byte buffer that is zeroed on drop.
///
/// Used for opaque key material loaded from the keychain. `Debug` never
/// prints the contents.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes {
    inner: Vec<u8>,
}

impl SecretBytes {
    /// Wrap raw bytes.
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Expose the secret bytes.
    ///
    /// Use sparingly - only when the actual value is needed.
    pub fn expose_secret(&self) -> &[u8] {
        &self.inner
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get the length of the buffer.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes([REDACTED; {}])", self.inner.len())
    }
}

impl PartialEq for SecretBytes {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.inner, &other.inner)
    }
}

impl Eq for SecretBytes {}

impl From<Vec<u8>> for SecretBytes {
    fn from(v: Vec<u8>) -> Self {
        Self::new(v)
    }
}

impl From<&[u8]> for SecretBytes {
    fn from(v: &[u8]) -> Self {
        Self::new(v.to_vec())
    }
}

/// A string that is zeroed on drop for secure credential handling.
///
/// This type ensures that sensitive data like passphrases and tokens
/// are cleared from memory when no longer needed.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    /// Create a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Expose the secret value.
    ///
    /// Use sparingly - only when the actual value is needed.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Check if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get the length of the secret.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

// Never print secrets
impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(self.inner.as_bytes(), other.inner.as_bytes())
    }
}

impl Eq for SecretString {}

/// In-place secure erasure of a sensitive buffer.
///
/// Implementations overwrite the full backing storage with zeros using writes
/// the optimizer cannot remove, then leave the value logically empty.
pub trait SecureClear {
    /// Zero the buffer and reset it to empty.
    fn secure_clear(&mut self);
}

impl SecureClear for Vec<u8> {
    fn secure_clear(&mut self) {
        // Zeroes the whole capacity, not just `len`, then truncates.
        self.zeroize();
    }
}

impl SecureClear for String {
    fn secure_clear(&mut self) {
        // Clears the UTF-8 encoding in place; the String ends up empty.
        self.zeroize();
    }
}

/// Fixed-size storage cannot shrink, so slices are only zeroed.
impl SecureClear for [u8] {
    fn secure_clear(&mut self) {
        self.zeroize();
    }
}

impl SecureClear for SecretBytes {
    fn secure_clear(&mut self) {
        self.inner.zeroize();
    }
}

impl SecureClear for SecretString {
    fn secure_clear(&mut self) {
        self.inner.zeroize();
    }
}

impl<T: SecureClear> SecureClear for Option<T> {
    fn secure_clear(&mut self) {
        if let Some(inner) = self.as_mut() {
            inner.secure_clear();
        }
        *self = None;
    }
}

/// Securely clear a byte or text buffer in place.
pub fn secure_clear<T: SecureClear + ?Sized>(buffer: &mut T) {
    buffer.secure_clear();
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
