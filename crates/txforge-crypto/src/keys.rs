//! Secret key material with secure memory handling.
//!
//! [`SecretKey`] is zeroized on drop, never printed by `Debug`, and compared
//! in constant time. It deliberately does not implement `Clone`.

use rand::RngCore;
use subtle::ConstantTimeEq;
use txforge_core::error::SignError;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// The length of a secret key in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// A 32-byte secret key with automatic zeroization.
///
/// # Example
///
/// ```
/// use txforge_crypto::keys::SecretKey;
///
/// let key = SecretKey::from_hex(
///     "0xfad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19",
/// ).expect("valid hex");
/// assert_eq!(format!("{key:?}"), "SecretKey([REDACTED])");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; SECRET_KEY_LEN],
}

impl SecretKey {
    /// Wrap raw key bytes. The caller should zeroize its own copy.
    #[must_use]
    pub const fn new(bytes: [u8; SECRET_KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a random key from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Parse a hex-encoded key, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] unless the input is exactly 64 hex
    /// characters after the optional prefix.
    pub fn from_hex(input: &str) -> Result<Self, SignError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_LEN]);
        hex::decode_to_slice(digits, bytes.as_mut_slice()).map_err(|_| SignError::InvalidKey)?;
        Ok(Self::new(*bytes))
    }

    /// Lowercase hex encoding, without prefix. The returned string is
    /// zeroized when dropped.
    #[must_use]
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.bytes))
    }

    /// Expose the raw bytes for the duration of a cryptographic operation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for SecretKey {}

impl From<[u8; SECRET_KEY_LEN]> for SecretKey {
    fn from(bytes: [u8; SECRET_KEY_LEN]) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_new_keeps_bytes() {
        let bytes = [0x42u8; SECRET_KEY_LEN];
        let key = SecretKey::new(bytes);
        assert_eq!(key.as_bytes(), &bytes);
    }

    #[test]
    fn test_generate_produces_unique_keys() {
        let key1 = SecretKey::generate();
        let key2 = SecretKey::generate();
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_from_hex_with_and_without_prefix() {
        let hex = "fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19";
        let plain = SecretKey::from_hex(hex).unwrap();
        let prefixed = SecretKey::from_hex(&format!("0x{hex}")).unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.to_hex().as_str(), hex);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert_eq!(SecretKey::from_hex(""), Err(SignError::InvalidKey));
        assert_eq!(SecretKey::from_hex("0x1234"), Err(SignError::InvalidKey));
        assert_eq!(
            SecretKey::from_hex(&"zz".repeat(32)),
            Err(SignError::InvalidKey)
        );
        assert_eq!(
            SecretKey::from_hex(&"ab".repeat(33)),
            Err(SignError::InvalidKey)
        );
    }

    #[test]
    fn test_debug_does_not_expose_key_material() {
        let key = SecretKey::new([0xABu8; SECRET_KEY_LEN]);
        let debug_output = format!("{key:?}");
        assert_eq!(debug_output, "SecretKey([REDACTED])");
        assert!(!debug_output.contains("ab"));
        assert!(!debug_output.contains("171"));
    }

    #[test]
    fn test_equality() {
        let key1 = SecretKey::new([0x42u8; SECRET_KEY_LEN]);
        let key2 = SecretKey::new([0x42u8; SECRET_KEY_LEN]);
        let key3 = SecretKey::new([0x43u8; SECRET_KEY_LEN]);
        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }
}
