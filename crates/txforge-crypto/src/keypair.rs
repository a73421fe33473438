//! Cryptographic key pair traits and implementations.
//!
//! A key pair always carries a public key and optionally a private key.
//! Public-only pairs can verify signatures and identify accounts but any
//! attempt to sign fails with [`SignError::MissingPrivateKey`].
//!
//! # Supported Curves
//!
//! - [`Secp256k1KeyPair`] - EVM-style chains (recoverable ECDSA)
//! - [`Ed25519KeyPair`] - stake account chains
//!
//! # Example
//!
//! ```rust
//! use txforge_crypto::keypair::{KeyPair, Secp256k1KeyPair};
//!
//! let keypair = Secp256k1KeyPair::from_private_hex(
//!     "fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19",
//! ).expect("valid key");
//!
//! let address = keypair.public_key().ethereum_address();
//! assert_eq!(hex::encode(address), "96216849c49358b10257cb55b28ea603c874b05e");
//!
//! let hash = [0x42u8; 32];
//! let signature = keypair.sign(&hash).expect("signing failed");
//! assert!(keypair.verify(&hash, &signature));
//! ```

use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use txforge_core::error::SignError;
use zeroize::Zeroizing;

use crate::keys::SecretKey;

/// Prefix byte marking an ed25519 account on stake chains.
pub const ED25519_ACCOUNT_TAG: u8 = 0x01;

// ============================================================================
// KeyPair Trait
// ============================================================================

/// The hex-encoded halves of a key pair, as returned by [`KeyPair::keys`].
pub struct KeyMaterial {
    /// Public key, lowercase hex without prefix.
    pub public: String,
    /// Private key, lowercase hex without prefix, if the pair has one.
    pub private: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("public", &self.public)
            .field("private", &self.private.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Trait for cryptographic key pairs.
///
/// Implementations are `Send + Sync` and immutable once constructed.
pub trait KeyPair: Send + Sync + Sized {
    /// The signature type produced by this key pair.
    type Signature;

    /// The public key type.
    type PublicKey;

    /// Generate a new random key pair.
    fn generate() -> Self;

    /// Build a full key pair from a secret key.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the bytes are not a valid
    /// private key for the curve.
    fn from_secret_key(secret: &SecretKey) -> Result<Self, SignError>;

    /// Build a full key pair from a hex-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] for malformed hex or an invalid
    /// scalar.
    fn from_private_hex(private_key: &str) -> Result<Self, SignError> {
        let secret = SecretKey::from_hex(private_key)?;
        Self::from_secret_key(&secret)
    }

    /// Build a public-only key pair.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the bytes are not a valid public
    /// key encoding for the curve.
    fn from_public_bytes(bytes: &[u8]) -> Result<Self, SignError>;

    /// The public key.
    fn public_key(&self) -> &Self::PublicKey;

    /// Whether this pair can sign.
    fn has_private_key(&self) -> bool;

    /// Both halves of the pair, hex encoded.
    fn keys(&self) -> KeyMaterial;

    /// Sign a 32-byte message hash.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::MissingPrivateKey`] for public-only pairs and
    /// [`SignError::SignatureFailed`] if the signing routine fails.
    fn sign(&self, hash: &[u8; 32]) -> Result<Self::Signature, SignError>;

    /// Verify a signature over `hash` against this pair's public key.
    fn verify(&self, hash: &[u8; 32], signature: &Self::Signature) -> bool;
}

// ============================================================================
// Secp256k1 Public Key
// ============================================================================

/// secp256k1 public key in both SEC1 encodings.
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    compressed: [u8; 33],
    uncompressed: [u8; 65],
}

impl Secp256k1PublicKey {
    fn from_verifying_key(verifying: &VerifyingKey) -> Self {
        let mut uncompressed = [0u8; 65];
        uncompressed.copy_from_slice(verifying.to_encoded_point(false).as_bytes());

        let mut compressed = [0u8; 33];
        compressed.copy_from_slice(verifying.to_encoded_point(true).as_bytes());

        Self {
            compressed,
            uncompressed,
        }
    }

    /// Parse a SEC1-encoded public key (33 or 65 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the bytes are not a point on the
    /// curve.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, SignError> {
        let verifying = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| SignError::InvalidKey)?;
        Ok(Self::from_verifying_key(&verifying))
    }

    /// Compressed encoding: `0x02|0x03 || X`.
    #[must_use]
    pub const fn compressed(&self) -> &[u8; 33] {
        &self.compressed
    }

    /// Uncompressed encoding: `0x04 || X || Y`.
    #[must_use]
    pub const fn uncompressed(&self) -> &[u8; 65] {
        &self.uncompressed
    }

    /// The last 20 bytes of the Keccak-256 hash of the uncompressed key
    /// without its `0x04` prefix.
    #[must_use]
    pub fn ethereum_address(&self) -> [u8; 20] {
        let (_, point) = self.uncompressed.split_at(1);
        let hash = Keccak256::digest(point);

        let mut address = [0u8; 20];
        if let Some(tail) = hash.get(12..32) {
            address.copy_from_slice(tail);
        }
        address
    }
}

impl AsRef<[u8]> for Secp256k1PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.compressed
    }
}

impl std::fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1PublicKey({})", hex::encode(self.compressed))
    }
}

// ============================================================================
// Secp256k1 Signature
// ============================================================================

/// A recoverable secp256k1 signature: `r`, `s` and a recovery id (0 or 1).
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1Signature {
    r: [u8; 32],
    s: [u8; 32],
    recovery_id: u8,
}

impl Secp256k1Signature {
    /// Assemble a signature from its components.
    #[must_use]
    pub const fn from_parts(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Self {
        Self { r, s, recovery_id }
    }

    /// The recovery id (y-parity of the nonce point).
    #[must_use]
    pub const fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// The `r` component.
    #[must_use]
    pub const fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The `s` component.
    #[must_use]
    pub const fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// `r || s`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        let (r, s) = out.split_at_mut(32);
        r.copy_from_slice(&self.r);
        s.copy_from_slice(&self.s);
        out
    }

    /// `r || s || recovery_id`.
    #[must_use]
    pub fn to_recoverable_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        let (rs, v) = out.split_at_mut(64);
        rs.copy_from_slice(&self.to_bytes());
        if let Some(last) = v.first_mut() {
            *last = self.recovery_id;
        }
        out
    }

    fn to_k256(&self) -> Result<K256Signature, SignError> {
        K256Signature::from_slice(&self.to_bytes())
            .map_err(|_| SignError::invalid_signature("r or s out of range"))
    }

    /// Whether `s` lies in the lower half of the curve order. Returns
    /// `false` for components that do not form a valid signature.
    #[must_use]
    pub fn is_low_s(&self) -> bool {
        self.to_k256().is_ok_and(|sig| sig.normalize_s().is_none())
    }

    /// Recover the public key that produced this signature over `hash`.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidSignature`] if the components are out of
    /// range, the recovery id is not 0 or 1, or no key can be recovered.
    pub fn recover_public_key(&self, hash: &[u8; 32]) -> Result<Secp256k1PublicKey, SignError> {
        let signature = self.to_k256()?;
        if self.recovery_id > 1 {
            return Err(SignError::invalid_signature(format!(
                "recovery id {} is not 0 or 1",
                self.recovery_id
            )));
        }
        let recovery_id = RecoveryId::from_byte(self.recovery_id)
            .ok_or_else(|| SignError::invalid_signature("bad recovery id"))?;

        let verifying = VerifyingKey::recover_from_prehash(hash, &signature, recovery_id)
            .map_err(|_| SignError::invalid_signature("public key recovery failed"))?;
        Ok(Secp256k1PublicKey::from_verifying_key(&verifying))
    }
}

impl std::fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Secp256k1Signature(r={}, s={}, v={})",
            hex::encode(self.r),
            hex::encode(self.s),
            self.recovery_id
        )
    }
}

// ============================================================================
// Secp256k1 Key Pair
// ============================================================================

/// secp256k1 key pair for EVM-style chains.
///
/// Signatures are normalized to low-`s` and carry the matching recovery id.
#[allow(clippy::struct_field_names)]
pub struct Secp256k1KeyPair {
    signing_key: Option<SigningKey>,
    verifying_key: VerifyingKey,
    public_key: Secp256k1PublicKey,
}

impl Secp256k1KeyPair {
    /// Build a full key pair from raw private key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] for zero or out-of-range scalars.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| SignError::InvalidKey)?;
        let verifying_key = *signing_key.verifying_key();
        let public_key = Secp256k1PublicKey::from_verifying_key(&verifying_key);

        Ok(Self {
            signing_key: Some(signing_key),
            verifying_key,
            public_key,
        })
    }
}

impl KeyPair for Secp256k1KeyPair {
    type Signature = Secp256k1Signature;
    type PublicKey = Secp256k1PublicKey;

    fn generate() -> Self {
        let secret = SecretKey::generate();
        Self::from_bytes(*secret.as_bytes())
            .unwrap_or_else(|_| unreachable!("OsRng generated an invalid secp256k1 scalar"))
    }

    fn from_secret_key(secret: &SecretKey) -> Result<Self, SignError> {
        Self::from_bytes(*secret.as_bytes())
    }

    fn from_public_bytes(bytes: &[u8]) -> Result<Self, SignError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| SignError::InvalidKey)?;
        let public_key = Secp256k1PublicKey::from_verifying_key(&verifying_key);

        Ok(Self {
            signing_key: None,
            verifying_key,
            public_key,
        })
    }

    fn public_key(&self) -> &Self::PublicKey {
        &self.public_key
    }

    fn has_private_key(&self) -> bool {
        self.signing_key.is_some()
    }

    fn keys(&self) -> KeyMaterial {
        KeyMaterial {
            public: hex::encode(self.public_key.compressed()),
            private: self
                .signing_key
                .as_ref()
                .map(|key| Zeroizing::new(hex::encode(key.to_bytes()))),
        }
    }

    fn sign(&self, hash: &[u8; 32]) -> Result<Self::Signature, SignError> {
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or(SignError::MissingPrivateKey)?;

        let (signature, recovery_id): (K256Signature, RecoveryId) = signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|_| SignError::signature_failed("secp256k1 signing failed"))?;

        // flipping s flips the parity of the recovered point
        let normalized = signature.normalize_s();
        let recovery_id = if normalized.is_some() {
            recovery_id.to_byte() ^ 1
        } else {
            recovery_id.to_byte()
        };

        let (r, s) = normalized.unwrap_or(signature).split_bytes();
        Ok(Secp256k1Signature {
            r: r.into(),
            s: s.into(),
            recovery_id,
        })
    }

    fn verify(&self, hash: &[u8; 32], signature: &Self::Signature) -> bool {
        use k256::ecdsa::signature::hazmat::PrehashVerifier;

        let Ok(k256_sig) = signature.to_k256() else {
            return false;
        };
        self.verifying_key.verify_prehash(hash, &k256_sig).is_ok()
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &self.public_key)
            .field("has_private_key", &self.signing_key.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Ed25519 Public Key
// ============================================================================

/// ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey {
    bytes: [u8; 32],
}

impl Ed25519PublicKey {
    /// Parse 32 raw bytes, rejecting encodings that are not curve points.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the bytes do not decompress.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignError> {
        ed25519_dalek::VerifyingKey::from_bytes(&bytes).map_err(|_| SignError::InvalidKey)?;
        Ok(Self { bytes })
    }

    /// The raw 32 bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Stake account identifier: the `01` tag followed by the key, hex
    /// encoded (66 characters).
    #[must_use]
    pub fn account_hex(&self) -> String {
        let mut tagged = [0u8; 33];
        let (tag, key) = tagged.split_at_mut(1);
        if let Some(first) = tag.first_mut() {
            *first = ED25519_ACCOUNT_TAG;
        }
        key.copy_from_slice(&self.bytes);
        hex::encode(tagged)
    }

    /// Parse a stake account identifier produced by
    /// [`account_hex`](Self::account_hex).
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] for a wrong tag, wrong length,
    /// malformed hex or an invalid point.
    pub fn from_account_hex(account: &str) -> Result<Self, SignError> {
        let mut tagged = [0u8; 33];
        hex::decode_to_slice(account, &mut tagged).map_err(|_| SignError::InvalidKey)?;
        let (tag, key) = tagged.split_at(1);
        if tag != [ED25519_ACCOUNT_TAG] {
            return Err(SignError::InvalidKey);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(key);
        Self::from_bytes(bytes)
    }

    /// Verify an ed25519 signature over `message`.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        use ed25519_dalek::Verifier;

        let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&signature.bytes);
        key.verify(message, &sig).is_ok()
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({})", hex::encode(self.bytes))
    }
}

// ============================================================================
// Ed25519 Signature
// ============================================================================

/// A 64-byte ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature {
    bytes: [u8; 64],
}

impl Ed25519Signature {
    /// Wrap raw signature bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self { bytes }
    }

    /// Parse a hex-encoded signature, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidSignature`] unless the input is exactly
    /// 128 hex characters after the optional prefix.
    pub fn from_hex(input: &str) -> Result<Self, SignError> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        let mut bytes = [0u8; 64];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| SignError::invalid_signature(format!("malformed ed25519 signature: {e}")))?;
        Ok(Self { bytes })
    }

    /// The raw 64 bytes.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 64] {
        self.bytes
    }
}

impl AsRef<[u8]> for Ed25519Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({})", hex::encode(self.bytes))
    }
}

// ============================================================================
// Ed25519 Key Pair
// ============================================================================

/// ed25519 key pair for stake account chains.
///
/// The signing key zeroizes itself on drop (the `zeroize` feature of
/// `ed25519-dalek`).
pub struct Ed25519KeyPair {
    signing_key: Option<ed25519_dalek::SigningKey>,
    public_key: Ed25519PublicKey,
}

impl Ed25519KeyPair {
    /// Build a full key pair from a raw 32-byte seed.
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
        let public_key = Ed25519PublicKey {
            bytes: signing_key.verifying_key().to_bytes(),
        };
        Self {
            signing_key: Some(signing_key),
            public_key,
        }
    }
}

impl KeyPair for Ed25519KeyPair {
    type Signature = Ed25519Signature;
    type PublicKey = Ed25519PublicKey;

    fn generate() -> Self {
        let secret = SecretKey::generate();
        Self::from_seed(*secret.as_bytes())
    }

    fn from_secret_key(secret: &SecretKey) -> Result<Self, SignError> {
        Ok(Self::from_seed(*secret.as_bytes()))
    }

    fn from_public_bytes(bytes: &[u8]) -> Result<Self, SignError> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| SignError::InvalidKey)?;
        Ok(Self {
            signing_key: None,
            public_key: Ed25519PublicKey::from_bytes(array)?,
        })
    }

    fn public_key(&self) -> &Self::PublicKey {
        &self.public_key
    }

    fn has_private_key(&self) -> bool {
        self.signing_key.is_some()
    }

    fn keys(&self) -> KeyMaterial {
        KeyMaterial {
            public: hex::encode(self.public_key.bytes),
            private: self
                .signing_key
                .as_ref()
                .map(|key| Zeroizing::new(hex::encode(key.to_bytes()))),
        }
    }

    fn sign(&self, hash: &[u8; 32]) -> Result<Self::Signature, SignError> {
        use ed25519_dalek::Signer;

        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or(SignError::MissingPrivateKey)?;
        Ok(Ed25519Signature {
            bytes: signing_key.sign(hash).to_bytes(),
        })
    }

    fn verify(&self, hash: &[u8; 32], signature: &Self::Signature) -> bool {
        self.public_key.verify(hash, signature)
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key)
            .field("has_private_key", &self.signing_key.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    const KNOWN_PRIVATE_KEY: &str =
        "fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19";
    const KNOWN_ADDRESS: &str = "96216849c49358b10257cb55b28ea603c874b05e";

    // ------------------------------------------------------------------------
    // Secp256k1KeyPair
    // ------------------------------------------------------------------------

    #[test]
    fn test_secp256k1_generate_produces_valid_keypair() {
        let keypair = Secp256k1KeyPair::generate();
        let prefix = keypair.public_key().compressed()[0];
        assert!(prefix == 0x02 || prefix == 0x03);
        assert_eq!(keypair.public_key().uncompressed()[0], 0x04);
        assert!(keypair.has_private_key());
    }

    #[test]
    fn test_secp256k1_known_address() {
        let keypair = Secp256k1KeyPair::from_private_hex(KNOWN_PRIVATE_KEY).unwrap();
        assert_eq!(
            hex::encode(keypair.public_key().ethereum_address()),
            KNOWN_ADDRESS
        );
    }

    #[test]
    fn test_secp256k1_rejects_zero_scalar() {
        let result = Secp256k1KeyPair::from_bytes([0u8; 32]);
        assert!(matches!(result, Err(SignError::InvalidKey)));
    }

    #[test]
    fn test_secp256k1_keys_roundtrip() {
        let keypair = Secp256k1KeyPair::from_private_hex(KNOWN_PRIVATE_KEY).unwrap();
        let keys = keypair.keys();
        assert_eq!(keys.private.as_deref().map(String::as_str), Some(KNOWN_PRIVATE_KEY));
        assert_eq!(keys.public.len(), 66);

        let public_only =
            Secp256k1KeyPair::from_public_bytes(&hex::decode(&keys.public).unwrap()).unwrap();
        assert!(!public_only.has_private_key());
        assert!(public_only.keys().private.is_none());
        assert_eq!(public_only.public_key(), keypair.public_key());
    }

    #[test]
    fn test_secp256k1_public_only_cannot_sign() {
        let full = Secp256k1KeyPair::generate();
        let public_only =
            Secp256k1KeyPair::from_public_bytes(full.public_key().uncompressed()).unwrap();
        assert_eq!(
            public_only.sign(&[1u8; 32]).unwrap_err(),
            SignError::MissingPrivateKey
        );

        // but it can verify
        let hash = [7u8; 32];
        let signature = full.sign(&hash).unwrap();
        assert!(public_only.verify(&hash, &signature));
    }

    #[test]
    fn test_secp256k1_signature_is_low_s_and_recoverable() {
        let keypair = Secp256k1KeyPair::generate();
        for byte in 0u8..16 {
            let hash = [byte; 32];
            let signature = keypair.sign(&hash).unwrap();
            assert!(signature.is_low_s());
            assert!(signature.recovery_id() <= 1);
            let recovered = signature.recover_public_key(&hash).unwrap();
            assert_eq!(&recovered, keypair.public_key());
        }
    }

    #[test]
    fn test_secp256k1_recover_rejects_bad_components() {
        let zero = Secp256k1Signature::from_parts([0u8; 32], [0u8; 32], 0);
        assert!(zero.recover_public_key(&[1u8; 32]).is_err());
        assert!(!zero.is_low_s());

        let keypair = Secp256k1KeyPair::generate();
        let hash = [3u8; 32];
        let signature = keypair.sign(&hash).unwrap();
        let bad_v = Secp256k1Signature::from_parts(*signature.r(), *signature.s(), 4);
        assert!(matches!(
            bad_v.recover_public_key(&hash),
            Err(SignError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_secp256k1_verify_rejects_other_hash() {
        let keypair = Secp256k1KeyPair::generate();
        let signature = keypair.sign(&[1u8; 32]).unwrap();
        assert!(!keypair.verify(&[2u8; 32], &signature));
    }

    #[test]
    fn test_recoverable_bytes_layout() {
        let keypair = Secp256k1KeyPair::generate();
        let signature = keypair.sign(&[0x42u8; 32]).unwrap();
        let recoverable = signature.to_recoverable_bytes();
        assert_eq!(&recoverable[..32], signature.r());
        assert_eq!(&recoverable[32..64], signature.s());
        assert_eq!(recoverable[64], signature.recovery_id());
    }

    #[test]
    fn test_secp256k1_debug_hides_private_key() {
        let keypair = Secp256k1KeyPair::from_private_hex(KNOWN_PRIVATE_KEY).unwrap();
        let debug = format!("{keypair:?}");
        assert!(!debug.contains(KNOWN_PRIVATE_KEY));
        let keys = format!("{:?}", keypair.keys());
        assert!(keys.contains("[REDACTED]"));
        assert!(!keys.contains(KNOWN_PRIVATE_KEY));
    }

    // ------------------------------------------------------------------------
    // Ed25519KeyPair
    // ------------------------------------------------------------------------

    #[test]
    fn test_ed25519_sign_and_verify() {
        let keypair = Ed25519KeyPair::generate();
        let hash = [0x11u8; 32];
        let signature = keypair.sign(&hash).unwrap();
        assert!(keypair.verify(&hash, &signature));
        assert!(!keypair.verify(&[0x12u8; 32], &signature));
    }

    #[test]
    fn test_ed25519_deterministic_from_seed() {
        let a = Ed25519KeyPair::from_seed([0x42u8; 32]);
        let b = Ed25519KeyPair::from_private_hex(&"42".repeat(32)).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.sign(&[1u8; 32]).unwrap(), b.sign(&[1u8; 32]).unwrap());
    }

    #[test]
    fn test_ed25519_public_only() {
        let full = Ed25519KeyPair::generate();
        let public_only = Ed25519KeyPair::from_public_bytes(full.public_key().as_bytes()).unwrap();
        assert!(!public_only.has_private_key());
        assert_eq!(
            public_only.sign(&[0u8; 32]).unwrap_err(),
            SignError::MissingPrivateKey
        );

        let hash = [9u8; 32];
        let signature = full.sign(&hash).unwrap();
        assert!(public_only.verify(&hash, &signature));
    }

    #[test]
    fn test_ed25519_from_public_bytes_wrong_length() {
        assert!(matches!(
            Ed25519KeyPair::from_public_bytes(&[1u8; 31]),
            Err(SignError::InvalidKey)
        ));
    }

    #[test]
    fn test_ed25519_account_hex_roundtrip() {
        let keypair = Ed25519KeyPair::from_seed([0x07u8; 32]);
        let account = keypair.public_key().account_hex();
        assert_eq!(account.len(), 66);
        assert!(account.starts_with("01"));

        let parsed = Ed25519PublicKey::from_account_hex(&account).unwrap();
        assert_eq!(&parsed, keypair.public_key());
    }

    #[test]
    fn test_ed25519_account_hex_rejects_wrong_tag() {
        let keypair = Ed25519KeyPair::from_seed([0x07u8; 32]);
        let account = keypair.public_key().account_hex();
        let retagged = format!("02{}", &account[2..]);
        assert!(Ed25519PublicKey::from_account_hex(&retagged).is_err());
        assert!(Ed25519PublicKey::from_account_hex(&account[2..]).is_err());
    }

    #[test]
    fn test_ed25519_signature_hex() {
        let keypair = Ed25519KeyPair::generate();
        let signature = keypair.sign(&[5u8; 32]).unwrap();
        let encoded = hex::encode(signature.to_bytes());
        assert_eq!(Ed25519Signature::from_hex(&encoded).unwrap(), signature);
        assert!(Ed25519Signature::from_hex("abcd").is_err());
    }
}
