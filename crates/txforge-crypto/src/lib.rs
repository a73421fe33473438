//! # txforge-crypto
//!
//! Key material and signing primitives used by the chain families.
//!
//! ## Modules
//!
//! - [`keys`] - [`SecretKey`], zeroized on drop and redacted in `Debug`
//! - [`keypair`] - the [`KeyPair`] trait with secp256k1 and ed25519
//!   implementations
//!
//! Key pairs may be public-only. They verify signatures and identify
//! accounts, but signing with them fails:
//!
//! ```rust
//! use txforge_core::SignError;
//! use txforge_crypto::{Ed25519KeyPair, KeyPair};
//!
//! let full = Ed25519KeyPair::generate();
//! let watch_only = Ed25519KeyPair::from_public_bytes(full.public_key().as_bytes())
//!     .expect("valid public key");
//!
//! assert_eq!(watch_only.sign(&[0u8; 32]).unwrap_err(), SignError::MissingPrivateKey);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod keypair;
pub mod keys;

pub use keys::{SecretKey, SECRET_KEY_LEN};

pub use keypair::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, KeyMaterial, KeyPair, Secp256k1KeyPair,
    Secp256k1PublicKey, Secp256k1Signature, ED25519_ACCOUNT_TAG,
};
