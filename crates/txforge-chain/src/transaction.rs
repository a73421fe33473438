//! The per-chain transaction adapter trait and raw input type.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use txforge_core::error::{Result, TransactionError};
use txforge_crypto::KeyPair;

/// A chain-native transaction that converts between its structured
/// canonical view and its wire encoding.
///
/// Implementations uphold the round-trip law: for every value `t`,
/// `Self::from_serialized(&t.to_serialized())` encodes back to the same
/// string.
pub trait TransactionData: Sized + Clone + fmt::Debug + Send + Sync {
    /// The canonical structured view (serialized as JSON by
    /// [`to_json`](Self::to_json)).
    type Fields: Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq;

    /// The key pair type that signs this transaction.
    type KeyPair: KeyPair;

    /// Build from structured fields. Numeric fields may be decimal or
    /// `0x` hex strings.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::ParseTransaction`] for malformed fields.
    fn from_native_fields(fields: &Self::Fields) -> Result<Self>;

    /// Parse the wire encoding produced by
    /// [`to_serialized`](Self::to_serialized).
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::ParseTransaction`] for malformed input.
    fn from_serialized(serialized: &str) -> Result<Self>;

    /// Sign in place.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Signing`] if the key pair has no private
    /// key or the signing routine fails.
    fn sign(&mut self, key_pair: &Self::KeyPair) -> Result<()>;

    /// The canonical structured view. Signer identities appear only for
    /// signatures that verify.
    fn to_canonical_fields(&self) -> Self::Fields;

    /// The exact wire encoding.
    fn to_serialized(&self) -> String;

    /// The transaction identifier derived from the current encoding.
    fn id(&self) -> String;

    /// The canonical view as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Utils`] if the fields cannot be
    /// represented as JSON.
    fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self.to_canonical_fields())
            .map_err(|e| TransactionError::utils(format!("failed to encode transaction JSON: {e}")))
    }
}

/// Raw transaction input accepted by `from()`: wire bytes or their text
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTransaction {
    /// Undecoded wire bytes.
    Bytes(Vec<u8>),
    /// Hex text, with or without a `0x` prefix.
    Text(String),
}

impl RawTransaction {
    /// The input as hex text without prefix. Bytes are hex encoded; text is
    /// trimmed and stripped of a leading `0x`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        match self {
            Self::Bytes(bytes) => hex::encode(bytes),
            Self::Text(text) => {
                let trimmed = text.trim();
                trimmed.strip_prefix("0x").unwrap_or(trimmed).to_string()
            }
        }
    }

    /// Whether the input carries no data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bytes(bytes) => bytes.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

impl From<Vec<u8>> for RawTransaction {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for RawTransaction {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for RawTransaction {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawTransaction {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<&String> for RawTransaction {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}
