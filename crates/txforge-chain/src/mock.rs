//! Minimal chain families for exercising the builder state machine.
//!
//! [`MockFamily`] implements every extension point over a toy
//! `source:fee` text encoding. [`BareFamily`] implements none of them, so
//! every delegated operation fails with `NotImplemented`.
//!
//! Available under `cfg(test)` and with the `mock` feature.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use txforge_core::config::ChainConfig;
use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;
use txforge_crypto::{KeyPair, Secp256k1KeyPair};

use crate::family::{ChainFamily, CommonFields, ExternalSignature, KeyPairOf};
use crate::transaction::{RawTransaction, TransactionData};

/// Canonical view of a [`MockTransaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockFields {
    /// Source name.
    pub source: String,
    /// Fee as a decimal string.
    pub fee: String,
    /// Compressed public keys (hex) that signed.
    #[serde(default)]
    pub signers: Vec<String>,
}

/// A toy transaction serialized as `source:fee`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTransaction {
    source: String,
    fee: u64,
    signers: Vec<String>,
}

impl MockTransaction {
    /// Create an unsigned transaction.
    #[must_use]
    pub fn new(source: impl Into<String>, fee: u64) -> Self {
        Self {
            source: source.into(),
            fee,
            signers: Vec::new(),
        }
    }

    /// The source name.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The fee.
    #[must_use]
    pub const fn fee(&self) -> u64 {
        self.fee
    }

    /// Public keys that signed, in signing order.
    #[must_use]
    pub fn signers(&self) -> &[String] {
        &self.signers
    }

    fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.to_serialized().as_bytes()).into()
    }
}

impl TransactionData for MockTransaction {
    type Fields = MockFields;
    type KeyPair = Secp256k1KeyPair;

    fn from_native_fields(fields: &MockFields) -> Result<Self> {
        let fee = fields
            .fee
            .parse::<Amount>()
            .ok()
            .and_then(|fee| fee.to_u64())
            .ok_or_else(|| TransactionError::parse(format!("invalid fee: {}", fields.fee)))?;
        Ok(Self {
            source: fields.source.clone(),
            fee,
            signers: fields.signers.clone(),
        })
    }

    fn from_serialized(serialized: &str) -> Result<Self> {
        let (source, fee) = serialized
            .split_once(':')
            .ok_or_else(|| TransactionError::parse("expected source:fee"))?;
        let fee = fee
            .parse()
            .map_err(|e| TransactionError::parse(format!("invalid fee {fee}: {e}")))?;
        Ok(Self::new(source, fee))
    }

    fn sign(&mut self, key_pair: &Secp256k1KeyPair) -> Result<()> {
        key_pair.sign(&self.digest())?;
        self.signers
            .push(hex::encode(key_pair.public_key().compressed()));
        Ok(())
    }

    fn to_canonical_fields(&self) -> MockFields {
        MockFields {
            source: self.source.clone(),
            fee: self.fee.to_string(),
            signers: self.signers.clone(),
        }
    }

    fn to_serialized(&self) -> String {
        format!("{}:{}", self.source, self.fee)
    }

    fn id(&self) -> String {
        hex::encode(self.digest())
    }
}

/// A family implementing every extension point over [`MockTransaction`].
///
/// With transaction validation enabled, a zero fee is rejected.
#[derive(Debug, Clone, Default)]
pub struct MockFamily;

impl ChainFamily for MockFamily {
    type Transaction = MockTransaction;

    fn from_config(_config: &ChainConfig) -> Self {
        Self
    }

    fn validate_address(&self, address: &str) -> Result<()> {
        if address.is_empty() || address.contains(':') {
            return Err(TransactionError::build(format!("Invalid address: {address:?}")));
        }
        Ok(())
    }

    fn validate_fee(&self, fee: &Amount) -> Result<()> {
        if fee.to_u64().is_none() {
            return Err(TransactionError::build(format!("fee out of range: {fee}")));
        }
        Ok(())
    }

    fn validate_raw_transaction(&self, raw: &RawTransaction) -> Result<()> {
        if raw.is_empty() {
            return Err(TransactionError::parse("empty raw transaction"));
        }
        Ok(())
    }

    fn validate_mandatory_fields(&self, common: &CommonFields) -> Result<()> {
        if common.source.is_none() {
            return Err(TransactionError::build("Missing source"));
        }
        if common.fee.is_none() {
            return Err(TransactionError::build("Missing fee"));
        }
        Ok(())
    }

    fn add_signature(&self, signature: &str, public_key: &str) -> Result<ExternalSignature> {
        if signature.is_empty() || public_key.is_empty() {
            return Err(TransactionError::build("Invalid signature"));
        }
        Ok(ExternalSignature {
            signature: signature.to_string(),
            public_key: public_key.to_string(),
        })
    }

    fn build_implementation(&self, common: &CommonFields) -> Result<MockTransaction> {
        let source = common
            .source
            .clone()
            .ok_or_else(|| TransactionError::build("Missing source"))?;
        let fee = common
            .fee
            .and_then(|fee| fee.to_u64())
            .ok_or_else(|| TransactionError::build("fee out of range"))?;
        Ok(MockTransaction::new(source, fee))
    }

    fn from_implementation(&self, raw: &RawTransaction) -> Result<MockTransaction> {
        let text = match raw {
            RawTransaction::Text(text) => text.trim().to_string(),
            RawTransaction::Bytes(bytes) => String::from_utf8(bytes.clone())
                .map_err(|e| TransactionError::parse(format!("raw transaction is not utf-8: {e}")))?,
        };
        MockTransaction::from_serialized(&text)
    }

    fn init_builder(&mut self, transaction: &MockTransaction, common: &mut CommonFields) -> Result<()> {
        common.source = Some(transaction.source.clone());
        common.fee = Some(Amount::from(transaction.fee));
        Ok(())
    }

    fn sign_implementation(
        &self,
        transaction: &mut MockTransaction,
        key_pair: &KeyPairOf<Self>,
        _common: &CommonFields,
    ) -> Result<()> {
        transaction.sign(key_pair)
    }

    fn validate_transaction_shape(&self, transaction: &MockTransaction) -> Result<()> {
        if transaction.fee == 0 {
            return Err(TransactionError::invalid_transaction("fee must be positive"));
        }
        Ok(())
    }
}

/// A family that overrides nothing but construction.
#[derive(Debug, Clone, Default)]
pub struct BareFamily;

impl ChainFamily for BareFamily {
    type Transaction = MockTransaction;

    fn from_config(_config: &ChainConfig) -> Self {
        Self
    }
}
