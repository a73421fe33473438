//! The [`ChainFamily`] trait: the extension points a chain family plugs
//! into [`TransactionBuilder`](crate::builder::TransactionBuilder).
//!
//! Every extension point that a family must supply defaults to
//! [`TransactionError::NotImplemented`], so a family that forgets one
//! fails closed instead of building something half-validated.
//!
//! # Implementing a family
//!
//! ```
//! use txforge_chain::family::ChainFamily;
//! use txforge_chain::ethereum::EthTransaction;
//! use txforge_core::{ChainConfig, Result, TransactionError};
//!
//! #[derive(Debug, Clone)]
//! struct Minimal;
//!
//! impl ChainFamily for Minimal {
//!     type Transaction = EthTransaction;
//!
//!     fn from_config(_config: &ChainConfig) -> Self {
//!         Self
//!     }
//!
//!     fn validate_address(&self, address: &str) -> Result<()> {
//!         if address.is_empty() {
//!             return Err(TransactionError::build("Invalid address"));
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use std::fmt;

use txforge_core::config::{ChainConfig, FamilyKind};
use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;

use crate::transaction::{RawTransaction, TransactionData};

/// The key pair type that signs a family's transactions.
pub type KeyPairOf<C> = <<C as ChainFamily>::Transaction as TransactionData>::KeyPair;

/// An externally produced signature supplied through
/// [`TransactionBuilder::signature`](crate::builder::TransactionBuilder::signature).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSignature {
    /// Hex-encoded signature.
    pub signature: String,
    /// Hex-encoded public key (or account) that produced it.
    pub public_key: String,
}

/// Builder fields shared by every family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonFields {
    /// The source (sender) address.
    pub source: Option<String>,
    /// The fee, already checked to be non-negative.
    pub fee: Option<Amount>,
    /// External signatures, at most one per public key.
    pub signatures: Vec<ExternalSignature>,
}

/// A chain family: its transaction type plus the builder extension points.
///
/// The implementing value holds the family's pending per-transaction
/// fields (nonce, recipient, ...) and whatever it needs from the
/// [`ChainConfig`]. Builders clone it before a mutation and only commit
/// the clone on success.
pub trait ChainFamily: Clone + fmt::Debug + Send + Sync {
    /// The chain-native transaction type.
    type Transaction: TransactionData;

    /// The configuration family this family accepts, or `None` for any.
    const KIND: Option<FamilyKind> = None;

    /// Initial state for a builder targeting `config`.
    fn from_config(config: &ChainConfig) -> Self;

    /// Check a source address.
    ///
    /// # Errors
    ///
    /// [`TransactionError::BuildTransaction`] for an invalid address;
    /// [`TransactionError::NotImplemented`] by default.
    fn validate_address(&self, _address: &str) -> Result<()> {
        Err(TransactionError::not_implemented("validate_address"))
    }

    /// Check a non-negative fee against the family's native range. Any
    /// fee is accepted by default.
    ///
    /// # Errors
    ///
    /// [`TransactionError::BuildTransaction`] for a fee the family cannot
    /// carry.
    fn validate_fee(&self, _fee: &Amount) -> Result<()> {
        Ok(())
    }

    /// Check raw input before parsing.
    ///
    /// # Errors
    ///
    /// [`TransactionError::ParseTransaction`] for malformed input;
    /// [`TransactionError::NotImplemented`] by default.
    fn validate_raw_transaction(&self, _raw: &RawTransaction) -> Result<()> {
        Err(TransactionError::not_implemented("validate_raw_transaction"))
    }

    /// Check that every field the family needs has been set.
    ///
    /// # Errors
    ///
    /// [`TransactionError::BuildTransaction`] naming the missing field;
    /// [`TransactionError::NotImplemented`] by default.
    fn validate_mandatory_fields(&self, _common: &CommonFields) -> Result<()> {
        Err(TransactionError::not_implemented("validate_mandatory_fields"))
    }

    /// Check and normalize an external signature.
    ///
    /// # Errors
    ///
    /// [`TransactionError::NotImplemented`] by default: external
    /// signatures are opt-in.
    fn add_signature(&self, _signature: &str, _public_key: &str) -> Result<ExternalSignature> {
        Err(TransactionError::not_implemented("signature"))
    }

    /// Produce the transaction from the pending fields.
    ///
    /// # Errors
    ///
    /// [`TransactionError::NotImplemented`] by default.
    fn build_implementation(&self, _common: &CommonFields) -> Result<Self::Transaction> {
        Err(TransactionError::not_implemented("build_implementation"))
    }

    /// Parse raw input into a transaction.
    ///
    /// # Errors
    ///
    /// [`TransactionError::NotImplemented`] by default.
    fn from_implementation(&self, _raw: &RawTransaction) -> Result<Self::Transaction> {
        Err(TransactionError::not_implemented("from_implementation"))
    }

    /// Repopulate the pending fields from a parsed transaction.
    ///
    /// # Errors
    ///
    /// [`TransactionError::NotImplemented`] by default.
    fn init_builder(
        &mut self,
        _transaction: &Self::Transaction,
        _common: &mut CommonFields,
    ) -> Result<()> {
        Err(TransactionError::not_implemented("init_builder"))
    }

    /// Sign the held transaction.
    ///
    /// # Errors
    ///
    /// [`TransactionError::NotImplemented`] by default.
    fn sign_implementation(
        &self,
        _transaction: &mut Self::Transaction,
        _key_pair: &KeyPairOf<Self>,
        _common: &CommonFields,
    ) -> Result<()> {
        Err(TransactionError::not_implemented("sign_implementation"))
    }

    /// Check a built or parsed transaction against the chain. Only called
    /// when [`ChainConfig::validate_transaction`] is set.
    ///
    /// # Errors
    ///
    /// [`TransactionError::InvalidTransaction`] if the transaction does not
    /// belong on this chain.
    fn validate_transaction_shape(&self, _transaction: &Self::Transaction) -> Result<()> {
        Ok(())
    }
}
