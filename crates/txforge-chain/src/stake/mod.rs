//! The proof-of-stake account chain family.
//!
//! Transfers between ed25519 accounts with a fee, a time to live and
//! multi-approval signing. Approvals can come from [`TransactionBuilder::sign`]
//! or be attached detached through [`TransactionBuilder::signature`].
//!
//! [`TransactionBuilder::sign`]: crate::builder::TransactionBuilder::sign
//! [`TransactionBuilder::signature`]: crate::builder::TransactionBuilder::signature

mod builder;
mod transaction;

pub use builder::{StakeBuilder, DEFAULT_TTL_MS};
pub use transaction::{Approval, ApprovalFields, StakeTransaction, StakeTxFields};

use alloy_primitives::U256;
use tracing::debug;
use txforge_core::config::{ChainConfig, FamilyKind};
use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;
use txforge_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

use crate::family::{ChainFamily, CommonFields, ExternalSignature};
use crate::transaction::{RawTransaction, TransactionData};
use crate::validators::is_valid_raw_hex;

/// Pending per-transaction fields of a stake builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stake {
    configured_chain_name: String,
    default_multisig_threshold: u32,
    chain_name: String,
    target: Option<Ed25519PublicKey>,
    amount: Option<U256>,
    timestamp: Option<u64>,
    ttl: u64,
    transfer_id: Option<u64>,
    threshold: u32,
}

impl Stake {
    /// The network name transactions will carry.
    #[must_use]
    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }

    /// The pending target.
    #[must_use]
    pub const fn target(&self) -> Option<&Ed25519PublicKey> {
        self.target.as_ref()
    }

    /// The pending amount.
    #[must_use]
    pub const fn amount(&self) -> Option<&U256> {
        self.amount.as_ref()
    }

    /// The pending timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    /// The pending time to live.
    #[must_use]
    pub const fn ttl(&self) -> u64 {
        self.ttl
    }

    /// The pending transfer id.
    #[must_use]
    pub const fn transfer_id(&self) -> Option<u64> {
        self.transfer_id
    }

    /// Approvals the transaction will require.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The multisig threshold configured for the chain.
    #[must_use]
    pub const fn default_multisig_threshold(&self) -> u32 {
        self.default_multisig_threshold
    }

    pub(crate) fn set_chain_name(&mut self, chain_name: String) {
        self.chain_name = chain_name;
    }

    pub(crate) fn set_target(&mut self, target: Ed25519PublicKey) {
        self.target = Some(target);
    }

    pub(crate) fn set_amount(&mut self, amount: U256) {
        self.amount = Some(amount);
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = Some(timestamp);
    }

    pub(crate) fn set_ttl(&mut self, ttl: u64) {
        self.ttl = ttl;
    }

    pub(crate) fn set_transfer_id(&mut self, transfer_id: u64) {
        self.transfer_id = Some(transfer_id);
    }

    pub(crate) fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold;
    }
}

/// Parse a stake account argument.
pub(crate) fn parse_account(account: &str) -> Result<Ed25519PublicKey> {
    Ed25519PublicKey::from_account_hex(account)
        .map_err(|_| TransactionError::build(format!("Invalid address: {account}")))
}

/// Accept a public key as a tagged account or as 32 raw bytes, hex.
fn parse_signer(public_key: &str) -> Result<Ed25519PublicKey> {
    let digits = public_key.strip_prefix("0x").unwrap_or(public_key);
    let parsed = if digits.len() == 64 {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| TransactionError::build(format!("Invalid public key: {public_key}")))?;
        Ed25519PublicKey::from_bytes(bytes)
    } else {
        Ed25519PublicKey::from_account_hex(digits)
    };
    parsed.map_err(|_| TransactionError::build(format!("Invalid public key: {public_key}")))
}

fn approval_from_external(external: &ExternalSignature) -> Result<Approval> {
    Ok(Approval {
        signer: parse_signer(&external.public_key)?,
        signature: Ed25519Signature::from_hex(&external.signature)
            .map_err(|e| TransactionError::build(format!("Invalid signature: {e}")))?,
    })
}

impl ChainFamily for Stake {
    type Transaction = StakeTransaction;

    const KIND: Option<FamilyKind> = Some(FamilyKind::Stake);

    fn from_config(config: &ChainConfig) -> Self {
        let chain_name = config.chain_name.clone().unwrap_or_default();
        Self {
            configured_chain_name: chain_name.clone(),
            default_multisig_threshold: config.multisig_threshold,
            chain_name,
            target: None,
            amount: None,
            timestamp: None,
            ttl: DEFAULT_TTL_MS,
            transfer_id: None,
            threshold: 1,
        }
    }

    fn validate_address(&self, address: &str) -> Result<()> {
        parse_account(address).map(|_| ())
    }

    fn validate_raw_transaction(&self, raw: &RawTransaction) -> Result<()> {
        let valid = match raw {
            RawTransaction::Bytes(bytes) => !bytes.is_empty(),
            RawTransaction::Text(text) => {
                let text = text.trim();
                !text.starts_with("0x") && is_valid_raw_hex(text)
            }
        };
        if !valid {
            return Err(TransactionError::parse("Invalid raw transaction"));
        }
        Ok(())
    }

    fn validate_mandatory_fields(&self, common: &CommonFields) -> Result<()> {
        if common.source.is_none() {
            return Err(TransactionError::build("Invalid transaction: missing source"));
        }
        if common.fee.is_none() {
            return Err(TransactionError::build("Invalid transaction: missing fee"));
        }
        if self.target.is_none() {
            return Err(TransactionError::build("Invalid transaction: missing target"));
        }
        if self.amount.is_none() {
            return Err(TransactionError::build("Invalid transaction: missing amount"));
        }
        if self.timestamp.is_none() {
            return Err(TransactionError::build("Invalid transaction: missing timestamp"));
        }
        Ok(())
    }

    fn add_signature(&self, signature: &str, public_key: &str) -> Result<ExternalSignature> {
        let approval = approval_from_external(&ExternalSignature {
            signature: signature.to_string(),
            public_key: public_key.to_string(),
        })?;
        Ok(ExternalSignature {
            signature: hex::encode(approval.signature.to_bytes()),
            public_key: approval.signer.account_hex(),
        })
    }

    fn build_implementation(&self, common: &CommonFields) -> Result<StakeTransaction> {
        let source = common
            .source
            .as_deref()
            .ok_or_else(|| TransactionError::build("Invalid transaction: missing source"))
            .and_then(parse_account)?;
        let fee = common
            .fee
            .as_ref()
            .and_then(Amount::to_u256)
            .ok_or_else(|| TransactionError::build("Invalid transaction: missing fee"))?;
        let target = self
            .target
            .ok_or_else(|| TransactionError::build("Invalid transaction: missing target"))?;
        let amount = self
            .amount
            .ok_or_else(|| TransactionError::build("Invalid transaction: missing amount"))?;
        let timestamp = self
            .timestamp
            .ok_or_else(|| TransactionError::build("Invalid transaction: missing timestamp"))?;

        let mut transaction = StakeTransaction::new(
            source,
            target,
            amount,
            fee,
            timestamp,
            self.ttl,
            self.chain_name.clone(),
        );
        transaction.transfer_id = self.transfer_id;
        transaction.threshold = self.threshold;
        for external in &common.signatures {
            transaction.add_approval(approval_from_external(external)?);
        }
        Ok(transaction)
    }

    fn from_implementation(&self, raw: &RawTransaction) -> Result<StakeTransaction> {
        StakeTransaction::from_serialized(&raw.to_hex())
    }

    fn init_builder(&mut self, transaction: &StakeTransaction, common: &mut CommonFields) -> Result<()> {
        self.chain_name.clone_from(&transaction.chain_name);
        self.target = Some(transaction.target);
        self.amount = Some(transaction.amount);
        self.timestamp = Some(transaction.timestamp);
        self.ttl = transaction.ttl;
        self.transfer_id = transaction.transfer_id;
        self.threshold = transaction.threshold;

        common.source = Some(transaction.source.account_hex());
        common.fee = Some(Amount::from(transaction.fee));
        common.signatures = transaction
            .approvals()
            .iter()
            .map(|approval| ExternalSignature {
                signature: hex::encode(approval.signature.to_bytes()),
                public_key: approval.signer.account_hex(),
            })
            .collect();
        Ok(())
    }

    fn sign_implementation(
        &self,
        transaction: &mut StakeTransaction,
        key_pair: &Ed25519KeyPair,
        _common: &CommonFields,
    ) -> Result<()> {
        transaction.sign(key_pair)?;
        debug!(
            id = %transaction.id(),
            approvals = transaction.approvals().len(),
            threshold = transaction.threshold,
            "stake transaction approved"
        );
        Ok(())
    }

    fn validate_transaction_shape(&self, transaction: &StakeTransaction) -> Result<()> {
        if transaction.chain_name != self.configured_chain_name {
            return Err(TransactionError::invalid_transaction(format!(
                "chain name {} does not match configured {}",
                transaction.chain_name, self.configured_chain_name
            )));
        }
        if transaction.ttl == 0 {
            return Err(TransactionError::invalid_transaction("ttl must be positive"));
        }
        Ok(())
    }
}
