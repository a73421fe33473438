//! The EVM chain family.
//!
//! Builds legacy and EIP-155 transactions signed with secp256k1. The
//! builder's source, if set, must be the address of the signing key.
//!
//! ```
//! use txforge_chain::ethereum::EthereumBuilder;
//! use txforge_chain::TransactionData;
//! use txforge_core::ChainConfig;
//!
//! let mut builder = EthereumBuilder::new(ChainConfig::ethereum_mainnet()).unwrap();
//! builder
//!     .fee("20000000000").unwrap()
//!     .nonce(3).unwrap()
//!     .to("0x1234567890123456789012345678901234567890").unwrap()
//!     .value("1000000000000000000").unwrap();
//!
//! let unsigned = builder.build().unwrap().to_serialized();
//! assert!(unsigned.starts_with("0x"));
//! ```

mod builder;
mod transaction;

pub use builder::{EthereumBuilder, DEFAULT_GAS_LIMIT};
pub use transaction::{EthTransaction, EthTxFields, LegacySignature};

use alloy_consensus::TxLegacy;
use alloy_primitives::{Address, Bytes, TxKind, U256};
use tracing::debug;
use txforge_core::config::{ChainConfig, FamilyKind};
use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;
use txforge_crypto::{KeyPair, Secp256k1KeyPair};

use crate::family::{ChainFamily, CommonFields};
use crate::rlp::is_list;
use crate::transaction::{RawTransaction, TransactionData};
use crate::validators::{is_valid_eth_address, is_valid_raw_hex};

/// Pending per-transaction fields of an Ethereum builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ethereum {
    configured_chain_id: Option<u64>,
    chain_id: Option<u64>,
    nonce: Option<u64>,
    gas_limit: Option<u64>,
    to: Option<Address>,
    value: Option<U256>,
    data: Vec<u8>,
}

impl Ethereum {
    /// The chain id transactions will carry.
    #[must_use]
    pub const fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// The pending nonce.
    #[must_use]
    pub const fn nonce(&self) -> Option<u64> {
        self.nonce
    }

    /// The pending gas limit, before the default applies.
    #[must_use]
    pub const fn gas_limit(&self) -> Option<u64> {
        self.gas_limit
    }

    /// The pending recipient.
    #[must_use]
    pub const fn to(&self) -> Option<&Address> {
        self.to.as_ref()
    }

    /// The pending value.
    #[must_use]
    pub const fn value(&self) -> Option<&U256> {
        self.value.as_ref()
    }

    /// The pending call data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn set_chain_id(&mut self, chain_id: u64) {
        self.chain_id = Some(chain_id);
    }

    pub(crate) fn set_nonce(&mut self, nonce: u64) {
        self.nonce = Some(nonce);
    }

    pub(crate) fn set_gas_limit(&mut self, gas_limit: u64) {
        self.gas_limit = Some(gas_limit);
    }

    pub(crate) fn set_to(&mut self, to: Address) {
        self.to = Some(to);
    }

    pub(crate) fn set_value(&mut self, value: U256) {
        self.value = Some(value);
    }

    pub(crate) fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
    }
}

/// Parse a builder address argument.
pub(crate) fn parse_address(address: &str) -> Result<Address> {
    if !is_valid_eth_address(address) {
        return Err(TransactionError::build(format!("Invalid address: {address}")));
    }
    address
        .parse()
        .map_err(|e| TransactionError::build(format!("Invalid address {address}: {e}")))
}

/// The gas price a fee maps to. Legacy gas prices are 128-bit.
fn gas_price_for(fee: &Amount) -> Result<u128> {
    fee.to_u128()
        .ok_or_else(|| TransactionError::build(format!("fee exceeds the maximum gas price: {fee}")))
}

fn lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

impl ChainFamily for Ethereum {
    type Transaction = EthTransaction;

    const KIND: Option<FamilyKind> = Some(FamilyKind::Ethereum);

    fn from_config(config: &ChainConfig) -> Self {
        Self {
            configured_chain_id: config.chain_id,
            chain_id: config.chain_id,
            ..Self::default()
        }
    }

    fn validate_address(&self, address: &str) -> Result<()> {
        parse_address(address).map(|_| ())
    }

    fn validate_fee(&self, fee: &Amount) -> Result<()> {
        gas_price_for(fee).map(|_| ())
    }

    fn validate_raw_transaction(&self, raw: &RawTransaction) -> Result<()> {
        let valid = match raw {
            RawTransaction::Bytes(bytes) => is_list(bytes),
            RawTransaction::Text(text) => is_valid_raw_hex(text.trim()),
        };
        if !valid {
            return Err(TransactionError::parse("Invalid raw transaction"));
        }
        Ok(())
    }

    fn validate_mandatory_fields(&self, common: &CommonFields) -> Result<()> {
        if common.fee.is_none() {
            return Err(TransactionError::build("Invalid transaction: missing fee"));
        }
        if self.nonce.is_none() {
            return Err(TransactionError::build("Invalid transaction: missing nonce"));
        }
        if self.value.is_none() {
            return Err(TransactionError::build("Invalid transaction: missing value"));
        }
        Ok(())
    }

    fn build_implementation(&self, common: &CommonFields) -> Result<EthTransaction> {
        let gas_price = common
            .fee
            .as_ref()
            .ok_or_else(|| TransactionError::build("Invalid transaction: missing fee"))
            .and_then(gas_price_for)?;
        let nonce = self
            .nonce
            .ok_or_else(|| TransactionError::build("Invalid transaction: missing nonce"))?;
        let value = self
            .value
            .ok_or_else(|| TransactionError::build("Invalid transaction: missing value"))?;

        Ok(EthTransaction::new(TxLegacy {
            chain_id: self.chain_id,
            nonce,
            gas_price,
            gas_limit: self.gas_limit.unwrap_or(DEFAULT_GAS_LIMIT),
            to: self.to.map_or(TxKind::Create, TxKind::Call),
            value,
            input: Bytes::from(self.data.clone()),
        }))
    }

    fn from_implementation(&self, raw: &RawTransaction) -> Result<EthTransaction> {
        EthTransaction::from_serialized(&raw.to_hex())
    }

    fn init_builder(&mut self, transaction: &EthTransaction, common: &mut CommonFields) -> Result<()> {
        let tx = transaction.tx();
        self.chain_id = tx.chain_id;
        self.nonce = Some(tx.nonce);
        self.gas_limit = Some(tx.gas_limit);
        self.to = transaction.to();
        self.value = Some(tx.value);
        self.data = tx.input.to_vec();

        common.fee = Some(Amount::from(tx.gas_price));
        common.source = transaction.sender().as_ref().map(lower_hex);
        Ok(())
    }

    fn sign_implementation(
        &self,
        transaction: &mut EthTransaction,
        key_pair: &Secp256k1KeyPair,
        common: &CommonFields,
    ) -> Result<()> {
        if let Some(source) = common.source.as_deref() {
            let signer = lower_hex(&Address::from(key_pair.public_key().ethereum_address()));
            if !source.eq_ignore_ascii_case(&signer) {
                return Err(TransactionError::signing(format!(
                    "signing key address {signer} does not match source {source}"
                )));
            }
        }
        transaction.sign(key_pair)?;
        debug!(id = %transaction.id(), "ethereum transaction signed");
        Ok(())
    }

    fn validate_transaction_shape(&self, transaction: &EthTransaction) -> Result<()> {
        if transaction.chain_id() != self.configured_chain_id {
            return Err(TransactionError::invalid_transaction(format!(
                "chain id {:?} does not match configured {:?}",
                transaction.chain_id(),
                self.configured_chain_id
            )));
        }
        if transaction.tx().gas_limit == 0 {
            return Err(TransactionError::invalid_transaction("gas limit must be positive"));
        }
        Ok(())
    }
}
