//! Ethereum-specific builder setters.

use std::fmt;

use alloy_primitives::U256;
use tracing::debug;
use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;

use super::{parse_address, Ethereum};
use crate::builder::{parse_amount, TransactionBuilder};
use crate::erc20::transfer_calldata;
use crate::validators;

/// Gas limit used when none is set: a plain value transfer.
pub const DEFAULT_GAS_LIMIT: u64 = 21_000;

/// A builder for the Ethereum family.
pub type EthereumBuilder = TransactionBuilder<Ethereum>;

fn non_negative(amount: &Amount, field: &str) -> Result<U256> {
    validators::validate_value(amount)?;
    amount
        .to_u256()
        .ok_or_else(|| TransactionError::build(format!("invalid {field}: {amount}")))
}

impl TransactionBuilder<Ethereum> {
    /// Set the sender nonce.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] if already built.
    pub fn nonce(&mut self, nonce: u64) -> Result<&mut Self> {
        self.update("set nonce", |family, _| {
            family.set_nonce(nonce);
            Ok(())
        })
    }

    /// Set the gas limit. Defaults to [`DEFAULT_GAS_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for a zero limit or if
    /// already built.
    pub fn gas_limit(&mut self, gas_limit: u64) -> Result<&mut Self> {
        self.update("set gas limit", |family, _| {
            if gas_limit == 0 {
                return Err(TransactionError::build("gas limit must be positive"));
            }
            family.set_gas_limit(gas_limit);
            Ok(())
        })
    }

    /// Set the recipient.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for an invalid address
    /// or if already built.
    pub fn to(&mut self, address: &str) -> Result<&mut Self> {
        self.update("set recipient", |family, _| {
            family.set_to(parse_address(address)?);
            Ok(())
        })
    }

    /// Set the transferred value in wei.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for unparseable or
    /// negative input, or if already built.
    pub fn value<T>(&mut self, value: T) -> Result<&mut Self>
    where
        T: TryInto<Amount>,
        T::Error: fmt::Display,
    {
        let value = parse_amount(value, "value")?;
        self.update("set value", |family, _| {
            family.set_value(non_negative(&value, "value")?);
            Ok(())
        })
    }

    /// Set the call data.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] if already built.
    pub fn data(&mut self, data: impl Into<Vec<u8>>) -> Result<&mut Self> {
        let data = data.into();
        self.update("set data", |family, _| {
            family.set_data(data);
            Ok(())
        })
    }

    /// Override the EIP-155 chain id taken from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] if already built.
    pub fn chain_id(&mut self, chain_id: u64) -> Result<&mut Self> {
        self.update("set chain id", |family, _| {
            family.set_chain_id(chain_id);
            Ok(())
        })
    }

    /// Turn the transaction into an ERC-20 `transfer` call: the token
    /// contract becomes the recipient, the value becomes zero and the data
    /// carries the calldata.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidParameterValue`] for an invalid
    /// token or recipient address, [`TransactionError::BuildTransaction`]
    /// for a negative amount or if already built.
    pub fn erc20_transfer<T>(&mut self, token: &str, recipient: &str, amount: T) -> Result<&mut Self>
    where
        T: TryInto<Amount>,
        T::Error: fmt::Display,
    {
        let amount = parse_amount(amount, "token amount")?;
        debug!(token, recipient, amount = %amount, "encoding erc20 transfer");
        self.update("set erc20 transfer", |family, _| {
            let amount = non_negative(&amount, "token amount")?;
            let token = parse_address(token).map_err(|_| {
                TransactionError::invalid_parameter(format!("invalid token address: {token}"))
            })?;
            let calldata = transfer_calldata(recipient, amount)?;

            family.set_to(token);
            family.set_value(U256::ZERO);
            family.set_data(calldata);
            Ok(())
        })
    }
}
