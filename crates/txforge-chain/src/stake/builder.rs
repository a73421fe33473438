//! Stake-specific builder setters.

use std::fmt;

use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;

use super::{parse_account, Stake};
use crate::builder::{parse_amount, TransactionBuilder};
use crate::validators;

/// Time to live used when none is set: 30 minutes.
pub const DEFAULT_TTL_MS: u64 = 1_800_000;

/// A builder for the stake family.
pub type StakeBuilder = TransactionBuilder<Stake>;

impl TransactionBuilder<Stake> {
    /// Set the receiving account.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for an invalid account
    /// or if already built.
    pub fn target(&mut self, account: &str) -> Result<&mut Self> {
        self.update("set target", |family, _| {
            family.set_target(parse_account(account)?);
            Ok(())
        })
    }

    /// Set the transferred amount in motes.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for unparseable or
    /// negative input, or if already built.
    pub fn amount<T>(&mut self, amount: T) -> Result<&mut Self>
    where
        T: TryInto<Amount>,
        T::Error: fmt::Display,
    {
        let amount = parse_amount(amount, "amount")?;
        self.update("set amount", |family, _| {
            validators::validate_value(&amount)?;
            let motes = amount
                .to_u256()
                .ok_or_else(|| TransactionError::build(format!("invalid amount: {amount}")))?;
            family.set_amount(motes);
            Ok(())
        })
    }

    /// Override the network name taken from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for a blank name or if
    /// already built.
    pub fn chain_name(&mut self, chain_name: &str) -> Result<&mut Self> {
        self.update("set chain name", |family, _| {
            if chain_name.trim().is_empty() {
                return Err(TransactionError::build("chain name cannot be empty"));
            }
            family.set_chain_name(chain_name.to_string());
            Ok(())
        })
    }

    /// Set the creation time in milliseconds since the epoch. Required
    /// before `build()`.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] if already built.
    pub fn timestamp(&mut self, timestamp_ms: u64) -> Result<&mut Self> {
        self.update("set timestamp", |family, _| {
            family.set_timestamp(timestamp_ms);
            Ok(())
        })
    }

    /// Set the time to live in milliseconds. Defaults to
    /// [`DEFAULT_TTL_MS`].
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for a zero ttl or if
    /// already built.
    pub fn ttl(&mut self, ttl_ms: u64) -> Result<&mut Self> {
        self.update("set ttl", |family, _| {
            if ttl_ms == 0 {
                return Err(TransactionError::build("ttl must be positive"));
            }
            family.set_ttl(ttl_ms);
            Ok(())
        })
    }

    /// Attach a transfer id.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] if already built.
    pub fn transfer_id(&mut self, transfer_id: u64) -> Result<&mut Self> {
        self.update("set transfer id", |family, _| {
            family.set_transfer_id(transfer_id);
            Ok(())
        })
    }

    /// Require the chain's configured multisig threshold
    /// ([`DEFAULT_M`](txforge_core::DEFAULT_M) unless overridden).
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] if already built.
    pub fn multisig(&mut self) -> Result<&mut Self> {
        let threshold = self.family().default_multisig_threshold();
        self.threshold(threshold)
    }

    /// Require `threshold` approvals.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for a zero threshold
    /// or if already built.
    pub fn threshold(&mut self, threshold: u32) -> Result<&mut Self> {
        self.update("set threshold", |family, _| {
            if threshold == 0 {
                return Err(TransactionError::build("threshold must be at least 1"));
            }
            family.set_threshold(threshold);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use crate::builder::BuilderState;
    use crate::transaction::TransactionData;
    use alloy_primitives::U256;
    use txforge_core::{ChainConfig, ErrorKind, DEFAULT_M};
    use txforge_crypto::{Ed25519KeyPair, KeyPair};

    const TIMESTAMP: u64 = 1_700_000_000_000;

    fn seed_hex(seed: u8) -> String {
        hex::encode([seed; 32])
    }

    fn account(seed: u8) -> String {
        Ed25519KeyPair::from_seed([seed; 32]).public_key().account_hex()
    }

    fn builder() -> StakeBuilder {
        StakeBuilder::new(ChainConfig::stake_testnet()).unwrap()
    }

    fn ready() -> StakeBuilder {
        let mut builder = builder();
        builder
            .source(&account(1))
            .unwrap()
            .fee("100000000")
            .unwrap()
            .target(&account(2))
            .unwrap()
            .amount("2500000000")
            .unwrap()
            .timestamp(TIMESTAMP)
            .unwrap();
        builder
    }

    #[test]
    fn test_build_and_sign() {
        let mut builder = ready();
        let tx = builder.build().unwrap();
        assert_eq!(tx.chain_name, "stake-testnet");
        assert_eq!(tx.ttl, DEFAULT_TTL_MS);
        assert_eq!(tx.threshold, 1);
        assert!(!tx.to_canonical_fields().fully_signed);

        builder.sign(&seed_hex(1)).unwrap();
        let fields = builder.transaction().unwrap().to_canonical_fields();
        assert!(fields.fully_signed);
        assert_eq!(fields.approvals[0].signer, account(1));
        assert_eq!(fields.source, account(1));
        assert_eq!(fields.amount, "2500000000");
    }

    #[test]
    fn test_mandatory_fields() {
        for missing in ["source", "fee", "target", "amount", "timestamp"] {
            let mut builder = builder();
            if missing != "source" {
                builder.source(&account(1)).unwrap();
            }
            if missing != "fee" {
                builder.fee(1u64).unwrap();
            }
            if missing != "target" {
                builder.target(&account(2)).unwrap();
            }
            if missing != "amount" {
                builder.amount(1u64).unwrap();
            }
            if missing != "timestamp" {
                builder.timestamp(TIMESTAMP).unwrap();
            }
            let err = builder.build().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BuildTransaction);
            assert!(err.message().contains(missing), "{missing}: {err}");
        }
    }

    #[test]
    fn test_same_fields_build_the_same_transaction() {
        let mut direct = ready();
        let mut overwritten = ready();
        overwritten.fee(7u64).unwrap().fee("100000000").unwrap();
        assert_eq!(
            direct.build().unwrap().id(),
            overwritten.build().unwrap().id()
        );
    }

    #[test]
    fn test_invalid_accounts_rejected() {
        let mut builder = builder();
        let raw_key = hex::encode(Ed25519KeyPair::from_seed([1; 32]).public_key().as_bytes());
        for bad in ["", "0x96216849c49358b10257cb55b28ea603c874b05e", raw_key.as_str()] {
            assert_eq!(builder.source(bad).unwrap_err().kind(), ErrorKind::BuildTransaction);
            assert_eq!(builder.target(bad).unwrap_err().kind(), ErrorKind::BuildTransaction);
        }
        assert!(builder.common().source.is_none());
        assert!(builder.family().target().is_none());
    }

    #[test]
    fn test_setters_reject_invalid_values() {
        let mut builder = ready();
        assert_eq!(builder.amount(-1i64).unwrap_err().kind(), ErrorKind::BuildTransaction);
        assert_eq!(builder.ttl(0).unwrap_err().kind(), ErrorKind::BuildTransaction);
        assert_eq!(builder.threshold(0).unwrap_err().kind(), ErrorKind::BuildTransaction);
        assert_eq!(builder.chain_name(" ").unwrap_err().kind(), ErrorKind::BuildTransaction);

        assert_eq!(builder.family().amount(), Some(&U256::from(2_500_000_000u64)));
        assert_eq!(builder.family().ttl(), DEFAULT_TTL_MS);
        assert_eq!(builder.family().threshold(), 1);
        assert_eq!(builder.family().chain_name(), "stake-testnet");
    }

    #[test]
    fn test_multisig_uses_configured_threshold() {
        let mut builder = ready();
        builder.multisig().unwrap();
        assert_eq!(builder.family().threshold(), DEFAULT_M);

        let mut config = ChainConfig::stake_testnet();
        config.multisig_threshold = 2;
        let mut custom = StakeBuilder::new(config).unwrap();
        custom.multisig().unwrap();
        assert_eq!(custom.family().threshold(), 2);
    }

    #[test]
    fn test_multisig_collects_approvals() {
        let mut builder = ready();
        builder.threshold(2).unwrap().transfer_id(77).unwrap();
        builder.build().unwrap();

        builder.sign(&seed_hex(1)).unwrap();
        assert!(!builder.transaction().unwrap().is_fully_signed());
        builder.sign(&seed_hex(3)).unwrap();

        let tx = builder.transaction().unwrap();
        assert!(tx.is_fully_signed());
        assert_eq!(tx.transfer_id, Some(77));
    }

    #[test]
    fn test_detached_signatures() {
        // sign the same body out of band
        let mut reference = ready();
        let body_hash = reference.build().unwrap().body_hash();
        let cosigner = Ed25519KeyPair::from_seed([9; 32]);
        let detached = cosigner.sign(&body_hash).unwrap();

        let mut builder = ready();
        builder
            .signature(
                &hex::encode(detached.to_bytes()),
                &hex::encode(cosigner.public_key().as_bytes()),
            )
            .unwrap();
        assert_eq!(builder.common().signatures[0].public_key, account(9));

        let tx = builder.build().unwrap();
        assert!(tx.is_fully_signed());
    }

    #[test]
    fn test_signature_rejects_malformed() {
        let mut builder = ready();
        let err = builder.signature("abcd", &account(9)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BuildTransaction);
        let err = builder.signature(&"00".repeat(64), "1234").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BuildTransaction);
        assert!(builder.common().signatures.is_empty());
    }

    #[test]
    fn test_from_round_trip() {
        let mut original = ready();
        original.threshold(2).unwrap();
        original.build().unwrap();
        original.sign(&seed_hex(1)).unwrap();
        let serialized = original.transaction().unwrap().to_serialized();

        let mut parsed = builder();
        parsed.from(serialized.as_str()).unwrap();
        assert_eq!(parsed.state(), BuilderState::Parsed);
        assert_eq!(parsed.common().source.as_deref(), Some(account(1).as_str()));
        assert_eq!(parsed.common().signatures.len(), 1);
        assert_eq!(parsed.family().timestamp(), Some(TIMESTAMP));
        assert_eq!(parsed.family().threshold(), 2);

        // a second signer completes the parsed transaction
        parsed.sign(&seed_hex(4)).unwrap();
        assert!(parsed.transaction().unwrap().is_fully_signed());
    }

    #[test]
    fn test_from_rejects_prefixed_or_garbage() {
        let serialized = {
            let mut b = ready();
            b.build().unwrap().to_serialized()
        };
        let mut builder = builder();
        for bad in [format!("0x{serialized}"), String::new(), "abc".to_string()] {
            let err = builder.from(bad.as_str()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ParseTransaction);
        }
    }

    #[test]
    fn test_shape_validation() {
        let config = ChainConfig::stake_testnet().with_transaction_validation(true);
        let mut strict = StakeBuilder::new(config).unwrap();
        strict
            .source(&account(1))
            .unwrap()
            .fee(1u64)
            .unwrap()
            .target(&account(2))
            .unwrap()
            .amount(1u64)
            .unwrap()
            .timestamp(TIMESTAMP)
            .unwrap()
            .chain_name("stake-mainnet")
            .unwrap();
        let err = strict.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransaction);

        strict.chain_name("stake-testnet").unwrap();
        assert!(strict.build().is_ok());
    }
}
