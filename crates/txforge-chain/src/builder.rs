//! The generic transaction builder.
//!
//! [`TransactionBuilder`] owns the fields every chain shares (source, fee,
//! external signatures), one held transaction and a small state machine.
//! It validates input in a fixed order and delegates everything
//! chain-specific to its [`ChainFamily`].
//!
//! # States
//!
//! ```text
//! Empty ──setter──▶ FieldsSet ──build()──▶ Built
//!   │                   ▲                    ▲
//!   └──from()──▶ Parsed ┘──build()/sign()────┘
//! ```
//!
//! There is no way out of `Built`: setters on a built builder fail with
//! [`TransactionError::BuildTransaction`]. A failed operation leaves every
//! previously set field as it was.
//!
//! # Example
//!
//! ```
//! use txforge_chain::ethereum::EthereumBuilder;
//! use txforge_chain::TransactionData;
//! use txforge_core::ChainConfig;
//!
//! let mut builder = EthereumBuilder::new(ChainConfig::ethereum_mainnet()).unwrap();
//! builder.fee("100").unwrap().nonce(0).unwrap().value(0u64).unwrap();
//! builder.build().unwrap();
//! builder
//!     .sign("fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19")
//!     .unwrap();
//!
//! let fields = builder.transaction().unwrap().to_canonical_fields();
//! assert_eq!(
//!     fields.from.as_deref(),
//!     Some("0x96216849c49358b10257cb55b28ea603c874b05e")
//! );
//! ```

use std::fmt;

use tracing::{debug, trace};
use txforge_core::config::ChainConfig;
use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;

use crate::family::{ChainFamily, CommonFields, KeyPairOf};
use crate::transaction::RawTransaction;
use crate::validators;

/// Where a builder is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderState {
    /// Nothing set yet.
    Empty,
    /// At least one field set since creation or parsing.
    FieldsSet,
    /// Holding a transaction decoded by `from()`, fields repopulated.
    Parsed,
    /// Holding a finalized transaction.
    Built,
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::FieldsSet => "fields-set",
            Self::Parsed => "parsed",
            Self::Built => "built",
        };
        f.write_str(name)
    }
}

/// Convert setter input into an [`Amount`], reporting failures as build
/// errors.
pub(crate) fn parse_amount<T>(value: T, field: &str) -> Result<Amount>
where
    T: TryInto<Amount>,
    T::Error: fmt::Display,
{
    value
        .try_into()
        .map_err(|e| TransactionError::build(format!("invalid {field}: {e}")))
}

/// A transaction builder for chain family `C`.
#[derive(Debug, Clone)]
pub struct TransactionBuilder<C: ChainFamily> {
    config: ChainConfig,
    common: CommonFields,
    family: C,
    transaction: Option<C::Transaction>,
    state: BuilderState,
}

impl<C: ChainFamily> TransactionBuilder<C> {
    /// Create an empty builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] if the configuration
    /// is invalid or belongs to another chain family.
    pub fn new(config: ChainConfig) -> Result<Self> {
        if let Some(kind) = C::KIND {
            if config.family != kind {
                return Err(TransactionError::build(format!(
                    "chain {} belongs to the {} family, not {kind}",
                    config.name, config.family
                )));
            }
        }
        config
            .validate()
            .map_err(|e| TransactionError::build(e.to_string()))?;

        debug!(chain = %config.name, family = %config.family, "creating transaction builder");
        let family = C::from_config(&config);
        Ok(Self {
            config,
            common: CommonFields::default(),
            family,
            transaction: None,
            state: BuilderState::Empty,
        })
    }

    /// The chain this builder targets.
    #[must_use]
    pub const fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// The current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BuilderState {
        self.state
    }

    /// The shared pending fields.
    #[must_use]
    pub const fn common(&self) -> &CommonFields {
        &self.common
    }

    /// The family's pending fields.
    #[must_use]
    pub const fn family(&self) -> &C {
        &self.family
    }

    /// The held transaction, if built or parsed.
    #[must_use]
    pub const fn transaction(&self) -> Option<&C::Transaction> {
        self.transaction.as_ref()
    }

    /// Consume the builder, returning the held transaction.
    #[must_use]
    pub fn into_transaction(self) -> Option<C::Transaction> {
        self.transaction
    }

    fn ensure_mutable(&self, operation: &str) -> Result<()> {
        if self.state == BuilderState::Built {
            return Err(TransactionError::build(format!(
                "cannot {operation}: transaction already built"
            )));
        }
        Ok(())
    }

    /// Apply a field mutation transactionally: the closure works on copies
    /// that are committed only if it succeeds.
    pub(crate) fn update<F>(&mut self, operation: &str, apply: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut C, &mut CommonFields) -> Result<()>,
    {
        self.ensure_mutable(operation)?;

        let mut family = self.family.clone();
        let mut common = self.common.clone();
        apply(&mut family, &mut common)?;

        self.family = family;
        self.common = common;
        self.state = BuilderState::FieldsSet;
        trace!(chain = %self.config.name, operation, "builder field updated");
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Common setters
    // ------------------------------------------------------------------------

    /// Set the fee. Accepts anything convertible to an [`Amount`]: decimal
    /// or `0x` strings and native integers. Overwrites any previous fee.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for unparseable or
    /// negative input, for a fee outside the family's native range, or if
    /// the transaction is already built.
    pub fn fee<T>(&mut self, fee: T) -> Result<&mut Self>
    where
        T: TryInto<Amount>,
        T::Error: fmt::Display,
    {
        self.ensure_mutable("set fee")?;
        let fee = parse_amount(fee, "fee")?;
        self.validate_value(&fee)?;
        debug!(chain = %self.config.name, fee = %fee, "setting fee");
        self.update("set fee", |family, common| {
            family.validate_fee(&fee)?;
            common.fee = Some(fee);
            Ok(())
        })
    }

    /// Set the source address after family-specific validation.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for an invalid
    /// address and [`TransactionError::NotImplemented`] if the family
    /// has no address validation.
    pub fn source(&mut self, address: &str) -> Result<&mut Self> {
        debug!(chain = %self.config.name, address, "setting source");
        self.update("set source", |family, common| {
            family.validate_address(address)?;
            common.source = Some(address.to_string());
            Ok(())
        })
    }

    /// Attach an externally produced signature. Supplying a second
    /// signature for the same public key replaces the first.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::NotImplemented`] for families that do
    /// not accept external signatures, and the family's validation error
    /// for malformed input.
    pub fn signature(&mut self, signature: &str, public_key: &str) -> Result<&mut Self> {
        debug!(chain = %self.config.name, public_key, "adding external signature");
        self.update("add signature", |family, common| {
            let external = family.add_signature(signature, public_key)?;
            common
                .signatures
                .retain(|existing| existing.public_key != external.public_key);
            common.signatures.push(external);
            Ok(())
        })
    }

    // ------------------------------------------------------------------------
    // Template methods
    // ------------------------------------------------------------------------

    /// Validate the pending fields and produce the transaction.
    ///
    /// On a built builder this returns the held transaction unchanged. On a
    /// freshly parsed builder it finalizes the parsed transaction.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, or the family's build error.
    pub fn build(&mut self) -> Result<&C::Transaction> {
        match self.state {
            BuilderState::Built => {
                debug!(chain = %self.config.name, "returning already built transaction");
            }
            BuilderState::Parsed => {
                self.validate_transaction(self.transaction.as_ref())?;
                debug!(chain = %self.config.name, "finalizing parsed transaction");
                self.state = BuilderState::Built;
            }
            BuilderState::Empty | BuilderState::FieldsSet => {
                self.validate_transaction(None)?;
                let transaction = self.family.build_implementation(&self.common)?;
                self.validate_transaction(Some(&transaction))?;
                debug!(chain = %self.config.name, "transaction built");
                self.transaction = Some(transaction);
                self.state = BuilderState::Built;
            }
        }

        self.transaction
            .as_ref()
            .ok_or_else(|| TransactionError::invalid_transaction("no transaction held"))
    }

    /// Load a raw transaction, replacing any pending fields with the
    /// decoded ones.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::ParseTransaction`] for malformed input,
    /// [`TransactionError::BuildTransaction`] if the builder is already
    /// built, and [`TransactionError::NotImplemented`] if the family cannot
    /// parse.
    pub fn from(&mut self, raw: impl Into<RawTransaction>) -> Result<&mut Self> {
        self.ensure_mutable("parse raw transaction")?;
        let raw = raw.into();

        self.family.validate_raw_transaction(&raw)?;
        let transaction = self.family.from_implementation(&raw)?;

        let mut family = self.family.clone();
        let mut common = CommonFields::default();
        family.init_builder(&transaction, &mut common)?;
        if self.config.validate_transaction {
            family.validate_transaction_shape(&transaction)?;
        }

        debug!(chain = %self.config.name, "raw transaction parsed");
        self.family = family;
        self.common = common;
        self.transaction = Some(transaction);
        self.state = BuilderState::Parsed;
        Ok(self)
    }

    /// Sign the held transaction with a hex-encoded private key. The
    /// builder must be built or freshly parsed; signing finalizes it.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] for unusable key
    /// material, [`TransactionError::InvalidTransaction`] if there is no
    /// transaction to sign, and the family's signing error otherwise.
    pub fn sign(&mut self, key: &str) -> Result<&mut Self> {
        let key_pair = self.validate_key(key)?;

        if !matches!(self.state, BuilderState::Built | BuilderState::Parsed) {
            return Err(TransactionError::invalid_transaction(format!(
                "transaction must be built or parsed before signing (state: {})",
                self.state
            )));
        }
        let mut transaction = self
            .transaction
            .clone()
            .ok_or_else(|| TransactionError::invalid_transaction("no transaction to sign"))?;

        self.family
            .sign_implementation(&mut transaction, &key_pair, &self.common)?;

        debug!(chain = %self.config.name, "transaction signed");
        self.transaction = Some(transaction);
        self.state = BuilderState::Built;
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Validators
    // ------------------------------------------------------------------------

    /// Construct the family's key pair from a hex private key.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] with `Invalid key`.
    pub fn validate_key(&self, key: &str) -> Result<KeyPairOf<C>> {
        validators::validate_key(key)
    }

    /// Reject negative values.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::BuildTransaction`] if `value < 0`.
    pub fn validate_value(&self, value: &Amount) -> Result<()> {
        validators::validate_value(value)
    }

    /// Check the mandatory fields and, when the chain is configured to,
    /// the shape of `transaction`.
    ///
    /// # Errors
    ///
    /// Returns the family's mandatory-field error or, with transaction
    /// validation enabled, [`TransactionError::InvalidTransaction`].
    pub fn validate_transaction(&self, transaction: Option<&C::Transaction>) -> Result<()> {
        self.family.validate_mandatory_fields(&self.common)?;
        if self.config.validate_transaction {
            if let Some(transaction) = transaction {
                self.family.validate_transaction_shape(transaction)?;
            }
        }
        Ok(())
    }
}
