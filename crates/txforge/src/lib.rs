//! # txforge
//!
//! Build, validate, sign and serialize transactions for several blockchain
//! families behind one builder contract.
//!
//! This crate re-exports the workspace crates and adds [`logging`]:
//!
//! - [`config`] - chain configuration and the TOML loader
//! - [`crypto`] - secp256k1 and ed25519 key pairs
//! - [`chain`] - the builder, the chain families and the registry
//!
//! ## Quick Start
//!
//! ```rust
//! use txforge::prelude::*;
//!
//! let registry = ChainRegistry::new();
//!
//! let mut builder = registry.ethereum_builder("eth")?;
//! builder.fee("100")?.nonce(0)?.value(0u64)?;
//! builder.build()?;
//! builder.sign("fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19")?;
//!
//! let signed = builder.transaction().map(TransactionData::to_serialized);
//! assert!(signed.is_some_and(|hex| hex.starts_with("0x")));
//! # Ok::<(), TransactionError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod logging;

pub use txforge_chain as chain;
pub use txforge_core::{config, config_loader, error};
pub use txforge_crypto as crypto;

pub use txforge_chain::{
    BuilderState, ChainFamily, ChainRegistry, EthTransaction, Ethereum, EthereumBuilder,
    RawTransaction, Stake, StakeBuilder, StakeTransaction, TransactionBuilder, TransactionData,
};
pub use txforge_core::{
    Amount, ChainConfig, Config, ErrorKind, FamilyKind, Result, TransactionError, U256,
};

/// The types most callers need.
pub mod prelude {
    pub use txforge_chain::{
        ChainRegistry, EthereumBuilder, RawTransaction, StakeBuilder, TransactionBuilder,
        TransactionData,
    };
    pub use txforge_core::{Amount, ChainConfig, ErrorKind, TransactionError};
}
