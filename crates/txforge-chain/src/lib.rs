//! # txforge-chain
//!
//! Transaction builders for the txforge chain families.
//!
//! ## Core Types
//!
//! - [`TransactionBuilder`] - the generic builder: shared fields, validation
//!   order and the `Empty → FieldsSet/Parsed → Built` state machine
//! - [`ChainFamily`] - the extension points a family plugs into the builder
//! - [`TransactionData`] - a chain-native transaction with its canonical view
//!   and wire encoding
//!
//! ## Families
//!
//! - [`ethereum`] - legacy / EIP-155 transactions, RLP, secp256k1
//! - [`stake`] - ed25519 account transfers with multi-approval signing
//!
//! ```rust
//! use txforge_chain::{ChainRegistry, TransactionData};
//!
//! let registry = ChainRegistry::new();
//! let mut builder = registry.ethereum_builder("eth").unwrap();
//! builder
//!     .fee("100").unwrap()
//!     .nonce(0).unwrap()
//!     .value(0u64).unwrap();
//! builder.build().unwrap();
//! builder
//!     .sign("fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19")
//!     .unwrap();
//!
//! let json = builder.transaction().unwrap().to_json().unwrap();
//! assert_eq!(json["from"], "0x96216849c49358b10257cb55b28ea603c874b05e");
//! ```
//!
//! ## Crate Features
//!
//! - `mock` - Enable [`mock::MockFamily`] and [`mock::BareFamily`] for use
//!   in other crates' tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod erc20;
pub mod ethereum;
pub mod family;
pub mod registry;
pub mod rlp;
pub mod stake;
pub mod transaction;
pub mod validators;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use builder::{BuilderState, TransactionBuilder};
pub use family::{ChainFamily, CommonFields, ExternalSignature, KeyPairOf};
pub use registry::ChainRegistry;
pub use transaction::{RawTransaction, TransactionData};

pub use ethereum::{EthTransaction, EthTxFields, Ethereum, EthereumBuilder};
pub use stake::{Stake, StakeBuilder, StakeTransaction, StakeTxFields};

pub use erc20::Erc20Call;
