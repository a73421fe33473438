//! # txforge-core
//!
//! Foundation types shared by the txforge crates.
//!
//! ## Modules
//!
//! - [`error`] - The transaction error taxonomy and result aliases
//! - [`amount`] - Signed base-unit amounts
//! - [`config`] - Chain metadata ([`ChainConfig`])
//! - [`config_loader`] - Reading and writing `~/.txforge/config.toml`
//!
//! ## Error Handling
//!
//! Every builder operation returns [`Result`], whose error is a
//! [`TransactionError`]. Callers branch on [`TransactionError::kind`]:
//!
//! ```rust
//! use txforge_core::{ErrorKind, TransactionError};
//!
//! let err = TransactionError::invalid_parameter("Value cannot be less than zero");
//! assert_eq!(err.kind(), ErrorKind::InvalidParameterValue);
//! assert_eq!(err.kind().name(), "InvalidParameterValueError");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod amount;
pub mod config;
pub mod config_loader;
pub mod error;

pub use amount::{Amount, AmountError};
pub use config::{ChainConfig, Config, FamilyKind, DEFAULT_M};
pub use error::{
    ConfigError, ConfigResult, ErrorKind, Result, SignError, SignResult, TransactionError,
};

pub use alloy_primitives::U256;
