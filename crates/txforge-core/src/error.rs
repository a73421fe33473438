//! Error types for txforge.
//!
//! Transaction construction failures fall into a small, fixed set of kinds.
//! Each kind carries a human-readable message and nothing else, so callers
//! can `match` on the variant (or on [`ErrorKind`]) to decide what to do:
//!
//! - [`TransactionError::BuildTransaction`] - an invalid field value
//! - [`TransactionError::ParseTransaction`] - malformed raw input to `from()`
//! - [`TransactionError::Signing`] - no usable private key, or the signer rejected the input
//! - [`TransactionError::InvalidTransaction`] - a transaction failed a status/shape check
//! - [`TransactionError::InvalidParameterValue`] - a contract/method parameter out of domain
//! - [`TransactionError::NotImplemented`] - a chain family lacks a required extension point
//! - [`TransactionError::Utils`] - an encoding helper failed
//!
//! Lower-level errors ([`SignError`], [`ConfigError`]) have their own enums.
//!
//! # Example
//!
//! ```rust
//! use txforge_core::error::{ErrorKind, TransactionError};
//!
//! fn check_fee(fee: i64) -> Result<(), TransactionError> {
//!     if fee < 0 {
//!         return Err(TransactionError::build("Value cannot be less than zero"));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_fee(-1).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::BuildTransaction);
//! assert_eq!(err.message(), "Value cannot be less than zero");
//! ```

use std::fmt;

// ============================================================================
// TransactionError
// ============================================================================

/// Top-level error returned by builders and transaction adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// A field value is invalid (negative fee, malformed key, failed
    /// address or mandatory-field validation).
    #[error("build transaction error: {message}")]
    BuildTransaction {
        /// What was wrong.
        message: String,
    },

    /// Raw transaction input could not be decoded.
    #[error("parse transaction error: {message}")]
    ParseTransaction {
        /// What was wrong.
        message: String,
    },

    /// Signing was attempted without usable key material, or the
    /// underlying signature routine rejected the input.
    #[error("signing error: {message}")]
    Signing {
        /// What was wrong.
        message: String,
    },

    /// A transaction failed a post-hoc status or shape check.
    #[error("invalid transaction: {message}")]
    InvalidTransaction {
        /// What was wrong.
        message: String,
    },

    /// A contract or method parameter is outside its accepted domain.
    #[error("invalid parameter value: {message}")]
    InvalidParameterValue {
        /// What was wrong.
        message: String,
    },

    /// The chain family does not supply this extension point.
    #[error("not implemented: {message}")]
    NotImplemented {
        /// Which operation is missing.
        message: String,
    },

    /// An encoding or conversion helper failed.
    #[error("utils error: {message}")]
    Utils {
        /// What was wrong.
        message: String,
    },
}

/// Discriminant of a [`TransactionError`], for switch-style handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`TransactionError::BuildTransaction`].
    BuildTransaction,
    /// See [`TransactionError::ParseTransaction`].
    ParseTransaction,
    /// See [`TransactionError::Signing`].
    Signing,
    /// See [`TransactionError::InvalidTransaction`].
    InvalidTransaction,
    /// See [`TransactionError::InvalidParameterValue`].
    InvalidParameterValue,
    /// See [`TransactionError::NotImplemented`].
    NotImplemented,
    /// See [`TransactionError::Utils`].
    Utils,
}

impl ErrorKind {
    /// The conventional name of this error kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BuildTransaction => "BuildTransactionError",
            Self::ParseTransaction => "ParseTransactionError",
            Self::Signing => "SigningError",
            Self::InvalidTransaction => "InvalidTransactionError",
            Self::InvalidParameterValue => "InvalidParameterValueError",
            Self::NotImplemented => "NotImplementedError",
            Self::Utils => "UtilsError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TransactionError {
    /// Create a `BuildTransaction` error.
    #[must_use]
    pub fn build(message: impl Into<String>) -> Self {
        Self::BuildTransaction {
            message: message.into(),
        }
    }

    /// Create a `ParseTransaction` error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseTransaction {
            message: message.into(),
        }
    }

    /// Create a `Signing` error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Create an `InvalidTransaction` error.
    #[must_use]
    pub fn invalid_transaction(message: impl Into<String>) -> Self {
        Self::InvalidTransaction {
            message: message.into(),
        }
    }

    /// Create an `InvalidParameterValue` error.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameterValue {
            message: message.into(),
        }
    }

    /// Create a `NotImplemented` error for the named operation.
    ///
    /// ```rust
    /// use txforge_core::error::TransactionError;
    ///
    /// let err = TransactionError::not_implemented("validateAddress");
    /// assert_eq!(err.message(), "validateAddress not implemented");
    /// ```
    #[must_use]
    pub fn not_implemented(operation: &str) -> Self {
        Self::NotImplemented {
            message: format!("{operation} not implemented"),
        }
    }

    /// Create a `Utils` error.
    #[must_use]
    pub fn utils(message: impl Into<String>) -> Self {
        Self::Utils {
            message: message.into(),
        }
    }

    /// The kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BuildTransaction { .. } => ErrorKind::BuildTransaction,
            Self::ParseTransaction { .. } => ErrorKind::ParseTransaction,
            Self::Signing { .. } => ErrorKind::Signing,
            Self::InvalidTransaction { .. } => ErrorKind::InvalidTransaction,
            Self::InvalidParameterValue { .. } => ErrorKind::InvalidParameterValue,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
            Self::Utils { .. } => ErrorKind::Utils,
        }
    }

    /// The human-readable message, without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BuildTransaction { message }
            | Self::ParseTransaction { message }
            | Self::Signing { message }
            | Self::InvalidTransaction { message }
            | Self::InvalidParameterValue { message }
            | Self::NotImplemented { message }
            | Self::Utils { message } => message,
        }
    }
}

impl From<SignError> for TransactionError {
    fn from(error: SignError) -> Self {
        Self::signing(error.to_string())
    }
}

// ============================================================================
// SignError
// ============================================================================

/// Errors raised by key pair construction and signing primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    /// The key material is invalid or corrupted.
    #[error("invalid key material")]
    InvalidKey,

    /// The key pair holds only a public key.
    #[error("key pair has no private key")]
    MissingPrivateKey,

    /// The signing operation failed.
    #[error("signature failed: {context}")]
    SignatureFailed {
        /// Context about why signing failed.
        context: String,
    },

    /// The signature bytes are malformed or do not verify.
    #[error("invalid signature: {context}")]
    InvalidSignature {
        /// Context about what was wrong.
        context: String,
    },
}

impl SignError {
    /// Create a `SignatureFailed` error with context.
    #[must_use]
    pub fn signature_failed(context: impl Into<String>) -> Self {
        Self::SignatureFailed {
            context: context.into(),
        }
    }

    /// Create an `InvalidSignature` error with context.
    #[must_use]
    pub fn invalid_signature(context: impl Into<String>) -> Self {
        Self::InvalidSignature {
            context: context.into(),
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {context}")]
    ParseFailed {
        /// Context about the parsing failure.
        context: String,
    },

    /// A configuration value is invalid.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field name with the invalid value.
        field: String,
        /// The invalid value.
        value: String,
    },

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create a `FileNotFound` error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a `ParseFailed` error.
    #[must_use]
    pub fn parse_failed(context: impl Into<String>) -> Self {
        Self::ParseFailed {
            context: context.into(),
        }
    }

    /// Create an `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// Result type aliases
// ============================================================================

/// A `Result` type alias using [`TransactionError`].
pub type Result<T> = std::result::Result<T, TransactionError>;

/// A `Result` type alias for signing primitives.
pub type SignResult<T> = std::result::Result<T, SignError>;

/// A `Result` type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Unit Tests
// ============================================================================
