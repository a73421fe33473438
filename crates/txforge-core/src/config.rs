//! Chain configuration.
//!
//! A [`ChainConfig`] is the read-only metadata a builder needs about the
//! network it targets: which family it belongs to, its network identifier,
//! decimal precision and a few family-specific constants. Builders never
//! mutate it.
//!
//! Configuration files are TOML, one `[[chains]]` table per network:
//!
//! ```toml
//! [[chains]]
//! name = "eth"
//! full_name = "Ethereum"
//! family = "ethereum"
//! chain_id = 1
//! decimals = 18
//!
//! [[chains]]
//! name = "stake"
//! full_name = "Stake Mainnet"
//! family = "stake"
//! chain_name = "stake-mainnet"
//! decimals = 9
//! multisig_threshold = 3
//! ```
//!
//! # Examples
//!
//! ```
//! use txforge_core::config::{ChainConfig, Config, FamilyKind};
//!
//! let config = Config::default();
//! let eth = config.chain("eth").expect("built-in chain");
//! assert_eq!(eth.family, FamilyKind::Ethereum);
//! assert_eq!(eth.chain_id, Some(1));
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of approvals required by multi-signature accounts.
pub const DEFAULT_M: u32 = 3;

/// Largest decimal precision accepted in a chain definition.
const MAX_DECIMALS: u8 = 36;

/// The transaction family a chain belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyKind {
    /// EVM-style account chains (RLP, secp256k1, Keccak-256).
    Ethereum,
    /// Proof-of-stake account chains (ed25519 accounts, approvals).
    Stake,
}

impl FamilyKind {
    /// Lowercase identifier, as used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Stake => "stake",
        }
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn default_multisig_threshold() -> u32 {
    DEFAULT_M
}

/// Metadata for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Short identifier (`eth`, `teth`, `stake`, ...).
    pub name: String,

    /// Human-readable name.
    #[serde(default)]
    pub full_name: String,

    /// Transaction family.
    pub family: FamilyKind,

    /// Numeric network identifier (EVM chain id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,

    /// Textual network identifier (stake chain name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_name: Option<String>,

    /// Decimal places between the display unit and the base unit.
    pub decimals: u8,

    /// Approvals required for multi-signature accounts.
    #[serde(default = "default_multisig_threshold")]
    pub multisig_threshold: u32,

    /// Whether builders check the built transaction's shape in addition to
    /// the mandatory fields.
    #[serde(default)]
    pub validate_transaction: bool,

    /// Whether this is a test network.
    #[serde(default)]
    pub testnet: bool,
}

impl ChainConfig {
    /// Ethereum mainnet (chain id 1).
    #[must_use]
    pub fn ethereum_mainnet() -> Self {
        Self {
            name: "eth".to_string(),
            full_name: "Ethereum".to_string(),
            family: FamilyKind::Ethereum,
            chain_id: Some(1),
            chain_name: None,
            decimals: 18,
            multisig_threshold: DEFAULT_M,
            validate_transaction: false,
            testnet: false,
        }
    }

    /// Ethereum Sepolia testnet.
    #[must_use]
    pub fn ethereum_testnet() -> Self {
        Self {
            name: "teth".to_string(),
            full_name: "Ethereum Sepolia".to_string(),
            chain_id: Some(11_155_111),
            testnet: true,
            ..Self::ethereum_mainnet()
        }
    }

    /// Proof-of-stake account chain mainnet.
    #[must_use]
    pub fn stake_mainnet() -> Self {
        Self {
            name: "stake".to_string(),
            full_name: "Stake Mainnet".to_string(),
            family: FamilyKind::Stake,
            chain_id: None,
            chain_name: Some("stake-mainnet".to_string()),
            decimals: 9,
            multisig_threshold: DEFAULT_M,
            validate_transaction: false,
            testnet: false,
        }
    }

    /// Proof-of-stake account chain testnet.
    #[must_use]
    pub fn stake_testnet() -> Self {
        Self {
            name: "tstake".to_string(),
            full_name: "Stake Testnet".to_string(),
            chain_name: Some("stake-testnet".to_string()),
            testnet: true,
            ..Self::stake_mainnet()
        }
    }

    /// Return a copy with transaction shape validation switched on or off.
    #[must_use]
    pub fn with_transaction_validation(mut self, enabled: bool) -> Self {
        self.validate_transaction = enabled;
        self
    }

    /// Validate this definition.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the name is empty, the
    /// family's network identifier is missing, the decimals are out of
    /// range or the multisig threshold is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid_value("name", "(empty)"));
        }

        match self.family {
            FamilyKind::Ethereum if self.chain_id.is_none() => {
                return Err(ConfigError::invalid_value(
                    format!("{}.chain_id", self.name),
                    "(missing)",
                ));
            }
            FamilyKind::Stake
                if self
                    .chain_name
                    .as_deref()
                    .map_or(true, |n| n.trim().is_empty()) =>
            {
                return Err(ConfigError::invalid_value(
                    format!("{}.chain_name", self.name),
                    "(missing)",
                ));
            }
            _ => {}
        }

        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::invalid_value(
                format!("{}.decimals", self.name),
                self.decimals.to_string(),
            ));
        }

        if self.multisig_threshold == 0 {
            return Err(ConfigError::invalid_value(
                format!("{}.multisig_threshold", self.name),
                "0",
            ));
        }

        Ok(())
    }
}

fn default_chains() -> Vec<ChainConfig> {
    vec![
        ChainConfig::ethereum_mainnet(),
        ChainConfig::ethereum_testnet(),
        ChainConfig::stake_mainnet(),
        ChainConfig::stake_testnet(),
    ]
}

/// Top-level configuration: the set of known networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Known chain definitions.
    #[serde(default = "default_chains")]
    pub chains: Vec<ChainConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chains: default_chains(),
        }
    }
}

impl Config {
    /// A configuration with no chains.
    #[must_use]
    pub const fn empty() -> Self {
        Self { chains: Vec::new() }
    }

    /// Add or replace a chain definition (matched by name).
    #[must_use]
    pub fn with_chain(mut self, chain: ChainConfig) -> Self {
        self.chains.retain(|c| c.name != chain.name);
        self.chains.push(chain);
        self
    }

    /// Look up a chain definition by name.
    #[must_use]
    pub fn chain(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.name == name)
    }

    /// Validate every chain and reject duplicate names.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for chain in &self.chains {
            chain.validate()?;
            if !seen.insert(chain.name.as_str()) {
                return Err(ConfigError::invalid_value("chains.name", &chain.name));
            }
        }
        Ok(())
    }

    /// Render the default configuration as TOML.
    #[must_use]
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}
