//! Chain registry for runtime chain lookup.
//!
//! [`ChainRegistry`] maps chain names (`eth`, `teth`, `stake`, `tstake`, or
//! whatever the configuration defines) to their [`ChainConfig`] and hands
//! out builders for them.
//!
//! The registry clones cheaply (`Arc` internally) and can be shared across
//! threads.
//!
//! # Example
//!
//! ```
//! use txforge_chain::ChainRegistry;
//!
//! let registry = ChainRegistry::new();
//! assert!(registry.supports("eth"));
//!
//! let mut builder = registry.ethereum_builder("teth").unwrap();
//! assert_eq!(builder.config().chain_id, Some(11_155_111));
//! # let _ = builder.nonce(0);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use txforge_core::config::{ChainConfig, Config, FamilyKind};
use txforge_core::error::{Result, TransactionError};

use crate::builder::TransactionBuilder;
use crate::ethereum::Ethereum;
use crate::family::ChainFamily;
use crate::stake::Stake;

/// Registry of known chains.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Arc<HashMap<String, ChainConfig>>,
}

impl ChainRegistry {
    /// A registry holding the built-in chains.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// A registry holding every chain in `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let chains = config
            .chains
            .iter()
            .map(|chain| (chain.name.clone(), chain.clone()))
            .collect();
        Self {
            chains: Arc::new(chains),
        }
    }

    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            chains: Arc::new(HashMap::new()),
        }
    }

    /// Register a chain, replacing any chain with the same name.
    pub fn register(&mut self, chain: ChainConfig) {
        let chains = Arc::make_mut(&mut self.chains);
        chains.insert(chain.name.clone(), chain);
    }

    /// Look up a chain by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.get(name)
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn supports(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    /// Registered chain names, sorted.
    #[must_use]
    pub fn supported_chains(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.chains.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Whether no chain is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// A builder for any family, checked against the chain's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidParameterValue`] for an unknown
    /// chain and [`TransactionError::BuildTransaction`] if the chain belongs
    /// to another family.
    pub fn builder<C: ChainFamily>(&self, name: &str) -> Result<TransactionBuilder<C>> {
        let config = self
            .get(name)
            .ok_or_else(|| TransactionError::invalid_parameter(format!("unknown chain: {name}")))?;
        TransactionBuilder::new(config.clone())
    }

    /// An Ethereum builder for `name`.
    ///
    /// # Errors
    ///
    /// See [`builder`](Self::builder).
    pub fn ethereum_builder(&self, name: &str) -> Result<TransactionBuilder<Ethereum>> {
        self.builder(name)
    }

    /// A stake builder for `name`.
    ///
    /// # Errors
    ///
    /// See [`builder`](Self::builder).
    pub fn stake_builder(&self, name: &str) -> Result<TransactionBuilder<Stake>> {
        self.builder(name)
    }

    /// Names of the registered chains in `family`, sorted.
    #[must_use]
    pub fn chains_in_family(&self, family: FamilyKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .chains
            .values()
            .filter(|chain| chain.family == family)
            .map(|chain| chain.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}
