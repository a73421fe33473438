//! Loading and saving chain configuration files.
//!
//! Configuration lives at `~/.txforge/config.toml` by default. A missing
//! file is not an error for [`ConfigLoader::load`]: the built-in chains are
//! returned instead.
//!
//! ```no_run
//! use txforge_core::config_loader::ConfigLoader;
//!
//! let loader = ConfigLoader::new().expect("home directory");
//! if !loader.exists() {
//!     loader.write_default().expect("write default config");
//! }
//! let config = loader.load().expect("load config");
//! assert!(config.chain("eth").is_some());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "config.toml";

const BASE_DIR_NAME: &str = ".txforge";

/// Reads and writes the configuration file under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Loader rooted at the default base directory (`~/.txforge`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot
    /// be determined.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            base_dir: default_base_dir()?,
        })
    }

    /// Loader rooted at a custom base directory.
    #[must_use]
    pub const fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Path to the configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// The base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load the configuration, falling back to [`Config::default`] when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] for invalid TOML,
    /// [`ConfigError::InvalidValue`] for a chain definition that fails
    /// validation and [`ConfigError::Io`] if the file cannot be read.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from_path(&path)
    }

    /// Load the configuration, failing if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the file is missing, plus
    /// everything [`load`](Self::load) can return.
    pub fn load_required(&self) -> Result<Config, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }
        Self::load_from_path(&path)
    }

    /// Write `config` to the configuration file, creating the base
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] if the configuration cannot be
    /// serialized and [`ConfigError::Io`] if it cannot be written.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        self.ensure_base_dir()?;
        let rendered = toml::to_string_pretty(config).map_err(|e| {
            ConfigError::parse_failed(format!("failed to serialize configuration: {e}"))
        })?;
        fs::write(self.config_path(), rendered)?;
        Ok(())
    }

    /// Write the default configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written.
    pub fn write_default(&self) -> Result<(), ConfigError> {
        self.ensure_base_dir()?;
        fs::write(self.config_path(), Config::default_toml())?;
        Ok(())
    }

    /// Whether the configuration file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.config_path().exists()
    }

    fn ensure_base_dir(&self) -> Result<(), ConfigError> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)?;
        }
        Ok(())
    }

    fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            ConfigError::parse_failed(format!("invalid TOML in {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Expand a leading `~` to the home directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the path starts with `~` and
/// the home directory cannot be determined.
pub fn expand_path(path: &str) -> Result<PathBuf, ConfigError> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(rest))
    } else if path == "~" {
        dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)
    } else {
        Ok(PathBuf::from(path))
    }
}

/// The default base directory (`~/.txforge`).
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot be
/// determined.
pub fn default_base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home.join(BASE_DIR_NAME))
}

/// Load configuration from the default location.
///
/// # Errors
///
/// See [`ConfigLoader::new`] and [`ConfigLoader::load`].
pub fn load_config() -> Result<Config, ConfigError> {
    ConfigLoader::new()?.load()
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::needless_raw_string_hashes
    )]

    use super::*;
    use crate::config::{ChainConfig, FamilyKind};
    use tempfile::TempDir;

    // -------------------------------------------------------------------------
    // expand_path
    // -------------------------------------------------------------------------

    #[test]
    fn test_expand_path_with_tilde_prefix() {
        let path = expand_path("~/.txforge/config.toml").expect("should succeed");
        let home = dirs::home_dir().expect("home dir should exist");
        assert_eq!(path, home.join(".txforge/config.toml"));
    }

    #[test]
    fn test_expand_path_with_tilde_only() {
        let path = expand_path("~").expect("should succeed");
        assert_eq!(path, dirs::home_dir().expect("home dir should exist"));
    }

    #[test]
    fn test_expand_path_leaves_other_paths() {
        assert_eq!(
            expand_path("/etc/txforge/config.toml").unwrap(),
            PathBuf::from("/etc/txforge/config.toml")
        );
        assert_eq!(
            expand_path("/path/to/~/config.toml").unwrap(),
            PathBuf::from("/path/to/~/config.toml")
        );
    }

    #[test]
    fn test_default_base_dir() {
        let path = default_base_dir().expect("should succeed");
        let home = dirs::home_dir().expect("home dir should exist");
        assert_eq!(path, home.join(".txforge"));
    }

    // -------------------------------------------------------------------------
    // ConfigLoader
    // -------------------------------------------------------------------------

    #[test]
    fn test_config_path() {
        let loader = ConfigLoader::with_base_dir(PathBuf::from("/test/base"));
        assert_eq!(loader.config_path(), PathBuf::from("/test/base/config.toml"));
        assert_eq!(loader.base_dir(), Path::new("/test/base"));
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());

        assert!(!loader.exists());
        assert_eq!(loader.load().unwrap(), Config::default());
    }

    #[test]
    fn test_load_required_missing_fails() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());

        let err = loader.load_required().unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_write_default_then_load() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let loader = ConfigLoader::with_base_dir(temp_dir.path().join("nested"));

        loader.write_default().expect("write should succeed");
        assert!(loader.exists());
        assert_eq!(loader.load_required().unwrap(), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());

        let config = Config::empty().with_chain(ChainConfig {
            name: "dev".to_string(),
            full_name: "Dev".to_string(),
            family: FamilyKind::Ethereum,
            chain_id: Some(31_337),
            chain_name: None,
            decimals: 18,
            multisig_threshold: 2,
            validate_transaction: true,
            testnet: true,
        });

        loader.save(&config).expect("save should succeed");
        let loaded = loader.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        fs::write(temp_dir.path().join("config.toml"), "[[chains]\nname = ").unwrap();
        let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());

        let err = loader.load().unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn test_load_rejects_invalid_chain() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        fs::write(
            temp_dir.path().join("config.toml"),
            r#"
[[chains]]
name = "broken"
family = "stake"
decimals = 9
"#,
        )
        .unwrap();
        let loader = ConfigLoader::with_base_dir(temp_dir.path().to_path_buf());

        let err = loader.load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
