//! Top-level configuration with layered loading:
//! defaults ← `basket.toml` ← `BASKET_*` environment ← CLI overrides.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{LogConfig, MiningConfig, OutputConfig, ParseConfig};
use crate::errors::ConfigError;

/// File name looked up in the project root by [`BasketConfig::load`].
pub const CONFIG_FILE_NAME: &str = "basket.toml";

/// Environment variables read by [`BasketConfig::apply_env_overrides`].
pub const ENV_KEYS: &[&str] = &[
    "BASKET_MINING_MIN_SUPPORT",
    "BASKET_MINING_MIN_CONFIDENCE",
    "BASKET_MINING_TOP_N",
    "BASKET_MINING_MAX_ITEMSET_SIZE",
    "BASKET_MINING_MAX_ITEMSETS",
    "BASKET_MINING_MAX_RULES",
    "BASKET_MINING_THREADS",
    "BASKET_PARSE_LAYOUT",
    "BASKET_OUTPUT_FORMAT",
    "BASKET_LOG_LEVEL",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BasketConfig {
    pub parse: ParseConfig,
    pub mining: MiningConfig,
    pub output: OutputConfig,
    pub logging: LogConfig,
}

impl BasketConfig {
    /// Parse from a TOML string; missing fields stay unset.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read a specific config file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load the layered configuration for a project root.
    ///
    /// A missing `basket.toml` is not an error; defaults are used.
    pub fn load(root: &Path, cli_overrides: Option<&BasketConfig>) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        let mut config = if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config file");
            Self::load_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;

        if let Some(overrides) = cli_overrides {
            config.merge(overrides);
        }
        Ok(config)
    }

    /// Overlay every field that is set in `other`.
    pub fn merge(&mut self, other: &BasketConfig) {
        self.parse.merge(&other.parse);
        self.mining.merge(&other.mining);
        self.output.merge(&other.output);
        self.logging.merge(&other.logging);
    }

    /// Apply `BASKET_*` environment variables. Unparseable values are errors,
    /// not silently ignored.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(v) = env_value("BASKET_MINING_MIN_SUPPORT")? {
            self.mining.min_support = Some(v);
        }
        if let Some(v) = env_value("BASKET_MINING_MIN_CONFIDENCE")? {
            self.mining.min_confidence = Some(v);
        }
        if let Some(v) = env_value("BASKET_MINING_TOP_N")? {
            self.mining.top_n = Some(v);
        }
        if let Some(v) = env_value("BASKET_MINING_MAX_ITEMSET_SIZE")? {
            self.mining.max_itemset_size = Some(v);
        }
        if let Some(v) = env_value("BASKET_MINING_MAX_ITEMSETS")? {
            self.mining.max_itemsets = Some(v);
        }
        if let Some(v) = env_value("BASKET_MINING_MAX_RULES")? {
            self.mining.max_rules = Some(v);
        }
        if let Some(v) = env_value("BASKET_MINING_THREADS")? {
            self.mining.threads = Some(v);
        }
        if let Some(v) = env_value("BASKET_PARSE_LAYOUT")? {
            self.parse.layout = Some(v);
        }
        if let Some(v) = env_value("BASKET_OUTPUT_FORMAT")? {
            self.output.format = Some(v);
        }
        if let Ok(level) = std::env::var("BASKET_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.logging.level = Some(level);
            }
        }
        Ok(())
    }
}

fn env_value<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
