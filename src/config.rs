//! Runtime configuration.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```
//! use nwscript::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_toml_str("rng_seed = 42").unwrap();
//! assert_eq!(config.rng_seed, Some(42));
//! assert_eq!(config.max_script_depth, 8);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a [`RuntimeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables for a [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Seed for the `Random` engine function. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    /// Cap on due actions executed per pump. Remaining due actions fire on
    /// the next pump, in order.
    pub max_actions_per_pump: Option<usize>,
    /// Maximum nesting of `ExecuteScript` chains.
    pub max_script_depth: usize,
    /// Log a diagnostic for every call to an unimplemented engine function.
    pub log_unimplemented: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            max_actions_per_pump: None,
            max_script_depth: 8,
            log_unimplemented: true,
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Builder-style seed override, mostly for tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}
