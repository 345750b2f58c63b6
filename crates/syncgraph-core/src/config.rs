//! Configuration for synchronized graphs.
//!
//! Values are layered with `figment`, lowest priority first:
//!
//! 1. Built-in defaults (cache disabled, non-fair lock)
//! 2. A TOML file (`syncgraph.toml` by default, optional)
//! 3. Environment variables prefixed with `SYNCGRAPH_`
//!
//! ```toml
//! cache_enabled = true
//! fair = false
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file looked up by [`SyncGraphConfig::load`].
pub const DEFAULT_CONFIG_FILE: &str = "syncgraph.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SYNCGRAPH_";

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Figment could not merge or extract the configuration.
    #[error("Failed to extract configuration: {0}")]
    Figment(Box<figment::Error>),

    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Options selected when a synchronized graph is constructed.
///
/// `fair` is fixed for the lifetime of the graph; `cache_enabled` only picks
/// the initial cache mode and can be toggled later with
/// [`SynchronizedGraph::set_cache`](crate::SynchronizedGraph::set_cache).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncGraphConfig {
    /// Memoize incident/incoming/outgoing edge sets per vertex.
    pub cache_enabled: bool,
    /// Hand the lock directly to the next queued waiter on every release.
    pub fair: bool,
}

impl SyncGraphConfig {
    /// Loads configuration from [`DEFAULT_CONFIG_FILE`] (if present) and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let figment = Self::base().merge(Toml::file(DEFAULT_CONFIG_FILE));
        Self::extract(figment)
    }

    /// Loads configuration from an explicit TOML file plus the environment.
    ///
    /// Unlike [`load`](Self::load), a missing file is an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let figment = Self::base().merge(Toml::string(&content));
        Self::extract(figment)
    }

    /// Parses configuration from a TOML string, ignoring the environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::base().merge(Toml::string(content)).extract()?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        tracing::debug!(
            cache_enabled = config.cache_enabled,
            fair = config.fair,
            "Loaded synchronized graph configuration"
        );
        Ok(config)
    }
}
