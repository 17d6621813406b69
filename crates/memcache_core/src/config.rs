//! # Pool Configuration
//!
//! Pools are configured once at creation. Configs are plain TOML:
//!
//! ```toml
//! name = "packet-buffers"
//! max_block_size = 65536
//! verify_owner = true
//! ```
//!
//! Every key is optional; missing keys take their [`Default`] value.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MemCacheError, MemCacheResult};

/// Configuration for a [`MemCache`](crate::MemCache).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemCacheConfig {
    /// Label attached to every log record emitted by the pool.
    pub name: String,
    /// Largest block the pool will hand out. `None` means unlimited.
    pub max_block_size: Option<usize>,
    /// Reject blocks owned by another pool in [`MemCache::free`](crate::MemCache::free).
    pub verify_owner: bool,
}

impl Default for MemCacheConfig {
    fn default() -> Self {
        Self {
            name: String::from("memcache"),
            max_block_size: None,
            verify_owner: true,
        }
    }
}

impl MemCacheConfig {
    /// Default configuration with a custom pool name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`MemCacheError::InvalidConfig`] on malformed TOML or a
    /// value rejected by [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> MemCacheResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| MemCacheError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`MemCacheError::InvalidConfig`] if the file cannot be read
    /// or its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> MemCacheResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MemCacheError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks the config for values no pool can work with.
    ///
    /// # Errors
    ///
    /// Returns [`MemCacheError::InvalidConfig`] for an empty name or a zero
    /// `max_block_size`.
    pub fn validate(&self) -> MemCacheResult<()> {
        if self.name.trim().is_empty() {
            return Err(MemCacheError::InvalidConfig(String::from(
                "name must not be empty",
            )));
        }
        if self.max_block_size == Some(0) {
            return Err(MemCacheError::InvalidConfig(String::from(
                "max_block_size must be greater than zero",
            )));
        }
        Ok(())
    }

    /// Rejects request sizes the pool must not serve.
    pub(crate) fn check_request(&self, size: usize) -> MemCacheResult<()> {
        if size == 0 {
            return Err(MemCacheError::ZeroSize);
        }
        match self.max_block_size {
            Some(limit) if size > limit => Err(MemCacheError::TooLarge {
                requested: size,
                limit,
            }),
            _ => Ok(()),
        }
    }
}
