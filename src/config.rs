//! Profiler configuration
//!
//! Loaded from TOML or built in code; CLI flags override file values.
//!
//! ```toml
//! mode = "deferred"
//! buffer_capacity = 100000
//! warn_on_dangling = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProfilerError, Result};
use crate::stats::AggregationMode;

/// Largest deferred-buffer pre-allocation accepted
pub const MAX_BUFFER_CAPACITY: usize = 1_000_000;

/// Configuration for a [`Profiler`](crate::profiler::Profiler)
///
/// # Example
/// ```
/// use sectimer::config::ProfilerConfig;
/// use sectimer::stats::AggregationMode;
///
/// let config = ProfilerConfig::default();
/// assert_eq!(config.mode, AggregationMode::Immediate);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Whether intervals are aggregated at exit time or in a later batch
    pub mode: AggregationMode,

    /// Intervals to pre-allocate room for in deferred mode
    ///
    /// Deferred mode appends every completed interval to a buffer, so
    /// workloads with many short sections benefit from a larger hint.
    pub buffer_capacity: usize,

    /// Log a warning for sections still open at finalization
    pub warn_on_dangling: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            mode: AggregationMode::Immediate,
            buffer_capacity: 1024,
            warn_on_dangling: true,
        }
    }
}

impl ProfilerConfig {
    /// Deferred aggregation with the given buffer hint
    pub fn deferred(buffer_capacity: usize) -> Self {
        Self {
            mode: AggregationMode::Deferred,
            buffer_capacity,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: AggregationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity > MAX_BUFFER_CAPACITY {
            return Err(ProfilerError::Config(format!(
                "buffer_capacity must be <= {}, got {}",
                MAX_BUFFER_CAPACITY, self.buffer_capacity
            )));
        }

        if self.mode == AggregationMode::Deferred && self.buffer_capacity == 0 {
            return Err(ProfilerError::Config(
                "buffer_capacity must be > 0 in deferred mode".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ProfilerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }
}
