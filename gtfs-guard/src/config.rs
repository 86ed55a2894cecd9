//! Engine configuration.

use crate::error::{ErrorContext, GuardError, Result};
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`ValidationEngine`](crate::core::ValidationEngine).
///
/// Every field has a default, so a JSON document only needs to name the
/// fields it changes:
///
/// ```rust
/// use gtfs_guard::config::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{ "parallel": true, "shardSize": 500 }"#).unwrap();
/// assert!(config.parallel);
/// assert_eq!(config.shard_size, 500);
/// assert!(config.skip_rules_on_unparsable_tables);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Run work units on the blocking thread pool
    pub parallel: bool,
    /// Upper bound on concurrently running work units (None uses the CPU count)
    pub max_concurrency: Option<usize>,
    /// Rows per shard when a per-record rule is split in the parallel path
    pub shard_size: usize,
    /// Maximum stored notices per code (None keeps every notice)
    pub max_notices_per_kind: Option<usize>,
    /// Skip rules whose tables failed to decode instead of running them on partial data
    pub skip_rules_on_unparsable_tables: bool,
    /// Per-rule logging detail
    #[serde(skip)]
    pub log: LogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            max_concurrency: None,
            shard_size: 10_000,
            max_notices_per_kind: None,
            skip_rules_on_unparsable_tables: true,
            log: LogConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Enables or disables the parallel execution path.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Bounds how many work units run at once.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = Some(max);
        self
    }

    /// Sets the shard size for per-record rules.
    pub fn with_shard_size(mut self, shard_size: usize) -> Self {
        self.shard_size = shard_size;
        self
    }

    /// Caps stored notices per code.
    pub fn with_max_notices_per_kind(mut self, max: Option<usize>) -> Self {
        self.max_notices_per_kind = max;
        self
    }

    /// Chooses whether rules over undecodable tables are skipped.
    pub fn with_skip_rules_on_unparsable_tables(mut self, skip: bool) -> Self {
        self.skip_rules_on_unparsable_tables = skip;
        self
    }

    /// Sets the per-rule logging configuration.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// The concurrency bound actually applied.
    pub fn effective_max_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Rejects values no pass can run with.
    pub fn validate(&self) -> Result<()> {
        if self.shard_size == 0 {
            return Err(GuardError::configuration("shard_size must be at least 1"));
        }
        if self.max_concurrency == Some(0) {
            return Err(GuardError::configuration(
                "max_concurrency must be at least 1",
            ));
        }
        Ok(())
    }
}
