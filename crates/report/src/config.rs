//! Rollup configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do when a selected buffer references catalog or calendar records
/// that do not exist.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole rollup.
    #[default]
    Abort,
    /// Drop the buffer, log a warning and record a diagnostic on the report.
    SkipBuffer,
}

impl core::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" | "skip_buffer" => Ok(FailurePolicy::SkipBuffer),
            other => Err(format!("unknown failure policy '{other}'")),
        }
    }
}

/// Rollup engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupConfig {
    /// Worker threads used by `collect_parallel`.
    pub workers: usize,
    pub failure_policy: FailurePolicy,
    /// Emit descriptive item/location fields and custom attribute columns.
    pub include_attributes: bool,
    /// Bucket granularity for requests that do not name one.
    pub default_granularity: String,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(4, |n| n.get()),
            failure_policy: FailurePolicy::Abort,
            include_attributes: true,
            default_granularity: "month".to_string(),
        }
    }
}

impl RollupConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_attributes(mut self, include: bool) -> Self {
        self.include_attributes = include;
        self
    }

    pub fn with_default_granularity(mut self, granularity: impl Into<String>) -> Self {
        self.default_granularity = granularity.into();
        self
    }

    /// Defaults overridden by `STOCKPLAN_*` environment variables.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("STOCKPLAN_WORKERS") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.workers = n,
                _ => warn!(value = %raw, "ignoring invalid STOCKPLAN_WORKERS"),
            }
        }
        if let Some(raw) = lookup("STOCKPLAN_ON_CONFIG_ERROR") {
            match raw.parse::<FailurePolicy>() {
                Ok(policy) => config.failure_policy = policy,
                Err(error) => warn!(%error, "ignoring invalid STOCKPLAN_ON_CONFIG_ERROR"),
            }
        }
        if let Some(raw) = lookup("STOCKPLAN_INCLUDE_ATTRIBUTES") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => config.include_attributes = true,
                "0" | "false" | "no" => config.include_attributes = false,
                _ => warn!(value = %raw, "ignoring invalid STOCKPLAN_INCLUDE_ATTRIBUTES"),
            }
        }
        if let Some(raw) = lookup("STOCKPLAN_BUCKET_GRANULARITY") {
            let raw = raw.trim();
            if raw.is_empty() {
                warn!("ignoring empty STOCKPLAN_BUCKET_GRANULARITY");
            } else {
                config.default_granularity = raw.to_ascii_lowercase();
            }
        }

        config
    }
}
