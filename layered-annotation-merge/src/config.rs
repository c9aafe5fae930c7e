//! Merge configuration.

use layered_annotation::DEFAULT_TOOL;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How fresh ids are produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdStrategy {
    /// Random v4 uuids
    #[default]
    Random,
    /// Counter-based ids starting at `start`, for reproducible output
    Sequential { start: u64 },
}

/// Configuration for a [`Reattacher`](crate::Reattacher).
///
/// ```toml
/// tool = "concrete-stanford"
/// fixed_timestamp = 1400000000
///
/// [ids]
/// kind = "sequential"
/// start = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Tool name stamped on every produced annotation.
    pub tool: String,
    /// Pin the provenance timestamp instead of reading the clock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_timestamp: Option<i64>,
    pub ids: IdStrategy,
}

impl MergeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            fixed_timestamp: None,
            ids: IdStrategy::default(),
        }
    }
}
