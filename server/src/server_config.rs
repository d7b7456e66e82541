use std::time::Duration;
use serde::{Deserialize, Serialize};

use gomoku_common::config::{Validate, ensure_range};
use gomoku_common::games::gomoku::SearchConfig;

pub const DEFAULT_CONFIG_PATH: &str = "gomoku_server.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub advertise_interval_ms: u64,
    pub cleanup_interval_secs: u64,
    /// Waiting sessions idle this long are closed.
    pub inactivity_timeout_secs: u64,
    pub inbox_capacity: usize,
    pub search: SearchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            advertise_interval_ms: 2000,
            cleanup_interval_secs: 300,
            inactivity_timeout_secs: 3600,
            inbox_capacity: 256,
            search: SearchConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn advertise_interval(&self) -> Duration {
        Duration::from_millis(self.advertise_interval_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        ensure_range("advertise_interval_ms", self.advertise_interval_ms, 100, 60_000)?;
        ensure_range("cleanup_interval_secs", self.cleanup_interval_secs, 1, 86_400)?;
        ensure_range("inactivity_timeout_secs", self.inactivity_timeout_secs, 1, 7 * 86_400)?;
        ensure_range("inbox_capacity", self.inbox_capacity, 1, 65_536)?;
        self.search.validate().map_err(|e| format!("search: {}", e))
    }
}
