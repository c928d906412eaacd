//! Board tuning configuration

use crate::types::{BASE_PIECE_VALUE, DEFAULT_SETTLE_DELAY_MS, MAX_FILL_ATTEMPTS};

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Delay between cascade phases, for observers to animate
    pub settle_delay_ms: u32,
    pub base_piece_value: u32,
    pub max_fill_attempts: u32,
    /// Upper bound on reshuffle retries; `None` retries until playable
    pub max_reshuffles: Option<u32>,
    pub seed: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            base_piece_value: BASE_PIECE_VALUE,
            max_fill_attempts: MAX_FILL_ATTEMPTS,
            max_reshuffles: None,
            seed: 1,
        }
    }
}

impl BoardConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            settle_delay_ms: parsed("MATCH3_SETTLE_DELAY_MS").unwrap_or(defaults.settle_delay_ms),
            base_piece_value: parsed("MATCH3_BASE_PIECE_VALUE")
                .unwrap_or(defaults.base_piece_value),
            max_fill_attempts: parsed("MATCH3_MAX_FILL_ATTEMPTS")
                .unwrap_or(defaults.max_fill_attempts),
            max_reshuffles: parsed("MATCH3_MAX_RESHUFFLES").or(defaults.max_reshuffles),
            seed: parsed("MATCH3_SEED").unwrap_or(defaults.seed),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_settle_delay_ms(mut self, settle_delay_ms: u32) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }

    pub fn with_max_reshuffles(mut self, max_reshuffles: Option<u32>) -> Self {
        self.max_reshuffles = max_reshuffles;
        self
    }
}
