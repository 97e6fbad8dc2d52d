//! Simulation parameters threaded through the orchestrator and match engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DELAY_MS: u64 = 100;
pub const BASE_GOAL_RATE: f64 = 6.0;
/// Upper bound on `base_goal_rate`; a single side never draws more goals than this.
pub const MAX_BASE_GOAL_RATE: f64 = 50.0;
pub const USE_RATINGS: bool = true;

/// Rating every side draws with when `use_ratings` is off.
pub const NEUTRAL_RATING: u32 = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Pacing per applied event / shootout round. Read by narration sinks only.
    pub delay_ms: u64,
    pub base_goal_rate: f64,
    pub use_ratings: bool,
    /// Shootout round cap. `None` means sudden death runs until the sides separate,
    /// which may never happen when both sides are rated around 8 or lower.
    pub max_shootout_rounds: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            base_goal_rate: BASE_GOAL_RATE,
            use_ratings: USE_RATINGS,
            max_shootout_rounds: None,
        }
    }
}

impl SimConfig {
    /// Same defaults with no pacing; for batch runs and tests.
    pub fn instant() -> Self {
        Self {
            delay_ms: 0,
            ..Self::default()
        }
    }

    /// Defaults overridden by `SIM_DELAY_MS`, `SIM_BASE_GOAL_RATE`, `SIM_USE_RATINGS`
    /// and `SIM_MAX_SHOOTOUT_ROUNDS`. Unset or unparsable values keep the default, as
    /// does a goal rate outside `(0, MAX_BASE_GOAL_RATE]`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            delay_ms: env_parse("SIM_DELAY_MS").unwrap_or(defaults.delay_ms),
            base_goal_rate: env_parse("SIM_BASE_GOAL_RATE")
                .filter(|&rate| valid_goal_rate(rate))
                .unwrap_or(defaults.base_goal_rate),
            use_ratings: env_parse("SIM_USE_RATINGS").unwrap_or(defaults.use_ratings),
            max_shootout_rounds: env_parse("SIM_MAX_SHOOTOUT_ROUNDS")
                .or(defaults.max_shootout_rounds),
        }
    }

    /// `base_goal_rate` clamped to `[0, MAX_BASE_GOAL_RATE]`; NaN reads as 0.
    pub fn goal_rate(&self) -> f64 {
        if self.base_goal_rate.is_nan() {
            return 0.0;
        }
        self.base_goal_rate.clamp(0.0, MAX_BASE_GOAL_RATE)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Rating used in draws for a team rated `rating`.
    pub fn effective_rating(&self, rating: u32) -> u32 {
        if self.use_ratings {
            rating
        } else {
            NEUTRAL_RATING
        }
    }
}

fn valid_goal_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0 && rate <= MAX_BASE_GOAL_RATE
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
