//! Run configuration: time budget and random seed.

use std::env;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{PackError, Result};

/// Time budget used when none is configured.
pub const DEFAULT_TIME_BUDGET_MS: u64 = 10_000;

/// Overrides the time budget, in milliseconds.
pub const ENV_TIME_BUDGET_MS: &str = "BLOCKFIT_TIME_BUDGET_MS";
/// Fixes the random seed so runs can be reproduced.
pub const ENV_SEED: &str = "BLOCKFIT_SEED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveConfig {
    /// Wall-clock budget for one search.
    pub time_budget: Duration,
    /// Seed for the row shuffles; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
            seed: None,
        }
    }
}

impl SolveConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_TIME_BUDGET_MS).filter(|v| !v.trim().is_empty()) {
            let millis = parse_positive(ENV_TIME_BUDGET_MS, &value)?;
            config.time_budget = Duration::from_millis(millis);
        }

        if let Some(value) = lookup(ENV_SEED).filter(|v| !v.trim().is_empty()) {
            let seed = value.trim().parse().map_err(|_| {
                PackError::InvalidConfiguration(format!("{ENV_SEED} is not a number: {value}"))
            })?;
            config.seed = Some(seed);
        }

        Ok(config)
    }

    pub fn with_time_budget_ms(mut self, millis: u64) -> Self {
        self.time_budget = Duration::from_millis(millis);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Random generator for one solve.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(PackError::InvalidConfiguration(format!(
            "{key} must be positive"
        ))),
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(PackError::InvalidConfiguration(format!(
            "{key} is not a number: {value}"
        ))),
    }
}
