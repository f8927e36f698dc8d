//! Standalone shock utilities
//!
//! Lightweight deterministic scenarios applied directly to a value or a
//! return series, independent of the analyzer's scenario pipeline.

use crate::stats;
use serde::{Deserialize, Serialize};

/// Result of a single crash scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrashImpact {
    pub crash_pct: f64,
    pub stressed_value: f64,
    pub loss: f64,
}

/// Fixed preset of crash and volatility scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSuite {
    pub crash_10: CrashImpact,
    pub crash_20: CrashImpact,
    pub crash_40: CrashImpact,
    pub volatility_2x: Vec<f64>,
    pub volatility_3x: Vec<f64>,
}

/// Deterministic shock scenario utility.
#[derive(Debug, Clone, Copy, Default)]
pub struct StressTester;

impl StressTester {
    pub fn new() -> Self {
        Self
    }

    /// Applies an instantaneous percentage crash to a portfolio value.
    pub fn market_crash(&self, value: f64, crash_pct: f64) -> CrashImpact {
        let stressed_value = value * (1.0 - crash_pct);
        CrashImpact {
            crash_pct,
            stressed_value,
            loss: value - stressed_value,
        }
    }

    /// Rescales deviations from the mean by `multiplier`, preserving the
    /// mean itself.
    pub fn volatility_spike(&self, returns: &[f64], multiplier: f64) -> Vec<f64> {
        let mean = stats::mean(returns);
        returns
            .iter()
            .map(|r| mean + (r - mean) * multiplier)
            .collect()
    }

    /// Runs the fixed preset: 10/20/40% crashes plus 2x and 3x volatility.
    pub fn run_all_scenarios(&self, value: f64, returns: &[f64]) -> ScenarioSuite {
        ScenarioSuite {
            crash_10: self.market_crash(value, 0.10),
            crash_20: self.market_crash(value, 0.20),
            crash_40: self.market_crash(value, 0.40),
            volatility_2x: self.volatility_spike(returns, 2.0),
            volatility_3x: self.volatility_spike(returns, 3.0),
        }
    }
}
