//! Value-at-Risk and Conditional Value-at-Risk
//!
//! Three estimators over one periodic return series:
//! - historical: empirical quantile of observed returns
//! - parametric: Gaussian approximation with a fixed z-score table
//! - Monte Carlo: Gaussian fitted to the sample, then the historical
//!   estimator over the simulated draws
//!
//! All results are reported as positive loss magnitudes.

use crate::stats;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Monte Carlo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarConfig {
    /// Number of simulated draws
    pub simulations: usize,

    /// Fixed seed for reproducible simulations; None draws from entropy
    pub random_seed: Option<u64>,
}

impl Default for VarConfig {
    fn default() -> Self {
        Self {
            simulations: 10_000,
            random_seed: None,
        }
    }
}

/// VaR/CVaR calculator over a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct VarCalculator {
    config: VarConfig,
}

/// z-score lookup for the parametric estimator. The table is fixed at the
/// three standard confidence levels; anything else falls back to the 95%
/// value rather than inverting the normal CDF.
pub fn z_score(confidence: f64) -> f64 {
    const TABLE: [(f64, f64); 3] = [(0.90, 1.28), (0.95, 1.645), (0.99, 2.326)];
    for (level, z) in TABLE {
        if (confidence - level).abs() < 1e-9 {
            return z;
        }
    }
    1.645
}

impl VarCalculator {
    pub fn new(config: VarConfig) -> Self {
        Self { config }
    }

    /// Empirical quantile VaR: sort ascending, take the return at
    /// floor((1−confidence)·n), report its magnitude. 0.0 on empty input.
    pub fn historical_var(&self, returns: &[f64], confidence: f64) -> f64 {
        Self::empirical_var(returns, confidence)
    }

    /// Tail mean beyond the VaR threshold: average of the worst
    /// max(1, floor((1−confidence)·n)) returns, as a magnitude.
    pub fn historical_cvar(&self, returns: &[f64], confidence: f64) -> f64 {
        Self::empirical_cvar(returns, confidence)
    }

    /// Gaussian VaR: |mean − z·σ| with the fixed z-score table.
    pub fn parametric_var(&self, returns: &[f64], confidence: f64) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }
        let mean = stats::mean(returns);
        let sd = stats::std_dev(returns);
        (mean - z_score(confidence) * sd).abs()
    }

    /// Monte Carlo VaR: historical estimator over simulated draws.
    pub fn monte_carlo_var(&self, returns: &[f64], confidence: f64) -> f64 {
        Self::empirical_var(&self.simulate(returns), confidence)
    }

    /// Monte Carlo CVaR over the same simulated distribution.
    pub fn monte_carlo_cvar(&self, returns: &[f64], confidence: f64) -> f64 {
        Self::empirical_cvar(&self.simulate(returns), confidence)
    }

    /// Dollar VaR: percentage VaR scaled to portfolio value.
    pub fn value_at_risk(&self, returns: &[f64], confidence: f64, portfolio_value: f64) -> f64 {
        self.historical_var(returns, confidence) * portfolio_value
    }

    /// Dollar CVaR: percentage CVaR scaled to portfolio value.
    pub fn conditional_value_at_risk(
        &self,
        returns: &[f64],
        confidence: f64,
        portfolio_value: f64,
    ) -> f64 {
        self.historical_cvar(returns, confidence) * portfolio_value
    }

    /// Tail-fatness indicator: CVaR over VaR, 0.0 when VaR is 0.
    pub fn cvar_var_ratio(&self, returns: &[f64], confidence: f64) -> f64 {
        let var = self.historical_var(returns, confidence);
        if var == 0.0 {
            return 0.0;
        }
        self.historical_cvar(returns, confidence) / var
    }

    /// Draws `simulations` returns from a Gaussian fitted to the sample
    /// mean and standard deviation. Degenerate samples yield all-zero draws.
    fn simulate(&self, returns: &[f64]) -> Vec<f64> {
        if returns.is_empty() {
            return Vec::new();
        }
        let mean = stats::mean(returns);
        let sd = stats::std_dev(returns);
        let normal = match Normal::new(mean, sd) {
            Ok(n) => n,
            Err(_) => return vec![mean; self.config.simulations],
        };
        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        (0..self.config.simulations)
            .map(|_| normal.sample(&mut rng))
            .collect()
    }

    fn empirical_var(returns: &[f64], confidence: f64) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }
        let mut sorted = returns.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let index = ((1.0 - confidence) * sorted.len() as f64).floor() as usize;
        let index = index.min(sorted.len() - 1);
        sorted[index].abs()
    }

    fn empirical_cvar(returns: &[f64], confidence: f64) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }
        let mut sorted = returns.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let index = ((1.0 - confidence) * sorted.len() as f64).floor() as usize;
        let tail = index.max(1).min(sorted.len());
        (sorted[..tail].iter().sum::<f64>() / tail as f64).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_returns() -> Vec<f64> {
        // 20 observations; worst returns are -0.05 and -0.03.
        vec![
            0.01, 0.02, -0.01, 0.015, -0.005, 0.03, -0.05, 0.01, 0.005, -0.01, 0.02, 0.01, -0.015,
            0.025, 0.01, -0.005, 0.015, -0.03, -0.01, 0.005,
        ]
    }

    #[test]
    fn test_z_score_table() {
        assert_relative_eq!(z_score(0.90), 1.28);
        assert_relative_eq!(z_score(0.95), 1.645);
        assert_relative_eq!(z_score(0.99), 2.326);
        // Unlisted levels fall back to the 95% value.
        assert_relative_eq!(z_score(0.975), 1.645);
        assert_relative_eq!(z_score(0.50), 1.645);
    }

    #[test]
    fn test_historical_var() {
        let calc = VarCalculator::default();
        let returns = create_test_returns();
        // floor(0.05 * 20) = 1, second-worst return is -0.03.
        assert_relative_eq!(calc.historical_var(&returns, 0.95), 0.03);
        // floor(0.01 * 20) = 0, worst return is -0.05.
        assert_relative_eq!(calc.historical_var(&returns, 0.99), 0.05);
    }

    #[test]
    fn test_historical_cvar_at_least_var() {
        let calc = VarCalculator::default();
        let returns = create_test_returns();
        let var = calc.historical_var(&returns, 0.95);
        let cvar = calc.historical_cvar(&returns, 0.95);
        assert!(cvar >= var);
        // Tail of size max(1, 1) = 1: the single worst return.
        assert_relative_eq!(cvar, 0.05);
    }

    #[test]
    fn test_var_abs_quantile_on_gain_heavy_series() {
        // With a single loss among gains, widening the tail past it picks a
        // positive return whose magnitude exceeds the loss, so the estimate
        // is not monotone in confidence. Pins the plain abs-of-quantile
        // definition.
        let calc = VarCalculator::default();
        let mut returns = vec![0.1; 9];
        returns.push(-0.001);
        assert_relative_eq!(calc.historical_var(&returns, 0.95), 0.001);
        assert_relative_eq!(calc.historical_var(&returns, 0.85), 0.1);
    }

    #[test]
    fn test_var_monotone_in_confidence() {
        let calc = VarCalculator::default();
        let returns = create_test_returns();
        let var_90 = calc.historical_var(&returns, 0.90);
        let var_95 = calc.historical_var(&returns, 0.95);
        let var_99 = calc.historical_var(&returns, 0.99);
        assert!(var_90 <= var_95);
        assert!(var_95 <= var_99);
    }

    #[test]
    fn test_parametric_var() {
        let calc = VarCalculator::default();
        let returns = create_test_returns();
        let expected =
            (crate::stats::mean(&returns) - 1.645 * crate::stats::std_dev(&returns)).abs();
        assert_relative_eq!(calc.parametric_var(&returns, 0.95), expected);
    }

    #[test]
    fn test_empty_returns_are_neutral() {
        let calc = VarCalculator::default();
        assert_eq!(calc.historical_var(&[], 0.95), 0.0);
        assert_eq!(calc.historical_cvar(&[], 0.95), 0.0);
        assert_eq!(calc.parametric_var(&[], 0.95), 0.0);
        assert_eq!(calc.monte_carlo_var(&[], 0.95), 0.0);
        assert_eq!(calc.cvar_var_ratio(&[], 0.95), 0.0);
    }

    #[test]
    fn test_portfolio_scaling() {
        let calc = VarCalculator::default();
        let returns = create_test_returns();
        let var_pct = calc.historical_var(&returns, 0.95);
        assert_relative_eq!(
            calc.value_at_risk(&returns, 0.95, 100_000.0),
            var_pct * 100_000.0
        );
        let cvar_pct = calc.historical_cvar(&returns, 0.95);
        assert_relative_eq!(
            calc.conditional_value_at_risk(&returns, 0.95, 100_000.0),
            cvar_pct * 100_000.0
        );
    }

    #[test]
    fn test_monte_carlo_seeded_reproducibility() {
        let config = VarConfig {
            simulations: 5_000,
            random_seed: Some(42),
        };
        let returns = create_test_returns();
        let a = VarCalculator::new(config.clone()).monte_carlo_var(&returns, 0.95);
        let b = VarCalculator::new(config).monte_carlo_var(&returns, 0.95);
        assert_eq!(a, b);
        assert!(a > 0.0);
    }

    #[test]
    fn test_monte_carlo_close_to_parametric() {
        let config = VarConfig {
            simulations: 50_000,
            random_seed: Some(7),
        };
        let calc = VarCalculator::new(config);
        let returns = create_test_returns();
        let mc = calc.monte_carlo_var(&returns, 0.95);
        let parametric = calc.parametric_var(&returns, 0.95);
        // Both estimate the 5% Gaussian tail; large samples agree closely.
        assert!((mc - parametric).abs() < 0.01);
    }

    #[test]
    fn test_cvar_var_ratio() {
        let calc = VarCalculator::default();
        let returns = create_test_returns();
        let ratio = calc.cvar_var_ratio(&returns, 0.95);
        assert!(ratio >= 1.0);
    }
}
