//! Risk-adjusted performance metrics
//!
//! - Sharpe Ratio: excess mean return over total volatility
//! - Sortino Ratio: excess mean return over downside deviation
//! - Maximum Drawdown: largest peak-to-trough decline
//! - Calmar Ratio: annualized return over maximum drawdown
//!
//! Ratios are per-period (the annual risk-free rate is converted to a
//! trading-day rate internally). All metrics fail soft to 0.0 on empty
//! input or a zero denominator.

use crate::stats;
use serde::{Deserialize, Serialize};

const TRADING_DAYS: f64 = 252.0;

/// Performance metrics calculator over one return series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Periodic returns, chronological order
    returns: Vec<f64>,

    /// Risk-free rate (annualized)
    risk_free_rate: f64,
}

impl PerformanceMetrics {
    pub fn new(returns: Vec<f64>, risk_free_rate: f64) -> Self {
        Self {
            returns,
            risk_free_rate,
        }
    }

    fn period_risk_free(&self) -> f64 {
        self.risk_free_rate / TRADING_DAYS
    }

    /// (mean − period risk-free) / σ; 0.0 when σ is zero or the series is
    /// empty.
    pub fn sharpe_ratio(&self) -> f64 {
        let sd = stats::std_dev(&self.returns);
        if self.returns.is_empty() || sd == 0.0 {
            return 0.0;
        }
        (stats::mean(&self.returns) - self.period_risk_free()) / sd
    }

    /// Sharpe with downside deviation below `target` as the denominator.
    pub fn sortino_ratio(&self, target: f64) -> f64 {
        let dd = self.downside_deviation(target);
        if self.returns.is_empty() || dd == 0.0 {
            return 0.0;
        }
        (stats::mean(&self.returns) - self.period_risk_free()) / dd
    }

    /// RMS of shortfalls below `target`. Squared shortfalls are divided by
    /// the total observation count, not the shortfall count.
    pub fn downside_deviation(&self, target: f64) -> f64 {
        if self.returns.len() < 2 {
            return 0.0;
        }
        let sum_sq: f64 = self
            .returns
            .iter()
            .filter(|&&r| r < target)
            .map(|&r| (r - target).powi(2))
            .sum();
        (sum_sq / self.returns.len() as f64).sqrt()
    }

    /// mean(asset − market) / σ(asset − market); 0.0 on mismatch or zero σ.
    pub fn information_ratio(&self, market: &[f64]) -> f64 {
        if self.returns.is_empty() || self.returns.len() != market.len() {
            return 0.0;
        }
        let excess: Vec<f64> = self
            .returns
            .iter()
            .zip(market.iter())
            .map(|(a, m)| a - m)
            .collect();
        let sd = stats::std_dev(&excess);
        if sd == 0.0 {
            return 0.0;
        }
        stats::mean(&excess) / sd
    }
}

/// Maximum observed drawdown over a cumulative value series.
///
/// Tracks the running peak; drawdown = (peak − value) / peak. Returns 0.0
/// for an empty series or one that never declines.
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0;
    for &value in cumulative {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Annualized mean return (×252) over maximum drawdown; 0.0 when the
/// drawdown is zero or either input is empty.
pub fn calmar_ratio(returns: &[f64], cumulative: &[f64]) -> f64 {
    if returns.is_empty() || cumulative.is_empty() {
        return 0.0;
    }
    let dd = max_drawdown(cumulative);
    if dd == 0.0 {
        return 0.0;
    }
    stats::mean(returns) * TRADING_DAYS / dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_returns() -> Vec<f64> {
        vec![
            0.01, 0.02, -0.01, 0.015, -0.005, 0.03, -0.02, 0.01, 0.005, -0.01, 0.02, 0.01, -0.015,
            0.025, 0.01, -0.005, 0.015, 0.02, -0.01, 0.005,
        ]
    }

    #[test]
    fn test_sharpe_ratio_positive() {
        let metrics = PerformanceMetrics::new(create_test_returns(), 0.02);
        assert!(metrics.sharpe_ratio() > 0.0);
    }

    #[test]
    fn test_sharpe_ratio_zero_volatility() {
        let metrics = PerformanceMetrics::new(vec![0.01; 20], 0.02);
        assert_eq!(metrics.sharpe_ratio(), 0.0);
        let empty = PerformanceMetrics::new(vec![], 0.02);
        assert_eq!(empty.sharpe_ratio(), 0.0);
    }

    #[test]
    fn test_sortino_at_least_sharpe_for_mixed_returns() {
        let metrics = PerformanceMetrics::new(create_test_returns(), 0.02);
        let sortino = metrics.sortino_ratio(0.0);
        assert!(sortino > 0.0);
        assert!(sortino >= metrics.sharpe_ratio());
    }

    #[test]
    fn test_downside_deviation_uses_total_count() {
        // Shortfalls below 0: -0.02 and -0.04; divided by all 4 observations.
        let metrics = PerformanceMetrics::new(vec![0.02, -0.02, 0.03, -0.04], 0.0);
        let expected = ((0.02_f64.powi(2) + 0.04_f64.powi(2)) / 4.0).sqrt();
        assert_relative_eq!(metrics.downside_deviation(0.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_downside_deviation_all_above_target() {
        let metrics = PerformanceMetrics::new(vec![0.01, 0.02, 0.03], 0.02);
        assert_eq!(metrics.downside_deviation(0.0), 0.0);
        assert_eq!(metrics.sortino_ratio(0.0), 0.0);
    }

    #[test]
    fn test_max_drawdown() {
        // Peak at 1.15, trough at 0.92: drawdown = 0.23/1.15 = 0.2
        let cumulative = vec![1.0, 1.10, 1.15, 0.95, 0.92, 1.05];
        assert_relative_eq!(max_drawdown(&cumulative), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_max_drawdown_monotone_and_empty() {
        assert_eq!(max_drawdown(&[1.0, 1.1, 1.2]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_calmar_ratio() {
        let returns = vec![0.01, -0.05, 0.02, 0.01];
        let cumulative = vec![1.01, 0.9595, 0.9787, 0.9885];
        let expected = stats::mean(&returns) * 252.0 / max_drawdown(&cumulative);
        assert_relative_eq!(calmar_ratio(&returns, &cumulative), expected);
    }

    #[test]
    fn test_calmar_ratio_zero_drawdown() {
        assert_eq!(calmar_ratio(&[0.01, 0.02], &[1.01, 1.03]), 0.0);
        assert_eq!(calmar_ratio(&[], &[]), 0.0);
    }

    #[test]
    fn test_information_ratio() {
        let asset = vec![0.02, 0.01, 0.03, 0.00];
        let market = vec![0.01, 0.01, 0.02, 0.01];
        let metrics = PerformanceMetrics::new(asset, 0.02);
        assert!(metrics.information_ratio(&market).is_finite());
        assert_eq!(metrics.information_ratio(&[0.01]), 0.0);
    }
}
