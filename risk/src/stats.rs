//! Statistics primitives shared by every risk component
//!
//! All estimators are sample statistics (n−1 denominators). Series that are
//! too short to estimate (fewer than two observations) or of mismatched
//! lengths yield 0.0 rather than an error; callers must treat the sentinel
//! as "not computable", not as a valid reading. Centralizing the guards here
//! lets the higher layers (beta, analyzer) inherit safe defaults.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Correlation estimator selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
    Kendall,
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance (n−1); 0.0 for fewer than two observations.
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Sample covariance (n−1); 0.0 for short or mismatched series.
pub fn covariance(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 || x.len() != y.len() {
        return 0.0;
    }
    let mx = mean(x);
    let my = mean(y);
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / (x.len() - 1) as f64
}

/// Pearson product-moment correlation; 0.0 when either deviation is zero.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let denom = std_dev(x) * std_dev(y);
    if denom == 0.0 {
        return 0.0;
    }
    covariance(x, y) / denom
}

/// Spearman rank correlation: Pearson over rank-transformed series.
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 || x.len() != y.len() {
        return 0.0;
    }
    pearson(&rank(x), &rank(y))
}

/// Kendall's tau: (concordant − discordant) / C(n, 2) over all i<j pairs.
pub fn kendall(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 || n != y.len() {
        return 0.0;
    }
    let mut concordant = 0i64;
    let mut discordant = 0i64;
    for i in 0..n {
        for j in (i + 1)..n {
            let s = (x[i] - x[j]) * (y[i] - y[j]);
            if s > 0.0 {
                concordant += 1;
            } else if s < 0.0 {
                discordant += 1;
            }
        }
    }
    let pairs = (n * (n - 1) / 2) as f64;
    (concordant - discordant) as f64 / pairs
}

/// Correlation with an explicit estimator choice.
pub fn correlation(x: &[f64], y: &[f64], method: CorrelationMethod) -> f64 {
    match method {
        CorrelationMethod::Pearson => pearson(x, y),
        CorrelationMethod::Spearman => spearman(x, y),
        CorrelationMethod::Kendall => kendall(x, y),
    }
}

/// Rank transform: 1.0 for the largest value. Ties keep first-seen order
/// (stable descending sort), so equal values get distinct adjacent ranks.
fn rank(data: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| data[b].partial_cmp(&data[a]).unwrap_or(Ordering::Equal));
    let mut ranks = vec![0.0; data.len()];
    for (position, &index) in order.iter().enumerate() {
        ranks[index] = (position + 1) as f64;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_variance() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(mean(&data), 3.0);
        assert_relative_eq!(variance(&data), 2.5);
        assert_relative_eq!(std_dev(&data), 2.5_f64.sqrt());
    }

    #[test]
    fn test_short_series_are_neutral() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[1.0]), 0.0);
        assert_eq!(covariance(&[1.0], &[2.0]), 0.0);
        assert_eq!(covariance(&[1.0, 2.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(kendall(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_pearson_self_correlation() {
        let x = vec![0.01, -0.02, 0.03, 0.005, -0.01];
        assert_relative_eq!(pearson(&x, &x), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_perfect_inverse() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![4.0, 3.0, 2.0, 1.0];
        assert_relative_eq!(pearson(&x, &y), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_zero_variance() {
        let flat = vec![0.01; 10];
        let x = vec![0.01, -0.02, 0.03, 0.005, -0.01, 0.02, 0.0, 0.01, -0.03, 0.02];
        assert_eq!(pearson(&flat, &x), 0.0);
    }

    #[test]
    fn test_spearman_monotone_series() {
        // Monotone but non-linear: rank correlation is exactly 1.
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![1.0, 4.0, 9.0, 16.0, 25.0];
        assert_relative_eq!(spearman(&x, &y), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kendall_perfect_orders() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let up = vec![10.0, 20.0, 30.0, 40.0];
        let down = vec![40.0, 30.0, 20.0, 10.0];
        assert_relative_eq!(kendall(&x, &up), 1.0);
        assert_relative_eq!(kendall(&x, &down), -1.0);
    }

    #[test]
    fn test_rank_ties_keep_first_seen_order() {
        let ranks = rank(&[2.0, 3.0, 2.0]);
        assert_eq!(ranks, vec![2.0, 1.0, 3.0]);
    }
}
