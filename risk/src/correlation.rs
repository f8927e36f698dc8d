//! Correlation matrix and diversification analytics

use crate::stats::{self, CorrelationMethod};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Symmetric correlation matrix over a set of symbols.
///
/// The diagonal is forced to 1.0 regardless of the estimator; symbols are
/// held in sorted order so the layout is deterministic.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    symbols: Vec<String>,
    values: DMatrix<f64>,
}

/// Sign of a detected correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairDirection {
    Positive,
    Negative,
}

/// A symbol pair whose correlation magnitude crossed the detection threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelatedPair {
    pub symbol_a: String,
    pub symbol_b: String,
    pub correlation: f64,
    pub direction: PairDirection,
}

/// Qualitative diversification bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiversificationGrade {
    Excellent,
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

/// Diversification score with supporting pairwise statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversificationScore {
    pub score: f64,
    pub average_correlation: f64,
    pub min_correlation: f64,
    pub max_correlation: f64,
    pub interpretation: DiversificationGrade,
}

impl CorrelationMatrix {
    /// Builds the full symmetric matrix over per-symbol return series.
    /// Symbols with mismatched or short series correlate to 0.0 through the
    /// statistics layer's sentinels.
    pub fn calculate(
        returns_by_symbol: &HashMap<String, Vec<f64>>,
        method: CorrelationMethod,
    ) -> Self {
        let mut symbols: Vec<String> = returns_by_symbol.keys().cloned().collect();
        symbols.sort();
        let n = symbols.len();
        let mut values = DMatrix::identity(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                let corr = stats::correlation(
                    &returns_by_symbol[&symbols[i]],
                    &returns_by_symbol[&symbols[j]],
                    method,
                );
                values[(i, j)] = corr;
                values[(j, i)] = corr;
            }
        }
        Self { symbols, values }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Correlation between two symbols; None if either is unknown.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.values[(i, j)])
    }

    /// Elementwise sqrt(2·(1−corr)), clamped at zero before the root so
    /// rounding above 1.0 cannot produce NaN.
    pub fn to_distance_matrix(&self) -> DMatrix<f64> {
        self.values.map(|c| (2.0 * (1.0 - c)).max(0.0).sqrt())
    }

    /// Nested symbol→symbol→correlation map for serialization.
    pub fn to_nested_map(&self) -> HashMap<String, HashMap<String, f64>> {
        let mut outer = HashMap::new();
        for (i, a) in self.symbols.iter().enumerate() {
            let mut inner = HashMap::new();
            for (j, b) in self.symbols.iter().enumerate() {
                inner.insert(b.clone(), self.values[(i, j)]);
            }
            outer.insert(a.clone(), inner);
        }
        outer
    }
}

/// Windowed correlation: one value per window position, length
/// n − window + 1. Empty when the series is shorter than the window or the
/// window is degenerate.
pub fn rolling_correlation(
    x: &[f64],
    y: &[f64],
    window: usize,
    method: CorrelationMethod,
) -> Vec<f64> {
    if window == 0 || x.len() < window || x.len() != y.len() {
        return Vec::new();
    }
    (0..=x.len() - window)
        .map(|start| stats::correlation(&x[start..start + window], &y[start..start + window], method))
        .collect()
}

/// All unordered symbol pairs with |correlation| at or above `threshold`,
/// sorted by descending magnitude.
pub fn find_correlated_pairs(
    returns_by_symbol: &HashMap<String, Vec<f64>>,
    threshold: f64,
    method: CorrelationMethod,
) -> Vec<CorrelatedPair> {
    let matrix = CorrelationMatrix::calculate(returns_by_symbol, method);
    let symbols = matrix.symbols();
    let mut pairs = Vec::new();
    for i in 0..symbols.len() {
        for j in (i + 1)..symbols.len() {
            let corr = matrix.values()[(i, j)];
            if corr.abs() >= threshold {
                pairs.push(CorrelatedPair {
                    symbol_a: symbols[i].clone(),
                    symbol_b: symbols[j].clone(),
                    correlation: corr,
                    direction: if corr >= 0.0 {
                        PairDirection::Positive
                    } else {
                        PairDirection::Negative
                    },
                });
            }
        }
    }
    pairs.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs
}

/// Diversification score: 1 − |average pairwise correlation|, floored at 0.
/// A portfolio of fewer than two assets scores a perfect 1.0.
pub fn diversification_score(
    returns_by_symbol: &HashMap<String, Vec<f64>>,
    method: CorrelationMethod,
) -> DiversificationScore {
    let matrix = CorrelationMatrix::calculate(returns_by_symbol, method);
    let n = matrix.symbols().len();
    if n < 2 {
        return DiversificationScore {
            score: 1.0,
            average_correlation: 0.0,
            min_correlation: 0.0,
            max_correlation: 0.0,
            interpretation: DiversificationGrade::Excellent,
        };
    }
    let mut sum = 0.0;
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    let mut count = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            let corr = matrix.values()[(i, j)];
            sum += corr;
            min = min.min(corr);
            max = max.max(corr);
            count += 1;
        }
    }
    let average = sum / count as f64;
    let score = (1.0 - average.abs()).max(0.0);
    DiversificationScore {
        score,
        average_correlation: average,
        min_correlation: min,
        max_correlation: max,
        interpretation: grade(score),
    }
}

fn grade(score: f64) -> DiversificationGrade {
    if score >= 0.8 {
        DiversificationGrade::Excellent
    } else if score >= 0.6 {
        DiversificationGrade::Good
    } else if score >= 0.4 {
        DiversificationGrade::Moderate
    } else if score >= 0.2 {
        DiversificationGrade::Poor
    } else {
        DiversificationGrade::VeryPoor
    }
}
