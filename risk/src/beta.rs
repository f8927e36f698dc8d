//! Beta, alpha and market-sensitivity analytics (CAPM)

use crate::stats;
use serde::{Deserialize, Serialize};

const TRADING_DAYS: f64 = 252.0;

/// Qualitative beta bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetaProfile {
    NegativeCorrelation,
    HighVolatility,
    MarketAligned,
    Defensive,
}

/// Qualitative alpha bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaProfile {
    StrongOutperformance,
    Outperformance,
    Underperformance,
    StrongUnderperformance,
}

/// Full CAPM decomposition of one asset against a market benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetaAnalysis {
    pub beta: f64,
    pub alpha: f64,
    pub r_squared: f64,
    pub systematic_risk: f64,
    pub unsystematic_risk: f64,
    pub beta_profile: BetaProfile,
    pub alpha_profile: AlphaProfile,
}

/// Up-market and down-market beta split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketTiming {
    pub up_beta: f64,
    pub down_beta: f64,
    /// up_beta − down_beta; positive indicates good timing
    pub timing_coefficient: f64,
}

/// CAPM calculator with an annual risk-free rate. Rates are converted to
/// a trading-day basis internally to match the periodic return series.
#[derive(Debug, Clone)]
pub struct BetaCalculator {
    risk_free_rate: f64,
}

impl BetaCalculator {
    pub fn new(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }

    fn period_risk_free(&self) -> f64 {
        self.risk_free_rate / TRADING_DAYS
    }

    /// cov(asset, market) / var(market); 0.0 on zero variance or short or
    /// mismatched series.
    pub fn beta(&self, asset: &[f64], market: &[f64]) -> f64 {
        let var = stats::variance(market);
        if var == 0.0 || asset.len() != market.len() {
            return 0.0;
        }
        stats::covariance(asset, market) / var
    }

    /// CAPM residual: mean(asset) − [rf + β·(mean(market) − rf)].
    pub fn alpha(&self, asset: &[f64], market: &[f64]) -> f64 {
        let beta = self.beta(asset, market);
        let rf = self.period_risk_free();
        stats::mean(asset) - (rf + beta * (stats::mean(market) - rf))
    }

    /// Squared Pearson correlation between asset and market.
    pub fn r_squared(&self, asset: &[f64], market: &[f64]) -> f64 {
        stats::pearson(asset, market).powi(2)
    }

    /// Aggregate decomposition: beta, alpha, r², systematic/unsystematic
    /// risk and the qualitative buckets.
    pub fn calculate(&self, asset: &[f64], market: &[f64]) -> BetaAnalysis {
        let beta = self.beta(asset, market);
        let alpha = self.alpha(asset, market);
        let systematic = beta * stats::std_dev(market);
        let total_var = stats::variance(asset);
        let unsystematic = (total_var - systematic.powi(2)).max(0.0).sqrt();
        BetaAnalysis {
            beta,
            alpha,
            r_squared: self.r_squared(asset, market),
            systematic_risk: systematic,
            unsystematic_risk: unsystematic,
            beta_profile: beta_profile(beta),
            alpha_profile: alpha_profile(alpha),
        }
    }

    /// Windowed beta, one value per window position.
    pub fn rolling_beta(&self, asset: &[f64], market: &[f64], window: usize) -> Vec<f64> {
        if window == 0 || asset.len() < window || asset.len() != market.len() {
            return Vec::new();
        }
        (0..=asset.len() - window)
            .map(|start| self.beta(&asset[start..start + window], &market[start..start + window]))
            .collect()
    }

    /// Windowed alpha, one value per window position.
    pub fn rolling_alpha(&self, asset: &[f64], market: &[f64], window: usize) -> Vec<f64> {
        if window == 0 || asset.len() < window || asset.len() != market.len() {
            return Vec::new();
        }
        (0..=asset.len() - window)
            .map(|start| self.alpha(&asset[start..start + window], &market[start..start + window]))
            .collect()
    }

    /// (mean(asset) − rf) / β; 0.0 when β is 0.
    pub fn treynor_ratio(&self, asset: &[f64], market: &[f64]) -> f64 {
        let beta = self.beta(asset, market);
        if beta == 0.0 {
            return 0.0;
        }
        (stats::mean(asset) - self.period_risk_free()) / beta
    }

    /// Splits periods at market_return >= 0 and computes beta within each
    /// subset independently.
    pub fn market_timing(&self, asset: &[f64], market: &[f64]) -> MarketTiming {
        let mut up_asset = Vec::new();
        let mut up_market = Vec::new();
        let mut down_asset = Vec::new();
        let mut down_market = Vec::new();
        for (&a, &m) in asset.iter().zip(market.iter()) {
            if m >= 0.0 {
                up_asset.push(a);
                up_market.push(m);
            } else {
                down_asset.push(a);
                down_market.push(m);
            }
        }
        let up_beta = self.beta(&up_asset, &up_market);
        let down_beta = self.beta(&down_asset, &down_market);
        MarketTiming {
            up_beta,
            down_beta,
            timing_coefficient: up_beta - down_beta,
        }
    }
}

fn beta_profile(beta: f64) -> BetaProfile {
    if beta < 0.0 {
        BetaProfile::NegativeCorrelation
    } else if beta > 1.2 {
        BetaProfile::HighVolatility
    } else if beta >= 0.8 {
        BetaProfile::MarketAligned
    } else {
        BetaProfile::Defensive
    }
}

fn alpha_profile(alpha: f64) -> AlphaProfile {
    if alpha > 0.05 {
        AlphaProfile::StrongOutperformance
    } else if alpha > 0.0 {
        AlphaProfile::Outperformance
    } else if alpha > -0.05 {
        AlphaProfile::Underperformance
    } else {
        AlphaProfile::StrongUnderperformance
    }
}
