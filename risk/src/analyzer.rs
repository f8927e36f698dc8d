//! Portfolio risk analyzer
//!
//! Orchestrates VaR, correlation, beta and performance analytics into a
//! single report, and offers scenario stress-testing and risk-contribution
//! attribution on the same portfolio representation.
//!
//! The numeric layers below fail soft; this boundary is where structural
//! misuse fails loud. `Portfolio::validate` runs before any analysis so the
//! weighted-sum synthesis never sees misaligned series.

use crate::beta::{BetaAnalysis, BetaCalculator};
use crate::correlation::{
    self, CorrelatedPair, CorrelationMatrix, DiversificationScore,
};
use crate::error::{Result, RiskError};
use crate::metrics::PerformanceMetrics;
use crate::stats::{self, CorrelationMethod};
use crate::var::{VarCalculator, VarConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One portfolio position: a return series and its portfolio weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub returns: Vec<f64>,
    /// Fraction of the portfolio in [0, 1]; weights are not renormalized
    pub weight: f64,
}

/// Portfolio composition keyed by symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    pub holdings: HashMap<String, Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_holding(&mut self, symbol: impl Into<String>, returns: Vec<f64>, weight: f64) {
        self.holdings
            .insert(symbol.into(), Holding { returns, weight });
    }

    /// Structural validation: at least one holding, no empty series, all
    /// series the same length.
    pub fn validate(&self) -> Result<()> {
        if self.holdings.is_empty() {
            return Err(RiskError::InsufficientData(
                "portfolio has no holdings".to_string(),
            ));
        }
        let mut expected: Option<(String, usize)> = None;
        for (symbol, holding) in &self.holdings {
            if holding.returns.is_empty() {
                return Err(RiskError::InsufficientData(format!(
                    "holding '{symbol}' has an empty return series"
                )));
            }
            match &expected {
                None => expected = Some((symbol.clone(), holding.returns.len())),
                Some((first, len)) if holding.returns.len() != *len => {
                    return Err(RiskError::LengthMismatch(format!(
                        "holding '{symbol}' has {} returns but '{first}' has {len}",
                        holding.returns.len()
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Weighted portfolio return per period. Assumes `validate` passed.
    pub fn weighted_returns(&self) -> Vec<f64> {
        let len = self
            .holdings
            .values()
            .map(|h| h.returns.len())
            .next()
            .unwrap_or(0);
        let mut combined = vec![0.0; len];
        for holding in self.holdings.values() {
            for (slot, &r) in combined.iter_mut().zip(holding.returns.iter()) {
                *slot += holding.weight * r;
            }
        }
        combined
    }

    fn returns_by_symbol(&self) -> HashMap<String, Vec<f64>> {
        self.holdings
            .iter()
            .map(|(symbol, holding)| (symbol.clone(), holding.returns.clone()))
            .collect()
    }
}

/// A named shock scenario: either a flat additive market shock or a
/// per-symbol shock map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenario {
    pub name: String,
    pub market_shock: Option<f64>,
    #[serde(default)]
    pub shocks: HashMap<String, f64>,
}

impl StressScenario {
    pub fn market(name: impl Into<String>, shock: f64) -> Self {
        Self {
            name: name.into(),
            market_shock: Some(shock),
            shocks: HashMap::new(),
        }
    }

    pub fn per_symbol(name: impl Into<String>, shocks: HashMap<String, f64>) -> Self {
        Self {
            name: name.into(),
            market_shock: None,
            shocks,
        }
    }
}

/// Analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Annual risk-free rate
    pub risk_free_rate: f64,
    pub confidence_level: f64,
    /// Threshold for correlated-pair detection
    pub correlation_threshold: f64,
    pub var: VarConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.02,
            confidence_level: 0.95,
            correlation_threshold: 0.7,
            var: VarConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarAnalysis {
    pub confidence_level: f64,
    pub historical_var: f64,
    pub parametric_var: f64,
    pub monte_carlo_var: f64,
    pub cvar: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub matrix: HashMap<String, HashMap<String, f64>>,
    pub diversification: DiversificationScore,
    pub correlated_pairs: Vec<CorrelatedPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub treynor_ratio: f64,
    pub information_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRating {
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub var_component: f64,
    pub diversification_component: f64,
    pub beta_component: f64,
    pub performance_component: f64,
}

/// Composite 0-100 risk score, lower is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    pub total: f64,
    pub breakdown: ScoreBreakdown,
    pub rating: RiskRating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    HighRisk,
    PoorDiversification,
    HighCorrelation,
    HighBeta,
    NegativeAlpha,
    LowSharpe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: Priority,
    pub message: String,
}

/// Full portfolio risk report, produced fresh per analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub var_analysis: VarAnalysis,
    pub correlation_analysis: CorrelationAnalysis,
    pub beta_analysis: BetaAnalysis,
    pub performance: PerformanceSummary,
    pub risk_score: RiskScore,
    pub recommendations: Vec<Recommendation>,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShockSeverity {
    Extreme,
    Severe,
    Moderate,
    Mild,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub var_95: f64,
    pub var_99: f64,
    pub expected_return: f64,
    /// Worst single-period portfolio loss under the scenario
    pub max_loss: f64,
    pub severity: ShockSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestReport {
    pub scenarios: Vec<ScenarioResult>,
    pub worst_scenario: String,
    /// Mean expected return across scenarios
    pub average_impact: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskContribution {
    pub symbol: String,
    pub weight: f64,
    pub marginal_var: f64,
    pub component_var: f64,
    pub contribution_pct: f64,
}

/// Portfolio risk analyzer over a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct RiskAnalyzer {
    config: AnalyzerConfig,
    var: VarCalculator,
}

impl RiskAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let var = VarCalculator::new(config.var.clone());
        Self { config, var }
    }

    /// Full portfolio analysis against a market benchmark series.
    pub fn analyze_portfolio(
        &self,
        portfolio: &Portfolio,
        market_returns: &[f64],
    ) -> Result<RiskReport> {
        portfolio.validate()?;
        let portfolio_returns = portfolio.weighted_returns();
        if market_returns.len() != portfolio_returns.len() {
            return Err(RiskError::LengthMismatch(format!(
                "market series has {} returns but portfolio has {}",
                market_returns.len(),
                portfolio_returns.len()
            )));
        }

        let confidence = self.config.confidence_level;
        let var_analysis = VarAnalysis {
            confidence_level: confidence,
            historical_var: self.var.historical_var(&portfolio_returns, confidence),
            parametric_var: self.var.parametric_var(&portfolio_returns, confidence),
            monte_carlo_var: self.var.monte_carlo_var(&portfolio_returns, confidence),
            cvar: self.var.historical_cvar(&portfolio_returns, confidence),
        };

        let returns_by_symbol = portfolio.returns_by_symbol();
        let matrix = CorrelationMatrix::calculate(&returns_by_symbol, CorrelationMethod::Pearson);
        let correlation_analysis = CorrelationAnalysis {
            matrix: matrix.to_nested_map(),
            diversification: correlation::diversification_score(
                &returns_by_symbol,
                CorrelationMethod::Pearson,
            ),
            correlated_pairs: correlation::find_correlated_pairs(
                &returns_by_symbol,
                self.config.correlation_threshold,
                CorrelationMethod::Pearson,
            ),
        };

        let beta_calc = BetaCalculator::new(self.config.risk_free_rate);
        let beta_analysis = beta_calc.calculate(&portfolio_returns, market_returns);

        let metrics =
            PerformanceMetrics::new(portfolio_returns.clone(), self.config.risk_free_rate);
        let performance = PerformanceSummary {
            sharpe_ratio: metrics.sharpe_ratio(),
            sortino_ratio: metrics.sortino_ratio(0.0),
            treynor_ratio: beta_calc.treynor_ratio(&portfolio_returns, market_returns),
            information_ratio: metrics.information_ratio(market_returns),
        };

        let risk_score = score(
            var_analysis.historical_var,
            correlation_analysis.diversification.score,
            beta_analysis.beta,
            performance.sharpe_ratio,
        );
        let recommendations = recommend(
            &var_analysis,
            &correlation_analysis,
            &beta_analysis,
            &performance,
        );
        let summary = summarize(risk_score.rating, risk_score.total);

        Ok(RiskReport {
            var_analysis,
            correlation_analysis,
            beta_analysis,
            performance,
            risk_score,
            recommendations,
            summary,
            generated_at: Utc::now(),
        })
    }

    /// Applies each scenario's additive shock to the per-symbol series,
    /// recomputes the weighted portfolio returns and reports tail metrics.
    pub fn stress_test(
        &self,
        portfolio: &Portfolio,
        scenarios: &[StressScenario],
    ) -> Result<StressTestReport> {
        portfolio.validate()?;
        if scenarios.is_empty() {
            return Err(RiskError::InvalidParameter(
                "no stress scenarios provided".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            if scenario.market_shock.is_none() && scenario.shocks.is_empty() {
                return Err(RiskError::InvalidScenario {
                    name: scenario.name.clone(),
                    reason: "defines neither a market shock nor per-symbol shocks".to_string(),
                });
            }
            let mut shocked = Portfolio::new();
            for (symbol, holding) in &portfolio.holdings {
                let shock = scenario
                    .shocks
                    .get(symbol)
                    .copied()
                    .or(scenario.market_shock)
                    .unwrap_or(0.0);
                let returns: Vec<f64> = holding.returns.iter().map(|r| r + shock).collect();
                shocked.add_holding(symbol.clone(), returns, holding.weight);
            }
            let returns = shocked.weighted_returns();
            let max_loss = -returns.iter().copied().fold(f64::MAX, f64::min);
            results.push(ScenarioResult {
                name: scenario.name.clone(),
                var_95: self.var.historical_var(&returns, 0.95),
                var_99: self.var.historical_var(&returns, 0.99),
                expected_return: stats::mean(&returns),
                max_loss,
                severity: severity(max_loss),
            });
        }

        let worst_scenario = results
            .iter()
            .max_by(|a, b| {
                a.max_loss
                    .partial_cmp(&b.max_loss)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|r| r.name.clone())
            .unwrap_or_default();
        let average_impact =
            results.iter().map(|r| r.expected_return).sum::<f64>() / results.len() as f64;

        Ok(StressTestReport {
            scenarios: results,
            worst_scenario,
            average_impact,
        })
    }

    /// Per-asset VaR attribution, ranked by descending contribution.
    ///
    /// Marginal VaR uses the Euler decomposition
    /// corr(asset, portfolio)·σ_asset, so with fully-invested weights the
    /// contribution percentages sum to 100.
    pub fn risk_contribution(&self, portfolio: &Portfolio) -> Result<Vec<RiskContribution>> {
        portfolio.validate()?;
        let portfolio_returns = portfolio.weighted_returns();
        let portfolio_vol = stats::std_dev(&portfolio_returns);
        let mut contributions: Vec<RiskContribution> = portfolio
            .holdings
            .iter()
            .map(|(symbol, holding)| {
                let marginal = stats::pearson(&holding.returns, &portfolio_returns)
                    * stats::std_dev(&holding.returns);
                let component = holding.weight * marginal;
                let pct = if portfolio_vol == 0.0 {
                    0.0
                } else {
                    component / portfolio_vol * 100.0
                };
                RiskContribution {
                    symbol: symbol.clone(),
                    weight: holding.weight,
                    marginal_var: marginal,
                    component_var: component,
                    contribution_pct: pct,
                }
            })
            .collect();
        contributions.sort_by(|a, b| {
            b.contribution_pct
                .partial_cmp(&a.contribution_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(contributions)
    }
}

fn score(historical_var: f64, diversification: f64, beta: f64, sharpe: f64) -> RiskScore {
    let breakdown = ScoreBreakdown {
        var_component: (historical_var * 100.0 * 2.5).min(25.0),
        diversification_component: (1.0 - diversification) * 25.0,
        beta_component: ((beta - 1.0).abs() * 25.0).min(25.0),
        performance_component: (25.0 - sharpe * 10.0).clamp(0.0, 25.0),
    };
    let total = (breakdown.var_component
        + breakdown.diversification_component
        + breakdown.beta_component
        + breakdown.performance_component)
        .min(100.0);
    let rating = if total < 30.0 {
        RiskRating::Low
    } else if total < 50.0 {
        RiskRating::Moderate
    } else if total < 70.0 {
        RiskRating::High
    } else {
        RiskRating::VeryHigh
    };
    RiskScore {
        total,
        breakdown,
        rating,
    }
}

fn recommend(
    var: &VarAnalysis,
    correlation: &CorrelationAnalysis,
    beta: &BetaAnalysis,
    performance: &PerformanceSummary,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    if var.historical_var > 0.15 {
        recs.push(Recommendation {
            kind: RecommendationType::HighRisk,
            priority: Priority::High,
            message: format!(
                "Historical VaR of {:.1}% exceeds 15%; consider reducing position sizes",
                var.historical_var * 100.0
            ),
        });
    }
    if correlation.diversification.score < 0.5 {
        recs.push(Recommendation {
            kind: RecommendationType::PoorDiversification,
            priority: Priority::Medium,
            message: format!(
                "Diversification score {:.2} is low; add less-correlated assets",
                correlation.diversification.score
            ),
        });
    }
    for pair in &correlation.correlated_pairs {
        if pair.correlation.abs() > 0.85 {
            recs.push(Recommendation {
                kind: RecommendationType::HighCorrelation,
                priority: Priority::Low,
                message: format!(
                    "{} and {} are highly correlated ({:.2})",
                    pair.symbol_a, pair.symbol_b, pair.correlation
                ),
            });
        }
    }
    if beta.beta > 1.5 {
        recs.push(Recommendation {
            kind: RecommendationType::HighBeta,
            priority: Priority::Medium,
            message: format!(
                "Portfolio beta {:.2} amplifies market moves; consider defensive assets",
                beta.beta
            ),
        });
    }
    if beta.alpha < -0.02 {
        recs.push(Recommendation {
            kind: RecommendationType::NegativeAlpha,
            priority: Priority::High,
            message: format!(
                "Negative alpha {:.3}; the portfolio underperforms its market exposure",
                beta.alpha
            ),
        });
    }
    if performance.sharpe_ratio < 0.5 {
        recs.push(Recommendation {
            kind: RecommendationType::LowSharpe,
            priority: Priority::Medium,
            message: format!(
                "Sharpe ratio {:.2} indicates weak risk-adjusted returns",
                performance.sharpe_ratio
            ),
        });
    }
    recs
}

fn summarize(rating: RiskRating, total: f64) -> String {
    let text = match rating {
        RiskRating::Low => "Portfolio risk is low; current allocation looks sustainable",
        RiskRating::Moderate => "Portfolio risk is moderate; monitor concentration and beta",
        RiskRating::High => "Portfolio risk is high; rebalancing is advisable",
        RiskRating::VeryHigh => "Portfolio risk is very high; immediate de-risking is advisable",
    };
    format!("{text} (risk score {total:.0}/100)")
}

fn severity(max_loss: f64) -> ShockSeverity {
    if max_loss > 0.30 {
        ShockSeverity::Extreme
    } else if max_loss > 0.20 {
        ShockSeverity::Severe
    } else if max_loss > 0.10 {
        ShockSeverity::Moderate
    } else {
        ShockSeverity::Mild
    }
}
