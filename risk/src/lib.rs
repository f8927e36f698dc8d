//! # qk-risk: Portfolio Risk Analytics
//!
//! Value-at-Risk, correlation, beta and stress-testing analytics over
//! in-memory return series. Everything is a pure computation: no I/O, no
//! shared state, safe to call concurrently on disjoint inputs.
//!
//! ## Core Components
//!
//! - **VarCalculator**: historical, parametric and Monte Carlo VaR/CVaR
//! - **CorrelationMatrix**: pairwise correlation, diversification scoring
//! - **BetaCalculator**: CAPM beta/alpha, risk decomposition, market timing
//! - **RiskAnalyzer**: full portfolio report with risk score and
//!   recommendations, plus scenario stress tests and VaR attribution
//! - **StressTester**: standalone crash and volatility-spike scenarios
//!
//! ## Example Usage
//!
//! ```rust
//! use qk_risk::{AnalyzerConfig, Portfolio, RiskAnalyzer};
//!
//! let mut portfolio = Portfolio::new();
//! portfolio.add_holding("BTC", vec![0.01, 0.02, -0.01, 0.015], 0.6);
//! portfolio.add_holding("GOLD", vec![0.002, -0.001, 0.003, 0.001], 0.4);
//!
//! let market = vec![0.008, 0.015, -0.008, 0.012];
//! let analyzer = RiskAnalyzer::new(AnalyzerConfig::default());
//! let report = analyzer.analyze_portfolio(&portfolio, &market).unwrap();
//! assert!(report.risk_score.total <= 100.0);
//! ```

pub mod analyzer;
pub mod beta;
pub mod correlation;
pub mod error;
pub mod metrics;
pub mod stats;
pub mod stress;
pub mod var;

pub use analyzer::{
    AnalyzerConfig, Holding, Portfolio, Recommendation, RiskAnalyzer, RiskContribution,
    RiskRating, RiskReport, RiskScore, ScenarioResult, StressScenario, StressTestReport,
};
pub use beta::{BetaAnalysis, BetaCalculator, MarketTiming};
pub use correlation::{
    find_correlated_pairs, diversification_score, rolling_correlation, CorrelatedPair,
    CorrelationMatrix, DiversificationScore,
};
pub use error::{Result, RiskError};
pub use metrics::{calmar_ratio, max_drawdown, PerformanceMetrics};
pub use stats::CorrelationMethod;
pub use stress::{CrashImpact, ScenarioSuite, StressTester};
pub use var::{VarCalculator, VarConfig};
