//! # qk-strategies: Backtesting and Parameter Optimization
//!
//! This library backtests signal-driven trading strategies over historical
//! bars and tunes their parameters with grid search or a genetic algorithm.
//!
//! ## Core Components
//!
//! - **Strategy Trait**: the per-bar signal contract all strategies implement
//! - **BacktestEngine**: long-only single-position state machine
//! - **GridSearchOptimizer**: exhaustive Cartesian-product search
//! - **GeneticAlgorithmOptimizer**: evolutionary search over continuous ranges
//!
//! ## Example Usage
//!
//! ```rust
//! use qk_strategies::{BacktestEngine, Bar, Strategy, StrategySignal};
//!
//! /// Buys on the first bar and holds.
//! struct BuyAndHold {
//!     bought: bool,
//! }
//!
//! impl Strategy for BuyAndHold {
//!     fn analyze(&mut self, _symbol: &str, _bar: &Bar) -> StrategySignal {
//!         if self.bought {
//!             StrategySignal::hold()
//!         } else {
//!             self.bought = true;
//!             StrategySignal::buy(1.0)
//!         }
//!     }
//! }
//!
//! # let bars: Vec<Bar> = Vec::new();
//! let engine = BacktestEngine::default();
//! let mut strategy = BuyAndHold { bought: false };
//! let result = engine.run(&mut strategy, "BTC", &bars);
//! assert!(result.is_err()); // no bars supplied
//! ```

pub mod backtest;
pub mod error;
pub mod optimize;
pub mod types;

pub use backtest::{calculate_sharpe_ratio, BacktestConfig, BacktestEngine};
pub use error::{StrategyError, StrategyResult};
pub use optimize::{
    GeneticAlgorithmOptimizer, GeneticResult, GridSearchOptimizer, GridSearchResult, ParameterSet,
};
pub use types::{BacktestResult, BacktestTrade, Bar, Signal, StrategySignal, TradeSide};

/// Per-bar signal contract.
///
/// Implementations may keep internal state (indicator windows, position
/// awareness); the engine calls `analyze` once per bar in chronological
/// order.
pub trait Strategy: Send + Sync {
    fn analyze(&mut self, symbol: &str, bar: &Bar) -> StrategySignal;
}
