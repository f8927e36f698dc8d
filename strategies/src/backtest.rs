//! Backtesting engine
//!
//! A single-position long-only state machine: FLAT + Buy opens, LONG + Sell
//! closes, everything else is a no-op. The engine never re-validates bar
//! alignment; callers supply chronologically ordered bars.

use crate::error::{StrategyError, StrategyResult};
use crate::types::{BacktestResult, BacktestTrade, Bar, Signal, TradeSide};
use crate::Strategy;
use qk_risk::stats;
use serde::{Deserialize, Serialize};
use tracing::debug;

const TRADING_DAYS: f64 = 252.0;

/// Backtesting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Starting capital in USD
    pub initial_capital: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PositionState {
    Flat,
    Long { entry_price: f64 },
}

/// Signal-driven backtesting engine
#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// Run a backtest of `strategy` over `bars`.
    ///
    /// Entries are ignored while long and exits are ignored while flat, so
    /// at most one position is open at any time. A position still open at
    /// the last bar is valued at that bar's close without recording an exit
    /// trade.
    pub fn run(
        &self,
        strategy: &mut dyn Strategy,
        symbol: &str,
        bars: &[Bar],
    ) -> StrategyResult<BacktestResult> {
        if !(self.config.initial_capital > 0.0) {
            return Err(StrategyError::BacktestError(format!(
                "initial capital must be positive, got {}",
                self.config.initial_capital
            )));
        }
        if bars.is_empty() {
            return Err(StrategyError::InsufficientData(
                "no historical bars provided".to_string(),
            ));
        }

        let mut state = PositionState::Flat;
        let mut trades: Vec<BacktestTrade> = Vec::new();
        let mut final_value = self.config.initial_capital;

        for bar in bars {
            let signal = strategy.analyze(symbol, bar);
            match (state, signal.signal) {
                (PositionState::Flat, Signal::Buy) => {
                    debug!(symbol, price = bar.close, "opening position");
                    trades.push(BacktestTrade {
                        side: TradeSide::Buy,
                        price: bar.close,
                        date: bar.date,
                    });
                    state = PositionState::Long {
                        entry_price: bar.close,
                    };
                }
                (PositionState::Long { entry_price }, Signal::Sell) => {
                    debug!(symbol, price = bar.close, "closing position");
                    trades.push(BacktestTrade {
                        side: TradeSide::Sell,
                        price: bar.close,
                        date: bar.date,
                    });
                    final_value *= bar.close / entry_price;
                    state = PositionState::Flat;
                }
                // Buy while long, sell while flat, or hold
                _ => {}
            }
        }

        // Mark an unclosed position at the last close without an exit leg.
        if let PositionState::Long { entry_price } = state {
            let last_close = bars[bars.len() - 1].close;
            final_value *= last_close / entry_price;
        }

        let returns = final_value / self.config.initial_capital - 1.0;
        Ok(BacktestResult {
            symbol: symbol.to_string(),
            initial_capital: self.config.initial_capital,
            final_value,
            returns,
            returns_percent: returns * 100.0,
            total_trades: trades.len(),
            trades,
        })
    }
}

/// Annualized Sharpe ratio over realized round-trip returns.
///
/// Pairs each buy with the following sell; an unmatched trailing buy forms
/// no return. Returns 0.0 when fewer than two trade legs exist or the
/// per-pair returns have no spread.
pub fn calculate_sharpe_ratio(trades: &[BacktestTrade], risk_free_rate: f64) -> f64 {
    if trades.len() < 2 {
        return 0.0;
    }
    let mut pair_returns = Vec::new();
    let mut entry: Option<f64> = None;
    for trade in trades {
        match trade.side {
            TradeSide::Buy => {
                if entry.is_none() {
                    entry = Some(trade.price);
                }
            }
            TradeSide::Sell => {
                if let Some(entry_price) = entry.take() {
                    pair_returns.push(trade.price / entry_price - 1.0);
                }
            }
        }
    }
    let sd = stats::std_dev(&pair_returns);
    if pair_returns.len() < 2 || sd == 0.0 {
        return 0.0;
    }
    (stats::mean(&pair_returns) - risk_free_rate / TRADING_DAYS) / sd
}
