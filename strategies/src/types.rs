//! Core types for the backtesting framework

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One historical OHLCV bar. Bar sequences fed to the engine are assumed to
/// be in ascending chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Trading signal emitted by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
            Signal::Hold => write!(f, "Hold"),
        }
    }
}

/// Signal plus the strategy's confidence in it, in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrategySignal {
    pub signal: Signal,
    pub confidence: f64,
}

impl StrategySignal {
    pub fn buy(confidence: f64) -> Self {
        Self {
            signal: Signal::Buy,
            confidence,
        }
    }

    pub fn sell(confidence: f64) -> Self {
        Self {
            signal: Signal::Sell,
            confidence,
        }
    }

    pub fn hold() -> Self {
        Self {
            signal: Signal::Hold,
            confidence: 0.0,
        }
    }
}

/// Trade side recorded during a backtest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// One executed trade leg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestTrade {
    pub side: TradeSide,
    pub price: f64,
    pub date: DateTime<Utc>,
}

/// Outcome of a single backtest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub initial_capital: f64,
    pub final_value: f64,
    /// Fractional return, final_value / initial_capital - 1
    pub returns: f64,
    pub returns_percent: f64,
    pub trades: Vec<BacktestTrade>,
    /// Counts both legs of every round trip
    pub total_trades: usize,
}
