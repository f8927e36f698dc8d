//! Error types for backtesting and optimization

use thiserror::Error;

/// Main error type for strategy operations
#[derive(Error, Debug)]
pub enum StrategyError {
    /// Invalid parameter or parameter range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Parameter name not present in a parameter set
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Not enough data to run the operation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Backtest execution failure
    #[error("Backtest error: {0}")]
    BacktestError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Convenience result type for strategy operations
pub type StrategyResult<T> = Result<T, StrategyError>;
