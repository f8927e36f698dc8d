//! Error types for risk analytics

use thiserror::Error;

/// Errors raised for structural misuse of the analytics API.
///
/// Purely numeric shortfalls (series too short, zero variance) never reach
/// this type; the statistics layer returns neutral sentinel values instead.
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Series length mismatch: {0}")]
    LengthMismatch(String),

    #[error("Invalid scenario '{name}': {reason}")]
    InvalidScenario { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RiskError>;
