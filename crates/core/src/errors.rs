//! Error types

use thiserror::Error;

use crate::{AssetSymbol, ExchangeId};

/// Exchange adapter errors
///
/// A failed fetch never yields a `Quote`; the coordinator records one of these instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("{exchange} does not list {asset}")]
    UnsupportedAsset {
        exchange: ExchangeId,
        asset: AssetSymbol,
    },

    #[error("fetch task failed: {0}")]
    TaskFailed(String),
}

impl AdapterError {
    /// Short machine-readable kind, used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::Transport(_) => "transport",
            AdapterError::Parse(_) => "parse",
            AdapterError::Validation(_) => "validation",
            AdapterError::UnsupportedAsset { .. } => "unsupported_asset",
            AdapterError::TaskFailed(_) => "task_failed",
        }
    }
}

/// Aggregation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("no liquidity reported for {asset}")]
    NoLiquidity { asset: AssetSymbol },

    #[error("{asset} figures overflow decimal range")]
    Overflow { asset: AssetSymbol },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias
pub type AdapterResult<T> = Result<T, AdapterError>;
pub type AggregationResult<T> = Result<T, AggregationError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
