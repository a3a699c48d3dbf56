//! Core error types for the Coinfolio reconciliation engine.
//!
//! Structural errors (a malformed asset group, an impossible sale) abort
//! one asset's pipeline and are surfaced to the caller; data-availability
//! errors never reach this module - they degrade to null fields at the
//! point of use.

use chrono::{DateTime, ParseError as ChronoParseError, Utc};
use thiserror::Error;

use coinfolio_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the reconciliation engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Dump store operation failed: {0}")]
    Store(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors that occur while reconciling one asset group's fill sequence.
///
/// Both variants are fatal to the affected asset only; sibling asset groups
/// keep their results.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// After normalization every fill in a base-asset group must share one
    /// quote asset; the pooled average price is meaningless otherwise.
    #[error("can calculate average purchase price only with a single quote asset, but for {base_asset} there are several: {quote_assets:?}")]
    SchemaViolation {
        base_asset: String,
        quote_assets: Vec<String>,
    },

    /// A sale with nothing left to sell: the trade history is missing
    /// earlier purchases.
    #[error("no {base_asset} available for selling at {timestamp}; looks like not all orders are listed")]
    InsufficientBalance {
        base_asset: String,
        timestamp: DateTime<Utc>,
    },
}

/// Validation errors for input parsing at ingestion boundaries.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
