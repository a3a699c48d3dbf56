//! Error types and retry classification for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines whether a
/// caller should back off and retry or give up.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol is not listed by the exchange.
    /// This is a terminal error - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No trade occurred within the fully widened lookup window.
    /// The symbol exists but nothing was executed around the requested instant.
    #[error("No trades for {symbol} within {window_secs}s of the requested instant")]
    NoData { symbol: String, window_secs: u64 },

    /// No data available for the requested date range.
    #[error("No data for date range")]
    NoDataForRange,

    /// The exchange rate limited the request (HTTP 429 / -1003).
    /// Should retry with backoff.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    /// Should retry with backoff.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// Data validation failed.
    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            MarketDataError::SymbolNotFound(_)
            | MarketDataError::NoData { .. }
            | MarketDataError::NoDataForRange
            | MarketDataError::ValidationFailed { .. } => RetryClass::Never,
            MarketDataError::RateLimited { .. }
            | MarketDataError::Timeout { .. }
            | MarketDataError::Network(_) => RetryClass::WithBackoff,
            MarketDataError::ProviderError { .. } => RetryClass::Never,
        }
    }

    /// Whether this error means "the data does not exist" rather than
    /// "fetching it failed". Callers degrade these to null fields instead of
    /// aborting.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            MarketDataError::SymbolNotFound(_)
                | MarketDataError::NoData { .. }
                | MarketDataError::NoDataForRange
        )
    }
}

/// Classification for retry policy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol, missing data, or terminal failure.
    Never,

    /// Transient failure (rate limit, timeout, network); retry after
    /// sleeping, with the delay doubling between attempts.
    WithBackoff,
}
