use async_trait::async_trait;

use coinfolio_market_data::MarketDataError;

use crate::fills::Fill;

/// Source of raw trade records for one account.
///
/// Implementations may return fewer records after exchange-side rate
/// limiting, but must never silently omit records mid-range; callers retry
/// transient failures with backoff.
#[async_trait]
pub trait FillSource: Send + Sync {
    /// Fetches all raw fills for the given (base, quote) currency pairs.
    async fn fetch_fills(
        &self,
        pairs: &[(String, String)],
    ) -> Result<Vec<Fill>, MarketDataError>;
}
