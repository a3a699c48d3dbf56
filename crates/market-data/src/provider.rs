//! Provider contracts implemented by concrete exchange clients.
//!
//! The reconciliation core consumes these traits; it never talks to an
//! exchange directly. Implementations live outside this workspace.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::errors::MarketDataError;
use crate::models::{DailyClose, TradeTick};

/// Raw trade-history lookup, the primitive under point-in-time price
/// resolution.
#[async_trait]
pub trait TradeLookupProvider: Send + Sync {
    /// Returns trades executed on `symbol` within `[start, end)`, oldest
    /// first. An empty vec means nothing traded in the window; that is not
    /// an error at this layer.
    async fn trades_between(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TradeTick>, MarketDataError>;
}

/// Daily closing-price series source. Gaps in the returned series are
/// tolerated by consumers.
#[async_trait]
pub trait DailyCloseProvider: Send + Sync {
    async fn daily_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
    ) -> Result<Vec<DailyClose>, MarketDataError>;
}

/// Latest ticker prices, keyed by base asset, quoted in the reference
/// currency. Assets the exchange does not list are simply absent from the
/// map.
#[async_trait]
pub trait TickerProvider: Send + Sync {
    async fn current_prices(
        &self,
        assets: &[String],
    ) -> Result<HashMap<String, Decimal>, MarketDataError>;
}
