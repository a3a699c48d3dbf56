//! Point-in-time price resolution over a raw trade-history provider.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::provider::TradeLookupProvider;

/// Initial lookup window, in seconds.
const INITIAL_WINDOW_SECS: i64 = 1;

/// Hard cap on the widened lookup window, in seconds. Past this the symbol
/// is considered to have no usable price at the requested instant.
const MAX_WINDOW_SECS: i64 = 300;

/// Resolves the market price of a symbol at an arbitrary instant by
/// scanning executed trades in a window starting at that instant.
///
/// Thinly traded symbols may have no trade for seconds or minutes after the
/// requested instant, so the window is widened geometrically (doubling from
/// one second) until a trade is found or the cap is reached.
pub struct PriceAtResolver {
    trades: Arc<dyn TradeLookupProvider>,
}

impl PriceAtResolver {
    pub fn new(trades: Arc<dyn TradeLookupProvider>) -> Self {
        Self { trades }
    }

    /// Market price of `symbol` at `timestamp`: the price of the first
    /// trade found in the widening window.
    ///
    /// Returns [`MarketDataError::NoData`] when the fully widened window
    /// stays empty.
    pub async fn price_at(
        &self,
        symbol: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Decimal, MarketDataError> {
        let mut window_secs = INITIAL_WINDOW_SECS;
        loop {
            let end = timestamp + Duration::seconds(window_secs);
            let ticks = self.trades.trades_between(symbol, timestamp, end).await?;
            if let Some(first) = ticks.first() {
                if window_secs > INITIAL_WINDOW_SECS {
                    debug!(symbol, window_secs, "price resolved after widening");
                }
                return Ok(first.price);
            }
            if window_secs >= MAX_WINDOW_SECS {
                warn!(
                    symbol,
                    window_secs, "no trades within the capped lookup window"
                );
                return Err(MarketDataError::NoData {
                    symbol: symbol.to_string(),
                    window_secs: window_secs as u64,
                });
            }
            window_secs = (window_secs * 2).min(MAX_WINDOW_SECS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeTick;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Returns a tick only once the window has grown to `min_window_secs`;
    /// records every requested window.
    struct SparseTrades {
        min_window_secs: i64,
        windows: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl TradeLookupProvider for SparseTrades {
        async fn trades_between(
            &self,
            symbol: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<TradeTick>, MarketDataError> {
            let window = (end - start).num_seconds();
            self.windows.lock().unwrap().push(window);
            if window >= self.min_window_secs {
                Ok(vec![TradeTick {
                    symbol: symbol.to_string(),
                    price: dec!(101.5),
                    quantity: dec!(1),
                    timestamp: start,
                }])
            } else {
                Ok(vec![])
            }
        }
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn widens_geometrically_until_a_trade_appears() {
        let trades = Arc::new(SparseTrades {
            min_window_secs: 8,
            windows: Mutex::new(Vec::new()),
        });
        let resolver = PriceAtResolver::new(trades.clone());

        let price = resolver.price_at("LTCUSDT", instant()).await.unwrap();
        assert_eq!(price, dec!(101.5));
        assert_eq!(*trades.windows.lock().unwrap(), vec![1, 2, 4, 8]);
    }

    #[tokio::test]
    async fn gives_up_with_no_data_past_the_cap() {
        let trades = Arc::new(SparseTrades {
            min_window_secs: i64::MAX,
            windows: Mutex::new(Vec::new()),
        });
        let resolver = PriceAtResolver::new(trades.clone());

        let err = resolver.price_at("DEADUSDT", instant()).await.unwrap_err();
        match err {
            MarketDataError::NoData {
                symbol,
                window_secs,
            } => {
                assert_eq!(symbol, "DEADUSDT");
                assert_eq!(window_secs, 300);
            }
            other => panic!("expected NoData, got {other:?}"),
        }
        // 1, 2, 4, ..., 256, then clamped to the 300s cap.
        let windows = trades.windows.lock().unwrap();
        assert_eq!(windows.last(), Some(&300));
        assert_eq!(windows.len(), 10);
    }
}
