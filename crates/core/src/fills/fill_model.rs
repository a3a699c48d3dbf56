use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side as reported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

/// Order type. Market orders carry no explicit execution price in the raw
/// record; the normalizer backfills it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
    StopLossLimit,
    TakeProfitLimit,
}

/// Order status. Only `Filled` records participate in reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Filled,
    New,
    PartiallyFilled,
    Canceled,
    Rejected,
    Expired,
}

/// One trade record from an exchange order.
///
/// Fills are immutable inputs, fetched once per run; everything downstream
/// is derived from them. For a FILLED fill, `price > 0`,
/// `executed_qty >= 0` and `quote_qty >= 0` hold after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub order_id: i64,
    pub base_asset: String,
    pub quote_asset: String,
    pub side: Side,
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Execution price in quote-asset terms.
    pub price: Decimal,
    /// Quantity of the base asset exchanged.
    pub executed_qty: Decimal,
    /// Notional proceeds/cost in quote-asset terms.
    pub quote_qty: Decimal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    /// The trading-pair symbol, exchange style (`BTCUSDT`).
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base_asset, self.quote_asset)
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Signed reference-currency cash paid in by this fill: positive for a
    /// purchase, negative for a sale's proceeds.
    pub fn cash_transfer(&self) -> Decimal {
        match self.side {
            Side::Buy => self.quote_qty,
            Side::Sell => -self.quote_qty,
        }
    }

    /// Signed base-asset quantity acquired by this fill.
    pub fn coin_transfer(&self) -> Decimal {
        match self.side {
            Side::Buy => self.executed_qty,
            Side::Sell => -self.executed_qty,
        }
    }
}

/// Groups normalized fills by base asset, preserving the order of fills
/// within each group.
pub fn group_fills_by_base_asset(fills: Vec<Fill>) -> BTreeMap<String, Vec<Fill>> {
    let mut groups: BTreeMap<String, Vec<Fill>> = BTreeMap::new();
    for fill in fills {
        groups.entry(fill.base_asset.clone()).or_default().push(fill);
    }
    groups
}
