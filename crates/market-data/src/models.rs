//! Domain models for exchange market data.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One executed trade on a symbol, as returned by an aggregate-trades lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeTick {
    pub symbol: String,
    pub price: Decimal,
    pub quantity: Decimal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Daily closing price for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyClose {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: Decimal,
}

/// Latest ticker price for a trading pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickerPrice {
    pub base_asset: String,
    pub quote_asset: String,
    pub price: Decimal,
}
