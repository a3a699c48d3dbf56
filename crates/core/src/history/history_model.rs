use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One day of an asset's cumulative cash flow and holdings value,
/// produced by resampling the fill stream to a contiguous daily calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHistoryPoint {
    pub date: NaiveDate,
    /// Net reference-currency cash paid in over all fills so far.
    pub cash_in_cum: Decimal,
    /// Base-asset quantity held after all fills so far.
    pub coin_qty_cum: Decimal,
    /// Holdings value at the day's close; `None` when no close is listed
    /// for the day.
    pub coin_value: Option<Decimal>,
}

/// One day of portfolio-wide cumulative cash flow and holdings value,
/// summed across every asset's daily series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHistoryPoint {
    pub date: NaiveDate,
    pub cash_in_cum: Decimal,
    pub coin_value: Decimal,
}
