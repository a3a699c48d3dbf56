use rust_decimal::Decimal;
use serde::Serialize;

/// One asset's row in the portfolio summary table.
///
/// Valuation fields are `None` when the exchange lists no current price
/// for the asset - the row is kept rather than dropped so a report can
/// show which assets went unvalued.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRow {
    pub base_asset: String,
    pub quote_asset: String,
    pub average_price: Option<Decimal>,
    pub current_price: Option<Decimal>,
    /// Unrealized P&L per unit against the pooled average price.
    pub price_change_abs: Option<Decimal>,
    pub price_change_pct: Option<Decimal>,
    pub holding_qty: Decimal,
    /// Current reference-currency value of the held quantity.
    pub holding_value: Option<Decimal>,
    /// Share of the portfolio's total holding value, in percent.
    pub weight_pct: Option<Decimal>,
    pub purchase_count: usize,
    pub sale_count: usize,
}
