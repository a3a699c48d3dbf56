//! Portfolio summary assembly.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::REFERENCE_ASSET;
use crate::reconcile::Reconciliation;
use crate::summary::PortfolioRow;

/// Builds the summary table from per-asset reconciliations and current
/// market prices keyed by base asset (quoted in the reference currency).
///
/// Assets with no listed price keep their row with null valuation fields.
/// The reference currency's own row is never an investment position, so it
/// carries no holding value or weight. Rows come back sorted by portfolio
/// weight, heaviest first, unvalued rows last.
pub fn summarize(
    reconciled: &[Reconciliation],
    current_prices: &HashMap<String, Decimal>,
) -> Vec<PortfolioRow> {
    let mut rows: Vec<PortfolioRow> = reconciled
        .iter()
        .map(|rec| {
            let current_price = if rec.quote_asset == REFERENCE_ASSET {
                current_prices.get(&rec.base_asset).copied()
            } else {
                None
            };
            if current_price.is_none() {
                info!(
                    "{} is not listed on the exchange, price is not available",
                    rec.base_asset
                );
            }
            let price_change_abs = match (current_price, rec.average_price) {
                (Some(current), Some(average)) => Some(current - average),
                _ => None,
            };
            let price_change_pct = match (price_change_abs, rec.average_price) {
                (Some(change), Some(average)) if !average.is_zero() => {
                    Some(change / average * dec!(100))
                }
                _ => None,
            };
            let holding_value = if rec.base_asset == REFERENCE_ASSET {
                None
            } else {
                current_price.map(|price| rec.holding_qty * price)
            };
            PortfolioRow {
                base_asset: rec.base_asset.clone(),
                quote_asset: rec.quote_asset.clone(),
                average_price: rec.average_price,
                current_price,
                price_change_abs,
                price_change_pct,
                holding_qty: rec.holding_qty,
                holding_value,
                weight_pct: None,
                purchase_count: rec.purchase_count,
                sale_count: rec.sale_count,
            }
        })
        .collect();

    let total: Decimal = rows.iter().filter_map(|row| row.holding_value).sum();
    if !total.is_zero() {
        for row in &mut rows {
            row.weight_pct = row
                .holding_value
                .map(|value| (value / total * dec!(100)).round_dp(2));
        }
    }

    rows.sort_by(|a, b| match (a.weight_pct, b.weight_pct) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows
}
