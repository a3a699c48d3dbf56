//! Pooled, value-weighted cost-basis reconciliation.
//!
//! Sales are not matched FIFO/LIFO against specific lots. Each sale is
//! redistributed proportionally across all outstanding buy lots by their
//! current market value, shrinking every lot's remaining quantity
//! multiplicatively; corrections compound across successive sales. The
//! recurrence is strictly sequential: every sale's corrections depend on
//! the cumulative effect of all prior sales.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::{Error, ReconcileError, Result, ValidationError};
use crate::fills::{Fill, Side};
use crate::reconcile::Lot;

/// Outcome of reconciling one asset group's fill sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub base_asset: String,
    pub quote_asset: String,
    /// One lot per BUY fill, in fill order, with final corrected
    /// quantities.
    pub lots: Vec<Lot>,
    /// Pooled average purchase price over currently-held quantity.
    /// `None` once every acquired coin has been sold off.
    pub average_price: Option<Decimal>,
    /// Total quantity still held across lots.
    pub holding_qty: Decimal,
    pub purchase_count: usize,
    pub sale_count: usize,
}

/// Reconciles one base asset's time-ordered fills into corrected lots and
/// a pooled average purchase price.
///
/// Pure function of the input sequence: no state is carried between asset
/// groups or between runs, and rerunning on identical input yields
/// identical output.
pub fn reconcile(fills: &[Fill]) -> Result<Reconciliation> {
    let first = fills.first().ok_or_else(|| {
        Error::Validation(ValidationError::InvalidInput(
            "cannot reconcile an empty fill group".to_string(),
        ))
    })?;
    let base_asset = first.base_asset.clone();

    let quote_assets: BTreeSet<&str> = fills.iter().map(|f| f.quote_asset.as_str()).collect();
    if quote_assets.len() > 1 {
        return Err(ReconcileError::SchemaViolation {
            base_asset,
            quote_assets: quote_assets.into_iter().map(String::from).collect(),
        }
        .into());
    }
    let quote_asset = first.quote_asset.clone();

    let mut lots: Vec<Lot> = Vec::new();
    let mut purchase_count = 0;
    let mut sale_count = 0;
    for fill in fills {
        match fill.side {
            Side::Buy => {
                lots.push(Lot::open(fill));
                purchase_count += 1;
            }
            Side::Sell => {
                sale_count += 1;
                apply_sale(&mut lots, fill)?;
            }
        }
    }

    let holding_qty: Decimal = lots.iter().map(|lot| lot.corrected_qty).sum();
    let average_price = if holding_qty.is_zero() {
        None
    } else {
        let cost: Decimal = lots.iter().map(|lot| lot.price * lot.corrected_qty).sum();
        Some(cost / holding_qty)
    };

    Ok(Reconciliation {
        base_asset,
        quote_asset,
        lots,
        average_price,
        holding_qty,
        purchase_count,
        sale_count,
    })
}

/// Distributes one sale's proceeds across every lot opened before it.
///
/// Each lot is shrunk by the share of its current value the sale
/// liquidated: with `correction = proceeds * weight` and `weight =
/// current_value / total_value`, the factor `1 - correction /
/// current_value` is applied to `corrected_qty`. Weights use the lot's
/// original notional revalued at the sale price, not the remaining-adjusted
/// value - successive sales at different prices are path-dependent on
/// purpose.
fn apply_sale(lots: &mut [Lot], sell: &Fill) -> Result<()> {
    let outstanding: Decimal = lots.iter().map(|lot| lot.corrected_qty).sum();
    if outstanding.is_zero() {
        return Err(ReconcileError::InsufficientBalance {
            base_asset: sell.base_asset.clone(),
            timestamp: sell.timestamp,
        }
        .into());
    }

    let total_value: Decimal = lots.iter().map(|lot| lot.current_value(sell.price)).sum();
    for lot in lots.iter_mut() {
        let current_value = lot.current_value(sell.price);
        if current_value.is_zero() {
            // A zero-quantity lot holds nothing to shrink.
            continue;
        }
        let weight = current_value / total_value;
        let correction = sell.quote_qty * weight;
        lot.corrected_qty *= Decimal::ONE - correction / current_value;
    }
    Ok(())
}
