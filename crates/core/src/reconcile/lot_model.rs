use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fills::Fill;

/// One BUY fill's tracked remaining position within an asset group.
///
/// `corrected_qty` starts equal to `original_qty` and is only ever
/// multiplicatively reduced by later sales; `0 <= corrected_qty <=
/// original_qty` over the whole sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Execution price of the opening BUY.
    pub price: Decimal,
    /// Quantity acquired by the opening BUY.
    pub original_qty: Decimal,
    /// Notional cost of the opening BUY in the reference currency.
    pub quote_qty: Decimal,
    /// Quantity still attributed to this lot after pro-rata sale
    /// reductions.
    pub corrected_qty: Decimal,
    pub opened_at: DateTime<Utc>,
}

impl Lot {
    /// Opens a lot from a BUY fill, with nothing sold off yet.
    pub fn open(fill: &Fill) -> Self {
        Lot {
            price: fill.price,
            original_qty: fill.executed_qty,
            quote_qty: fill.quote_qty,
            corrected_qty: fill.executed_qty,
            opened_at: fill.timestamp,
        }
    }

    /// The lot's original quantity revalued at `sell_price`
    /// (`quote_qty / price` is the original quantity).
    pub fn current_value(&self, sell_price: Decimal) -> Decimal {
        self.quote_qty * sell_price / self.price
    }
}
