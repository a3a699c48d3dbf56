//! Cleans a raw fill batch into reference-currency fills ready for
//! per-asset grouping.
//!
//! The pipeline: backfill market-order prices, keep FILLED fills, merge
//! equivalent reference currencies, split cross-asset conversion trades
//! into two reference-currency legs, sort chronologically.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use coinfolio_market_data::PriceAtResolver;

use crate::constants::{ACCEPTED_QUOTE_ASSETS, QUOTE_ASSET_ALIASES, REFERENCE_ASSET};
use crate::errors::Result;
use crate::fills::{Fill, OrderStatus, OrderType, Side};

/// Single-operation transform over a batch of fills.
///
/// Variants are composed by delegation; the normalizer holds whichever one
/// matches its configuration.
#[async_trait]
pub trait FillTransform: Send + Sync {
    async fn transform(&self, fills: Vec<Fill>) -> Result<Vec<Fill>>;
}

/// Passes fills through untouched. Stands in for the splitter when
/// conversion splitting is disabled.
pub struct IdentityTransform;

#[async_trait]
impl FillTransform for IdentityTransform {
    async fn transform(&self, fills: Vec<Fill>) -> Result<Vec<Fill>> {
        Ok(fills)
    }
}

/// Replaces each fill quoted outside the accepted reference set with two
/// reference-currency legs of equivalent economic substance: a SELL of the
/// original quote asset and a leg for the original base asset, both priced
/// at the fill's instant.
pub struct CrossPairSplitter {
    prices: Arc<PriceAtResolver>,
}

impl CrossPairSplitter {
    pub fn new(prices: Arc<PriceAtResolver>) -> Self {
        Self { prices }
    }

    async fn split(&self, fill: &Fill) -> Result<Option<(Fill, Fill)>> {
        let sell_symbol = format!("{}{}", fill.quote_asset, REFERENCE_ASSET);
        let sell_price = match self.prices.price_at(&sell_symbol, fill.timestamp).await {
            Ok(price) => price,
            Err(e) if e.is_no_data() => {
                warn!(
                    "no {} price at {} for conversion order {}; fill skipped",
                    sell_symbol, fill.timestamp, fill.order_id
                );
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let base_symbol = format!("{}{}", fill.base_asset, REFERENCE_ASSET);
        let base_price = match self.prices.price_at(&base_symbol, fill.timestamp).await {
            Ok(price) => price,
            Err(e) if e.is_no_data() => {
                warn!(
                    "no {} price at {} for conversion order {}; fill skipped",
                    base_symbol, fill.timestamp, fill.order_id
                );
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let sell_leg = Fill {
            base_asset: fill.quote_asset.clone(),
            quote_asset: REFERENCE_ASSET.to_string(),
            side: Side::Sell,
            price: sell_price,
            executed_qty: fill.quote_qty,
            quote_qty: fill.quote_qty * sell_price,
            ..fill.clone()
        };
        // The base leg keeps the fill's own side: a conversion purchase
        // becomes a BUY of the base asset against the reference currency.
        let base_leg = Fill {
            quote_asset: REFERENCE_ASSET.to_string(),
            price: base_price,
            quote_qty: fill.executed_qty * base_price,
            ..fill.clone()
        };
        debug!(
            "split conversion order {} ({}) into {} {} and {} {}",
            fill.order_id,
            fill.symbol(),
            sell_leg.side.as_str(),
            sell_leg.symbol(),
            base_leg.side.as_str(),
            base_leg.symbol()
        );
        Ok(Some((sell_leg, base_leg)))
    }
}

#[async_trait]
impl FillTransform for CrossPairSplitter {
    async fn transform(&self, fills: Vec<Fill>) -> Result<Vec<Fill>> {
        let mut out = Vec::with_capacity(fills.len());
        for fill in fills {
            if ACCEPTED_QUOTE_ASSETS.contains(&fill.quote_asset.as_str()) {
                out.push(fill);
                continue;
            }
            if let Some((sell_leg, base_leg)) = self.split(&fill).await? {
                out.push(sell_leg);
                out.push(base_leg);
            }
        }
        Ok(out)
    }
}

/// Normalizes one account's raw fills.
pub struct OrderNormalizer {
    prices: Arc<PriceAtResolver>,
    splitter: Arc<dyn FillTransform>,
}

impl OrderNormalizer {
    /// Normalizer with cross-pair conversion splitting enabled.
    pub fn new(prices: Arc<PriceAtResolver>) -> Self {
        let splitter: Arc<dyn FillTransform> = Arc::new(CrossPairSplitter::new(prices.clone()));
        Self { prices, splitter }
    }

    /// Normalizer that leaves conversion trades on their original pair.
    /// Grouping will reject mixed-quote groups downstream.
    pub fn without_splitting(prices: Arc<PriceAtResolver>) -> Self {
        Self {
            prices,
            splitter: Arc::new(IdentityTransform),
        }
    }

    pub async fn normalize(&self, fills: Vec<Fill>) -> Result<Vec<Fill>> {
        let fills = self.backfill_market_prices(fills).await?;

        let mut fills: Vec<Fill> = fills
            .into_iter()
            .filter(|f| f.status == OrderStatus::Filled)
            .collect();

        for fill in &mut fills {
            for (alias, canonical) in QUOTE_ASSET_ALIASES {
                if fill.quote_asset == *alias {
                    fill.quote_asset = (*canonical).to_string();
                }
            }
        }

        // A fill still priced at zero cannot participate: every downstream
        // value revaluation divides by the fill price.
        let fills: Vec<Fill> = fills
            .into_iter()
            .filter(|f| {
                if f.price.is_sign_positive() && !f.price.is_zero() {
                    true
                } else {
                    warn!(
                        "dropping fill {} ({}) with non-positive price {}",
                        f.order_id,
                        f.symbol(),
                        f.price
                    );
                    false
                }
            })
            .collect();

        let mut fills = self.splitter.transform(fills).await?;
        fills.sort_by_key(|f| f.timestamp);
        Ok(fills)
    }

    /// Market orders report no execution price; take the market price at
    /// the fill's instant instead. Runs before any other processing.
    async fn backfill_market_prices(&self, mut fills: Vec<Fill>) -> Result<Vec<Fill>> {
        for fill in &mut fills {
            if fill.order_type != OrderType::Market || !fill.price.is_zero() {
                continue;
            }
            match self.prices.price_at(&fill.symbol(), fill.timestamp).await {
                Ok(price) => fill.price = price,
                Err(e) if e.is_no_data() => {
                    warn!(
                        "market order {} ({}) has no resolvable price: {}",
                        fill.order_id,
                        fill.symbol(),
                        e
                    );
                }
                Err(e) => return Err(crate::errors::Error::MarketData(e)),
            }
        }
        Ok(fills)
    }
}
