//! Per-asset analysis fan-out and result assembly.
//!
//! Reconciliation and history building are pure and independent across
//! assets, so asset groups run as concurrent tasks in bounded batches.
//! Within one group the recurrence stays strictly sequential. A structural
//! failure in one group is collected and reported without disturbing the
//! others.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use log::warn;
use rust_decimal::Decimal;

use coinfolio_market_data::{with_backoff, DailyClose, DailyCloseProvider, TickerProvider};

use crate::constants::ASSET_BATCH_SIZE;
use crate::errors::{Error, Result};
use crate::fills::{group_fills_by_base_asset, Fill, FillSource, OrderNormalizer};
use crate::history::{build_history, merge_histories, AssetHistoryPoint, PortfolioHistoryPoint};
use crate::reconcile::{reconcile, Reconciliation};
use crate::summary::{summarize, PortfolioRow};
use crate::utils::symbols::valuation_symbol;

/// One asset's reconciliation and daily history.
#[derive(Debug, Clone)]
pub struct AssetReport {
    pub reconciliation: Reconciliation,
    pub history: Vec<AssetHistoryPoint>,
}

/// Everything a report layer needs for one account.
#[derive(Debug, Clone)]
pub struct PortfolioAnalysis {
    /// Summary table, heaviest portfolio weight first.
    pub rows: Vec<PortfolioRow>,
    /// Per-asset reconciliation and history, keyed by base asset.
    pub reports: BTreeMap<String, AssetReport>,
    /// Portfolio-wide daily history summed across assets.
    pub portfolio_history: Vec<PortfolioHistoryPoint>,
    /// Asset groups whose pipeline aborted, with the rendered error.
    pub failures: Vec<(String, String)>,
}

pub struct PortfolioService {
    daily_closes: Arc<dyn DailyCloseProvider>,
    tickers: Arc<dyn TickerProvider>,
}

impl PortfolioService {
    pub fn new(
        daily_closes: Arc<dyn DailyCloseProvider>,
        tickers: Arc<dyn TickerProvider>,
    ) -> Self {
        Self {
            daily_closes,
            tickers,
        }
    }

    /// Fetches, normalizes, and analyses one account's fills in a single
    /// call. Transient fetch failures are retried with backoff before
    /// giving up.
    pub async fn analyze_account(
        &self,
        source: &dyn FillSource,
        normalizer: &OrderNormalizer,
        pairs: &[(String, String)],
        as_of: NaiveDate,
    ) -> Result<PortfolioAnalysis> {
        let raw = with_backoff(|| source.fetch_fills(pairs))
            .await
            .map_err(Error::MarketData)?;
        let fills = normalizer.normalize(raw).await?;
        self.analyze(fills, as_of).await
    }

    /// Runs reconciliation and history building for every asset group in
    /// `fills`, then assembles the summary table and the merged portfolio
    /// history. Idempotent: rerunning on the same input yields the same
    /// analysis.
    pub async fn analyze(&self, fills: Vec<Fill>, as_of: NaiveDate) -> Result<PortfolioAnalysis> {
        let groups: Vec<(String, Vec<Fill>)> =
            group_fills_by_base_asset(fills).into_iter().collect();

        let mut reports: BTreeMap<String, AssetReport> = BTreeMap::new();
        let mut failures: Vec<(String, String)> = Vec::new();
        for chunk in groups.chunks(ASSET_BATCH_SIZE) {
            let tasks: Vec<_> = chunk
                .iter()
                .map(|(asset, group)| async move {
                    match self.analyze_asset(group, as_of).await {
                        Ok(report) => Ok((asset.clone(), report)),
                        Err(e) => Err((asset.clone(), e.to_string())),
                    }
                })
                .collect();
            for outcome in join_all(tasks).await {
                match outcome {
                    Ok((asset, report)) => {
                        reports.insert(asset, report);
                    }
                    Err(failure) => failures.push(failure),
                }
            }
        }
        if !failures.is_empty() {
            warn!(
                "reconciliation failed for {} asset group(s): {:?}",
                failures.len(),
                failures
            );
        }

        let assets: Vec<String> = reports.keys().cloned().collect();
        let current_prices: HashMap<String, Decimal> =
            match self.tickers.current_prices(&assets).await {
                Ok(prices) => prices,
                Err(e) => {
                    warn!("current prices unavailable, valuations left empty: {e}");
                    HashMap::new()
                }
            };

        let reconciled: Vec<Reconciliation> = reports
            .values()
            .map(|report| report.reconciliation.clone())
            .collect();
        let rows = summarize(&reconciled, &current_prices);

        let histories: BTreeMap<String, Vec<AssetHistoryPoint>> = reports
            .iter()
            .map(|(asset, report)| (asset.clone(), report.history.clone()))
            .collect();
        let portfolio_history = merge_histories(&histories);

        Ok(PortfolioAnalysis {
            rows,
            reports,
            portfolio_history,
            failures,
        })
    }

    async fn analyze_asset(&self, fills: &[Fill], as_of: NaiveDate) -> Result<AssetReport> {
        let reconciliation = reconcile(fills)?;
        let start = fills.iter().map(|f| f.date()).min().unwrap_or(as_of);
        let symbol = valuation_symbol(&reconciliation.base_asset);
        let closes: Vec<DailyClose> = match self.daily_closes.daily_closes(&symbol, start).await {
            Ok(closes) => closes,
            Err(e) => {
                warn!("no close series for {symbol}, holdings values left empty: {e}");
                Vec::new()
            }
        };
        let history = build_history(fills, &closes, as_of);
        Ok(AssetReport {
            reconciliation,
            history,
        })
    }
}
