//! Daily holdings-history building.
//!
//! Turns one asset's irregular fill stream into a contiguous daily series
//! of cumulative cash flow and holdings, valued against a daily
//! closing-price series. Days with no listed close keep a null value
//! rather than aborting the run.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use coinfolio_market_data::DailyClose;

use crate::fills::Fill;
use crate::history::{AssetHistoryPoint, PortfolioHistoryPoint};
use crate::utils::time_utils::days_between;

/// Builds the contiguous daily history for one asset's fills.
///
/// Each fill transfers `±quote_qty` cash and `±executed_qty` coins;
/// cumulative sums form an irregular step series that is resampled to
/// daily grain: the last value within each day wins, gaps forward-fill,
/// and a synthetic terminal day at `as_of` extends the series to the
/// present. Pure function - callers pass today's date explicitly.
pub fn build_history(
    fills: &[Fill],
    closes: &[DailyClose],
    as_of: NaiveDate,
) -> Vec<AssetHistoryPoint> {
    if fills.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&Fill> = fills.iter().collect();
    ordered.sort_by_key(|f| f.timestamp);

    let base_asset = &ordered[0].base_asset;
    let mut events: Vec<(NaiveDate, Decimal, Decimal)> = Vec::with_capacity(ordered.len());
    let mut cash = Decimal::ZERO;
    let mut coin = Decimal::ZERO;
    for fill in &ordered {
        cash += fill.cash_transfer();
        coin += fill.coin_transfer();
        events.push((fill.date(), cash, coin));
    }

    let close_by_date: HashMap<NaiveDate, Decimal> =
        closes.iter().map(|c| (c.date, c.close)).collect();

    let start = events[0].0;
    let end = events.last().map(|(date, _, _)| *date).unwrap_or(start).max(as_of);

    let mut points = Vec::new();
    let mut next_event = 0;
    // Seeding with the first event back-fills any leading gap.
    let (mut cash_cum, mut coin_cum) = (events[0].1, events[0].2);
    for date in days_between(start, end) {
        while next_event < events.len() && events[next_event].0 <= date {
            cash_cum = events[next_event].1;
            coin_cum = events[next_event].2;
            next_event += 1;
        }
        let coin_value = match close_by_date.get(&date) {
            Some(close) => Some(coin_cum * close),
            None => {
                debug!("no {base_asset} close on {date}; holdings value left empty");
                None
            }
        };
        points.push(AssetHistoryPoint {
            date,
            cash_in_cum: cash_cum,
            coin_qty_cum: coin_cum,
            coin_value,
        });
    }
    points
}

/// Portfolio-wide daily history: outer-join the per-asset series on date,
/// forward-fill each asset's columns independently, and sum cash and value
/// across assets. Assets with no value yet on a day contribute nothing.
pub fn merge_histories(
    histories: &BTreeMap<String, Vec<AssetHistoryPoint>>,
) -> Vec<PortfolioHistoryPoint> {
    let start = histories.values().filter_map(|h| h.first()).map(|p| p.date).min();
    let end = histories.values().filter_map(|h| h.last()).map(|p| p.date).max();
    let (Some(start), Some(end)) = (start, end) else {
        return Vec::new();
    };

    let by_date: Vec<HashMap<NaiveDate, &AssetHistoryPoint>> = histories
        .values()
        .map(|h| h.iter().map(|p| (p.date, p)).collect())
        .collect();

    let mut carried_cash: Vec<Option<Decimal>> = vec![None; by_date.len()];
    let mut carried_value: Vec<Option<Decimal>> = vec![None; by_date.len()];
    let mut points = Vec::new();
    for date in days_between(start, end) {
        for (i, series) in by_date.iter().enumerate() {
            if let Some(point) = series.get(&date) {
                carried_cash[i] = Some(point.cash_in_cum);
                if let Some(value) = point.coin_value {
                    carried_value[i] = Some(value);
                }
            }
        }
        points.push(PortfolioHistoryPoint {
            date,
            cash_in_cum: carried_cash.iter().flatten().sum(),
            coin_value: carried_value.iter().flatten().sum(),
        });
    }
    points
}
