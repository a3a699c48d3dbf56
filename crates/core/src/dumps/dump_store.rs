//! Append-only CSV dumps of previously fetched fills and daily closes.
//!
//! The stores exist to avoid refetching the same history from the exchange
//! on every run; they pre-populate pipeline inputs and are no part of the
//! reconciliation itself. Lifecycle: load once at startup, append once at
//! the end of a run.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;

use coinfolio_market_data::DailyClose;

use crate::errors::Result;
use crate::fills::Fill;

/// On-disk dump of raw fills fetched in earlier runs.
pub struct FillDumpStore {
    path: PathBuf,
}

impl FillDumpStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Fill>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut fills = Vec::new();
        for record in reader.deserialize() {
            fills.push(record?);
        }
        Ok(fills)
    }

    /// Appends fills not dumped before, keyed by pair and order id.
    /// Returns how many new rows were written.
    pub fn append(&self, fills: &[Fill]) -> Result<usize> {
        let mut all = self.load()?;
        let mut seen: HashSet<(String, String, i64)> = all.iter().map(fill_key).collect();
        let mut added = 0;
        for fill in fills {
            if seen.insert(fill_key(fill)) {
                all.push(fill.clone());
                added += 1;
            }
        }
        all.sort_by_key(|f| f.timestamp);
        self.write_all(&all)?;
        info!(
            "fills dump updated with {} new rows: {}",
            added,
            self.path.display()
        );
        Ok(added)
    }

    fn write_all(&self, fills: &[Fill]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        for fill in fills {
            writer.serialize(fill)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn fill_key(fill: &Fill) -> (String, String, i64) {
    (
        fill.base_asset.clone(),
        fill.quote_asset.clone(),
        fill.order_id,
    )
}

/// On-disk dump of daily closing prices.
pub struct PriceDumpStore {
    path: PathBuf,
}

impl PriceDumpStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<DailyClose>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut closes = Vec::new();
        for record in reader.deserialize() {
            closes.push(record?);
        }
        Ok(closes)
    }

    /// The day fetching should resume from: the last dumped day, refetched
    /// whole because it may have been written intraday.
    pub fn resume_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.load()?.iter().map(|close| close.date).max())
    }

    /// Upserts `closes`, newer rows replacing previously dumped ones for
    /// the same symbol and day. Returns how many rows changed or appeared.
    pub fn append(&self, closes: &[DailyClose]) -> Result<usize> {
        let mut merged: BTreeMap<(String, NaiveDate), DailyClose> = self
            .load()?
            .into_iter()
            .map(|close| ((close.symbol.clone(), close.date), close))
            .collect();
        let mut added = 0;
        for close in closes {
            let previous = merged.insert((close.symbol.clone(), close.date), close.clone());
            if previous.map_or(true, |old| old != *close) {
                added += 1;
            }
        }
        let all: Vec<DailyClose> = merged.into_values().collect();
        self.write_all(&all)?;
        info!(
            "prices dump updated with {} new rows (days): {}",
            added,
            self.path.display()
        );
        Ok(added)
    }

    fn write_all(&self, closes: &[DailyClose]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        for close in closes {
            writer.serialize(close)?;
        }
        writer.flush()?;
        Ok(())
    }
}
