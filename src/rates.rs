//! Short-term rate observation table.
//!
//! A monthly-indexed series of annual rates (in percent), loaded once and
//! passed explicitly to the driver. The table answers "what was the base
//! annual rate in effect on this date"; the interest handler adds the broker
//! spread and divides by twelve.

use std::io::Read;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::constants::DEFAULT_ANNUAL_RATE;
use crate::error::{Result, SimulationError};

/// One monthly rate observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateObservation {
    /// First day of the observation month
    pub month_start: NaiveDate,
    /// Annual rate in percent (e.g. `5.33` for 5.33%)
    pub annual_rate_pct: f64,
}

/// Chronologically ordered monthly rate observations.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    observations: Vec<RateObservation>,
}

impl RateTable {
    /// Build a table from `(month_start, annual_rate_percent)` pairs,
    /// sorting by month.
    pub fn new(mut observations: Vec<RateObservation>) -> Self {
        observations.sort_by_key(|o| o.month_start);
        Self { observations }
    }

    /// An empty table; every lookup falls back to the default rate.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a table from CSV with `date,rate` columns, where `date` is the
    /// month start (`YYYY-MM-DD`) and `rate` the annual percent.
    ///
    /// Rows whose date or rate fail to parse are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let mut observations = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| SimulationError::RateTableError {
                context: format!("CSV parse error: {e}"),
            })?;
            let date = record.get(0).unwrap_or("").trim();
            let rate = record.get(1).unwrap_or("").trim();
            let (Ok(month_start), Ok(annual_rate_pct)) =
                (date.parse::<NaiveDate>(), rate.parse::<f64>())
            else {
                continue;
            };
            observations.push(RateObservation {
                month_start,
                annual_rate_pct,
            });
        }

        Ok(Self::new(observations))
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// `true` when the table has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Annual rate (as a decimal) in effect on `date`.
    ///
    /// Takes the most recent observation at or before the first of the
    /// date's month; before the table starts, the earliest observation
    /// applies. An empty table answers with the 5% default.
    pub fn rate_for(&self, date: NaiveDate) -> f64 {
        let Some(anchor) = NaiveDate::from_ymd_opt(date.year(), date.month(), 1) else {
            warn!("Unrepresentable month for {date}, using default rate");
            return DEFAULT_ANNUAL_RATE;
        };

        if self.observations.is_empty() {
            warn!("Rate table is empty, using default rate");
            return DEFAULT_ANNUAL_RATE;
        }

        let idx = self
            .observations
            .partition_point(|o| o.month_start <= anchor);
        let observation = if idx == 0 {
            &self.observations[0]
        } else {
            &self.observations[idx - 1]
        };
        observation.annual_rate_pct / 100.0
    }
}
