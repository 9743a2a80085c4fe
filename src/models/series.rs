//! Price and dividend series.
//!
//! Both series are chronologically ordered; dates are trading days as
//! reported by the market-data provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

/// Chronologically ordered daily closing prices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from `(date, close)` pairs, sorting by date.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    /// The ordered points.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of trading days in the series.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First trading date, if any.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Last trading date, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// All trading dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// All closes in order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Close for an exact date, if present.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].close)
    }

    /// Restrict the series to the given inclusive date window.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        PriceSeries {
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| p.date >= start && p.date <= end)
                .collect(),
        }
    }
}

/// A single cash dividend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendPayment {
    /// Ex-dividend date
    pub date: NaiveDate,
    /// Dividend per share
    pub amount: f64,
}

/// Chronologically ordered cash dividends for one symbol.
///
/// May be empty; a missing dividend history is indistinguishable from a
/// non-paying symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DividendSeries {
    payments: Vec<DividendPayment>,
}

impl DividendSeries {
    /// Build a series from payments, sorting by date.
    pub fn new(mut payments: Vec<DividendPayment>) -> Self {
        payments.sort_by_key(|p| p.date);
        Self { payments }
    }

    /// An empty series (no dividends).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The ordered payments.
    pub fn payments(&self) -> &[DividendPayment] {
        &self.payments
    }

    /// `true` when the symbol paid nothing in the loaded history.
    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Dividend per share going ex on `date`, `0.0` when none.
    pub fn per_share_on(&self, date: NaiveDate) -> f64 {
        self.payments
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.payments[i].amount)
            .unwrap_or(0.0)
    }
}
