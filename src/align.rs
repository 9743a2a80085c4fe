//! Market-day alignment between two series.
//!
//! Used by the benchmark orchestrator to keep two simulations on a shared
//! calendar: the benchmark series is reindexed onto the primary run's
//! trading days, and the simulated window is clipped to the intersection of
//! the two tickers' calendars.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{Result, SimulationError};
use crate::models::{PricePoint, PriceSeries};

/// Reindex `series` onto `target_dates`, forward-filling and then
/// back-filling gaps.
///
/// A date with no earlier observation takes the first later one. Returns
/// [`SimulationError::DataUnavailable`] when the source series is empty (no
/// value can be filled at all).
pub fn align_to_dates(series: &PriceSeries, target_dates: &[NaiveDate]) -> Result<PriceSeries> {
    if series.is_empty() {
        return Err(SimulationError::unavailable(
            "series",
            "no alignable data in the requested window",
        ));
    }

    let by_date: BTreeMap<NaiveDate, f64> = series
        .points()
        .iter()
        .map(|p| (p.date, p.close))
        .collect();

    let points = target_dates
        .iter()
        .map(|&date| {
            let close = by_date
                .range(..=date)
                .next_back()
                .or_else(|| by_date.range(date..).next())
                .map(|(_, &close)| close)
                .expect("non-empty map yields a neighbour");
            PricePoint { date, close }
        })
        .collect();

    Ok(PriceSeries::new(points))
}

/// Intersection of two tickers' trading calendars.
///
/// Returns the `(min, max)` of the shared dates, or `None` when the two
/// series have no trading day in common.
pub fn common_date_range(a: &PriceSeries, b: &PriceSeries) -> Option<(NaiveDate, NaiveDate)> {
    let b_dates: std::collections::BTreeSet<NaiveDate> = b.dates().into_iter().collect();
    let mut shared = a
        .dates()
        .into_iter()
        .filter(|d| b_dates.contains(d))
        .peekable();

    let first = *shared.peek()?;
    let last = shared.last()?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(rows: &[(&str, f64)]) -> PriceSeries {
        PriceSeries::new(
            rows.iter()
                .map(|&(d, c)| PricePoint {
                    date: d.parse().unwrap(),
                    close: c,
                })
                .collect(),
        )
    }

    fn dates(strs: &[&str]) -> Vec<NaiveDate> {
        strs.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_forward_fill() {
        let s = series(&[("2024-01-01", 100.0), ("2024-01-03", 103.0)]);
        let aligned = align_to_dates(&s, &dates(&["2024-01-01", "2024-01-02", "2024-01-03"]))
            .unwrap();
        assert_eq!(aligned.closes(), vec![100.0, 100.0, 103.0]);
    }

    #[test]
    fn test_back_fill_leading_gap() {
        let s = series(&[("2024-01-03", 103.0), ("2024-01-04", 104.0)]);
        let aligned = align_to_dates(&s, &dates(&["2024-01-01", "2024-01-03"])).unwrap();
        assert_eq!(aligned.closes(), vec![103.0, 103.0]);
    }

    #[test]
    fn test_empty_source_is_unavailable() {
        let err = align_to_dates(&PriceSeries::default(), &dates(&["2024-01-01"])).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_common_date_range() {
        let a = series(&[
            ("2024-01-01", 1.0),
            ("2024-01-02", 1.0),
            ("2024-01-03", 1.0),
        ]);
        let b = series(&[("2024-01-02", 2.0), ("2024-01-03", 2.0), ("2024-01-05", 2.0)]);
        assert_eq!(
            common_date_range(&a, &b),
            Some(("2024-01-02".parse().unwrap(), "2024-01-03".parse().unwrap()))
        );
    }

    #[test]
    fn test_no_overlap() {
        let a = series(&[("2024-01-01", 1.0)]);
        let b = series(&[("2024-02-01", 2.0)]);
        assert_eq!(common_date_range(&a, &b), None);
    }
}
