//! Orchestration tests with an in-memory market-data provider.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use dca_backtest::models::{DividendSeries, PricePoint, PriceSeries};
use dca_backtest::{
    MarketDataProvider, RateTable, Result, SimulationConfig, SimulationError, run,
    run_with_benchmark,
};

/// Provider serving canned series, keyed by ticker.
struct StaticProvider {
    histories: HashMap<String, PriceSeries>,
}

impl StaticProvider {
    fn new(histories: Vec<(&str, PriceSeries)>) -> Self {
        Self {
            histories: histories
                .into_iter()
                .map(|(ticker, series)| (ticker.to_string(), series))
                .collect(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        let series = self
            .histories
            .get(ticker)
            .map(|s| s.between(start, end))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SimulationError::unavailable(ticker, "no canned history"))?;
        Ok(series)
    }

    async fn dividends(&self, _ticker: &str) -> Result<DividendSeries> {
        Ok(DividendSeries::empty())
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn series(start: &str, closes: &[f64]) -> PriceSeries {
    let start: NaiveDate = start.parse().unwrap();
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Days::new(i as u64),
                close,
            })
            .collect(),
    )
}

fn config(ticker: &str) -> SimulationConfig {
    SimulationConfig::builder(ticker, date("2024-01-01"), date("2024-01-31"))
        .contribution_amount(100.0)
        .build()
        .unwrap()
}

#[test]
fn run_fetches_and_simulates() {
    tokio_test::block_on(async {
        let provider = StaticProvider::new(vec![(
            "AAA",
            series("2024-01-01", &[100.0, 110.0, 120.0]),
        )]);
        let result = run(&provider, &config("AAA"), &RateTable::empty())
            .await
            .unwrap();
        assert_eq!(result.dates.len(), 3);
        assert_eq!(result.summary.total_invested, 300.0);
    });
}

#[test]
fn run_reports_unknown_ticker_as_unavailable() {
    tokio_test::block_on(async {
        let provider = StaticProvider::new(vec![]);
        let err = run(&provider, &config("NOPE"), &RateTable::empty())
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    });
}

#[test]
fn benchmark_comparison_clips_to_the_shared_calendar() {
    tokio_test::block_on(async {
        // Primary trades Jan 1-10, benchmark Jan 3-12: shared days are 3-10
        let provider = StaticProvider::new(vec![
            (
                "AAA",
                series(
                    "2024-01-01",
                    &[100.0, 101.0, 102.0, 104.0, 103.0, 105.0, 107.0, 106.0, 108.0, 110.0],
                ),
            ),
            (
                "BBB",
                series(
                    "2024-01-03",
                    &[50.0, 50.5, 50.2, 51.0, 51.5, 51.2, 52.0, 52.5, 52.2, 53.0],
                ),
            ),
        ]);

        let comparison = run_with_benchmark(&provider, &config("AAA"), "BBB", &RateTable::empty())
            .await
            .unwrap();

        assert_eq!(comparison.portfolio.actual_start_date, date("2024-01-03"));
        assert_eq!(comparison.portfolio.dates.len(), 8);
        assert_eq!(
            comparison.portfolio.dates.len(),
            comparison.benchmark.dates.len()
        );
        assert!(comparison.portfolio.analytics.alpha.is_some());
        assert!(comparison.portfolio.analytics.beta.is_some());
        // The benchmark run itself carries no comparison
        assert!(comparison.benchmark.analytics.alpha.is_none());
        // Forced plain accumulation: no debt on the benchmark side
        assert!(comparison.benchmark.borrowed.iter().all(|&d| d == 0.0));
    });
}

#[test]
fn disjoint_calendars_are_unavailable() {
    tokio_test::block_on(async {
        let provider = StaticProvider::new(vec![
            ("AAA", series("2024-01-01", &[100.0, 101.0])),
            ("BBB", series("2024-01-20", &[50.0, 51.0])),
        ]);
        let err = run_with_benchmark(&provider, &config("AAA"), "BBB", &RateTable::empty())
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    });
}
