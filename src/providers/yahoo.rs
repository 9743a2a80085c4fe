//! Yahoo Finance chart adapter.
//!
//! Fetches the v8 chart endpoint and maps its response onto the core series
//! types. Null closes inside the window make the whole history unavailable;
//! a malformed dividend map degrades to "no dividends".

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate};
use serde::Deserialize;
use tracing::info;

use crate::constants::{DEFAULT_FETCH_ATTEMPTS, YAHOO_CHART_BASE_URL};
use crate::error::{Result, SimulationError};
use crate::models::{DividendPayment, DividendSeries, PricePoint, PriceSeries};

use super::{MarketDataProvider, with_retry};

/// Market-data provider backed by the Yahoo Finance chart API.
pub struct YahooProvider {
    http: reqwest::Client,
    base_url: String,
    max_attempts: u32,
}

impl YahooProvider {
    /// Create a provider against the public Yahoo endpoint.
    pub fn new() -> Self {
        Self::with_base_url(YAHOO_CHART_BASE_URL)
    }

    /// Create a provider against a custom base URL (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            max_attempts: DEFAULT_FETCH_ATTEMPTS,
        }
    }

    async fn fetch_chart(&self, ticker: &str, params: &[(&str, String)]) -> Result<ChartResult> {
        let url = format!("{}/v8/finance/chart/{ticker}", self.base_url);
        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(SimulationError::ServerError {
                status: status.as_u16(),
                context: format!("chart fetch for {ticker}"),
            });
        }
        if !status.is_success() {
            return Err(SimulationError::unavailable(
                ticker,
                format!("chart endpoint answered HTTP {}", status.as_u16()),
            ));
        }

        let envelope: ChartEnvelope = response.json().await?;
        envelope
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.swap_remove(0))
                }
            })
            .ok_or_else(|| SimulationError::unavailable(ticker, "empty chart result"))
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        info!("Fetching history for {ticker} ({start} to {end})");

        // The chart API treats period2 as exclusive; push it one day out so
        // the requested end date is included.
        let period1 = to_timestamp(start);
        let period2 = to_timestamp(end + Days::new(1));

        let result = with_retry(ticker, self.max_attempts, || {
            let params = [
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ];
            async move { self.fetch_chart(ticker, &params).await }
        })
        .await?;

        let closes = result
            .indicators
            .quote
            .first()
            .map(|q| q.close.as_slice())
            .unwrap_or(&[]);

        if result.timestamp.is_empty() || closes.len() != result.timestamp.len() {
            return Err(SimulationError::unavailable(
                ticker,
                "no price history in the requested window",
            ));
        }
        if closes.iter().any(|c| c.is_none()) {
            return Err(SimulationError::unavailable(
                ticker,
                "price history contains null closes",
            ));
        }

        let points = result
            .timestamp
            .iter()
            .zip(closes.iter())
            .filter_map(|(&ts, &close)| {
                Some(PricePoint {
                    date: to_date(ts)?,
                    close: close?,
                })
            })
            .collect();

        Ok(PriceSeries::new(points))
    }

    async fn dividends(&self, ticker: &str) -> Result<DividendSeries> {
        info!("Fetching dividends for {ticker}");

        let result = with_retry(ticker, self.max_attempts, || {
            let params = [
                ("range", "max".to_string()),
                ("interval", "1d".to_string()),
                ("events", "div".to_string()),
            ];
            async move { self.fetch_chart(ticker, &params).await }
        })
        .await?;

        // A missing or malformed dividend map means a non-paying symbol.
        let payments = result
            .events
            .map(|events| {
                events
                    .dividends
                    .values()
                    .filter_map(|d| {
                        Some(DividendPayment {
                            date: to_date(d.date)?,
                            amount: d.amount,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(DividendSeries::new(payments))
    }
}

fn to_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
        .timestamp()
}

fn to_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
    #[serde(default)]
    events: Option<ChartEvents>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    #[serde(default)]
    dividends: HashMap<String, DividendRecord>,
}

#[derive(Debug, Deserialize)]
struct DividendRecord {
    amount: f64,
    date: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_json(timestamps: &[i64], closes: &[Option<f64>]) -> String {
        let closes: Vec<String> = closes
            .iter()
            .map(|c| c.map(|v| v.to_string()).unwrap_or("null".to_string()))
            .collect();
        format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{}],"indicators":{{"quote":[{{"close":[{}]}}]}}}}],"error":null}}}}"#,
            timestamps
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(","),
            closes.join(",")
        )
    }

    #[tokio::test]
    async fn test_history_parses_chart_response() {
        let mut server = mockito::Server::new_async().await;
        // 2024-01-02 and 2024-01-03 midnight UTC
        let mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/v8/finance/chart/TEST".to_string()))
            .with_status(200)
            .with_body(chart_json(
                &[1_704_153_600, 1_704_240_000],
                &[Some(100.5), Some(101.25)],
            ))
            .create_async()
            .await;

        let provider = YahooProvider::with_base_url(server.url());
        let series = provider
            .history(
                "TEST",
                "2024-01-02".parse().unwrap(),
                "2024-01-03".parse().unwrap(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some("2024-01-02".parse().unwrap()));
        assert_eq!(series.closes(), vec![100.5, 101.25]);
    }

    #[tokio::test]
    async fn test_history_null_close_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex(r"^/v8/finance/chart/TEST".to_string()))
            .with_status(200)
            .with_body(chart_json(
                &[1_704_153_600, 1_704_240_000],
                &[Some(100.5), None],
            ))
            .create_async()
            .await;

        let provider = YahooProvider::with_base_url(server.url());
        let err = provider
            .history(
                "TEST",
                "2024-01-02".parse().unwrap(),
                "2024-01-03".parse().unwrap(),
            )
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_missing_symbol_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex(r"^/v8/finance/chart/NOPE".to_string()))
            .with_status(404)
            .with_body(r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#)
            .create_async()
            .await;

        let provider = YahooProvider::with_base_url(server.url());
        let err = provider
            .history(
                "NOPE",
                "2024-01-02".parse().unwrap(),
                "2024-01-03".parse().unwrap(),
            )
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_dividends_parse_and_sort() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"chart":{"result":[{"timestamp":[1704153600],"indicators":{"quote":[{"close":[100.0]}]},"events":{"dividends":{"1704240000":{"amount":0.25,"date":1704240000},"1704153600":{"amount":0.22,"date":1704153600}}}}],"error":null}}"#;
        server
            .mock("GET", mockito::Matcher::Regex(r"^/v8/finance/chart/TEST".to_string()))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let provider = YahooProvider::with_base_url(server.url());
        let divs = provider.dividends("TEST").await.unwrap();
        assert_eq!(divs.payments().len(), 2);
        assert_eq!(divs.payments()[0].amount, 0.22);
        assert_eq!(divs.per_share_on("2024-01-03".parse().unwrap()), 0.25);
    }

    #[tokio::test]
    async fn test_dividends_absent_events_means_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex(r"^/v8/finance/chart/TEST".to_string()))
            .with_status(200)
            .with_body(chart_json(&[1_704_153_600], &[Some(100.0)]))
            .create_async()
            .await;

        let provider = YahooProvider::with_base_url(server.url());
        let divs = provider.dividends("TEST").await.unwrap();
        assert!(divs.is_empty());
    }
}
