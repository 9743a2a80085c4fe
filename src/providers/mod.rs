//! Market-data provider contract and retry policy.
//!
//! Providers are synchronous inputs from the simulation's point of view:
//! everything is fetched before the daily loop starts. Transient failures
//! are retried with bounded exponential backoff and converted to the
//! "data unavailable" outcome when the attempts run out.

mod yahoo;

pub use self::yahoo::YahooProvider;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use crate::error::{Result, SimulationError};
use crate::models::{DividendSeries, PriceSeries};

/// Source of historical prices and dividends.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily closing prices for `ticker` over `[start, end]`.
    ///
    /// The returned series is chronologically ordered with no null closes
    /// and at least one row; anything less is
    /// [`SimulationError::DataUnavailable`].
    async fn history(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
    -> Result<PriceSeries>;

    /// Full dividend history for `ticker`. May be empty.
    async fn dividends(&self, ticker: &str) -> Result<DividendSeries>;
}

/// Run `op` up to `max_attempts` times with exponential backoff.
///
/// Only retriable errors (network, 5xx) are retried; when the attempts run
/// out the failure is reported as data-unavailable for `symbol`.
pub(crate) async fn with_retry<T, F, Fut>(symbol: &str, max_attempts: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = Duration::from_millis(500);
    for attempt in 1..=max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retriable() && attempt < max_attempts => {
                warn!("Fetch for {symbol} failed (attempt {attempt}): {err}; retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(err) if err.is_retriable() => {
                return Err(SimulationError::unavailable(
                    symbol,
                    format!("provider failed after {max_attempts} attempts: {err}"),
                ));
            }
            Err(err) => return Err(err),
        }
    }
    unreachable!("loop returns on the final attempt")
}
