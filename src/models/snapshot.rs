//! Per-day portfolio snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// State of the portfolio at one trading day's close, after all of the
/// day's events have been applied.
///
/// Records are collected in an append-only sequence by the driver and mapped
/// to the external result shape once at assembly time; values here carry
/// full precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Trading date
    pub date: NaiveDate,
    /// User principal deployed so far
    pub total_invested: f64,
    /// Market value of held shares (`shares * close`)
    pub portfolio_value: f64,
    /// Cumulative dividend income
    pub cumulative_dividends: f64,
    /// Tracked cash, or `None` in unbounded-cash mode
    pub cash: Option<f64>,
    /// Margin debt outstanding
    pub debt: f64,
    /// Cumulative margin interest assessed
    pub cumulative_interest: f64,
    /// `portfolio_value - debt`
    pub net_portfolio: f64,
    /// `portfolio_value / equity`, `1.0` when equity is not positive
    pub leverage: f64,
    /// `cost_basis / shares`, `0.0` when no shares are held
    pub average_cost: f64,
    /// Whether the decumulation phase was active at the close
    pub withdrawal_mode: bool,
    /// Cumulative cash withdrawn
    pub cumulative_withdrawn: f64,
}
