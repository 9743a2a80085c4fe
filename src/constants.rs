//! Numeric policy constants and endpoint configuration.

/// Spread added to the base annual rate when accruing margin interest.
///
/// Brokers lend at a markup over the short-term benchmark; the engine models
/// this as a flat 50 basis points.
pub const MARGIN_RATE_SPREAD: f64 = 0.005;

/// Trading days per calendar year, used to annualise daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Calendar days per year, used in the CAGR exponent.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Annual rate assumed when the rate table cannot answer a lookup.
pub const DEFAULT_ANNUAL_RATE: f64 = 0.05;

/// Annual risk-free rate used in the CAGR-based Sharpe ratio.
pub const SHARPE_RISK_FREE_RATE: f64 = 0.04;

/// Number of fetch attempts before a provider error is surfaced as
/// "data unavailable".
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 3;

/// Base URL for the Yahoo Finance chart API.
pub const YAHOO_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com";
