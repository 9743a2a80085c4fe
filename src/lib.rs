//! # dca-backtest
//!
//! A historical backtesting engine for dollar-cost-averaging strategies
//! with optional margin borrowing, automatic margin calls, dividend
//! reinvestment, and a one-way transition to a withdrawal phase.
//!
//! Given a security's daily closing prices and dividend schedule, a
//! monthly-indexed short-term rate series, and a configuration describing
//! the investor's behaviour, the engine produces a day-by-day time series of
//! portfolio state plus summary and risk/performance analytics.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dca_backtest::{RateTable, SimulationConfig, YahooProvider, run};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SimulationConfig::builder(
//!         "VOO",
//!         "2020-01-02".parse()?,
//!         "2024-12-31".parse()?,
//!     )
//!     .contribution_amount(500.0)
//!     .reinvest_dividends(true)
//!     .build()?;
//!
//!     let provider = YahooProvider::new();
//!     let rates = RateTable::from_csv_reader(std::fs::File::open("rates.csv")?)?;
//!
//!     let result = run(&provider, &config, &rates).await?;
//!     println!("Invested: {:.2}", result.summary.total_invested);
//!     println!("CAGR:     {:.2}%", result.analytics.cagr);
//!     Ok(())
//! }
//! ```
//!
//! ## Offline Usage
//!
//! The daily pipeline itself is synchronous and provider-free; hand
//! [`simulate`] a price series, dividends, and a rate table directly:
//!
//! ```
//! use dca_backtest::models::{DividendSeries, PricePoint, PriceSeries};
//! use dca_backtest::{RateTable, SimulationConfig, simulate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let prices = PriceSeries::new(vec![
//!     PricePoint { date: "2024-01-02".parse()?, close: 100.0 },
//!     PricePoint { date: "2024-01-03".parse()?, close: 102.0 },
//! ]);
//! let config = SimulationConfig::builder(
//!     "TEST",
//!     "2024-01-02".parse()?,
//!     "2024-01-03".parse()?,
//! )
//! .contribution_amount(100.0)
//! .build()?;
//!
//! let result = simulate(&config, &prices, &DividendSeries::empty(), &RateTable::empty())?;
//! assert_eq!(result.dates.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Market-day alignment between two series
pub mod align;
/// Risk and performance analytics
pub mod analytics;
/// Run orchestration and benchmark comparison
pub mod benchmark;
/// Simulation configuration
pub mod config;
/// Numeric policy constants
pub mod constants;
/// Simulation driver
pub mod engine;
/// Error types and result definitions
pub mod error;
/// Daily event handlers
pub mod handlers;
/// Pure arithmetic primitives
pub mod math;
/// Core data model
pub mod models;
/// Market-data providers
pub mod providers;
/// Short-term rate observation table
pub mod rates;
/// External result shape
pub mod result;
/// Contribution cadence
pub mod schedule;
/// Mutable portfolio state
pub mod state;

// Re-export main types
pub use benchmark::{BenchmarkComparison, run, run_with_benchmark};
pub use config::{Frequency, SimulationConfig, SimulationConfigBuilder};
pub use engine::simulate;
pub use error::{Result, SimulationError};
pub use providers::{MarketDataProvider, YahooProvider};
pub use rates::{RateObservation, RateTable};
pub use result::{SimulationAnalytics, SimulationResult, SimulationSummary};
