//! Simulation configuration and builder.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Contribution cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Contribute every trading day
    Daily,
    /// Contribute on the start date's weekday
    Weekly,
    /// Contribute on the first trading day of each month
    Monthly,
}

/// Configuration for one simulation run. Immutable once built.
///
/// Use [`SimulationConfig::builder`] to construct with the builder pattern.
///
/// # Example
///
/// ```
/// use dca_backtest::SimulationConfig;
///
/// let config = SimulationConfig::builder("VOO", "2020-01-02".parse().unwrap(), "2024-12-31".parse().unwrap())
///     .contribution_amount(500.0)
///     .initial_amount(10_000.0)
///     .account_balance(100_000.0)
///     .margin_ratio(1.5)
///     .reinvest_dividends(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.ticker, "VOO");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Symbol to fetch and simulate
    pub ticker: String,

    /// First date requested from the market-data provider
    pub start_date: NaiveDate,

    /// Last date requested from the market-data provider
    pub end_date: NaiveDate,

    /// Per-period contribution (>= 0)
    pub contribution_amount: f64,

    /// Lump added to the first trading day's contribution (>= 0)
    pub initial_amount: f64,

    /// Reinvest dividends while accumulating
    pub reinvest_dividends: bool,

    /// Starting cash, or `None` for an uncapped external funding source
    pub account_balance: Option<f64>,

    /// Maximum portfolio-value-to-equity ratio when borrowing, in
    /// `[1.0, 2.0]`. Exactly `1.0` disables margin.
    pub margin_ratio: f64,

    /// Equity ratio below which forced liquidation fires, in `(0, 1)`
    pub maintenance_margin: f64,

    /// Net-equity level that triggers the one-way switch to withdrawal mode
    pub withdrawal_threshold: Option<f64>,

    /// Target monthly withdrawal once in withdrawal mode
    pub monthly_withdrawal_amount: Option<f64>,

    /// Contribution cadence
    pub frequency: Frequency,
}

impl SimulationConfig {
    /// Create a builder with the required identity fields set.
    pub fn builder(
        ticker: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SimulationConfigBuilder {
        SimulationConfigBuilder {
            config: SimulationConfig {
                ticker: ticker.into(),
                start_date,
                end_date,
                contribution_amount: 0.0,
                initial_amount: 0.0,
                reinvest_dividends: false,
                account_balance: None,
                margin_ratio: 1.0,
                maintenance_margin: 0.25,
                withdrawal_threshold: None,
                monthly_withdrawal_amount: None,
                frequency: Frequency::Daily,
            },
        }
    }

    /// `true` when cash is tracked rather than drawn from an external source.
    pub fn has_finite_cash(&self) -> bool {
        self.account_balance.is_some()
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(SimulationError::invalid_param("ticker", "must not be empty"));
        }

        if self.end_date < self.start_date {
            return Err(SimulationError::invalid_param(
                "end_date",
                "must not precede start_date",
            ));
        }

        if self.contribution_amount < 0.0 {
            return Err(SimulationError::invalid_param(
                "contribution_amount",
                "cannot be negative",
            ));
        }

        if self.initial_amount < 0.0 {
            return Err(SimulationError::invalid_param(
                "initial_amount",
                "cannot be negative",
            ));
        }

        if let Some(balance) = self.account_balance
            && balance < 0.0
        {
            return Err(SimulationError::invalid_param(
                "account_balance",
                "cannot be negative",
            ));
        }

        if !(1.0..=2.0).contains(&self.margin_ratio) {
            return Err(SimulationError::invalid_param(
                "margin_ratio",
                "must be between 1.0 and 2.0",
            ));
        }

        if self.maintenance_margin <= 0.0 || self.maintenance_margin >= 1.0 {
            return Err(SimulationError::invalid_param(
                "maintenance_margin",
                "must be between 0.0 and 1.0 (exclusive)",
            ));
        }

        if let Some(threshold) = self.withdrawal_threshold
            && threshold < 0.0
        {
            return Err(SimulationError::invalid_param(
                "withdrawal_threshold",
                "cannot be negative",
            ));
        }

        if let Some(amount) = self.monthly_withdrawal_amount
            && amount < 0.0
        {
            return Err(SimulationError::invalid_param(
                "monthly_withdrawal_amount",
                "cannot be negative",
            ));
        }

        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Debug, Clone)]
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    /// Per-period contribution.
    pub fn contribution_amount(mut self, amount: f64) -> Self {
        self.config.contribution_amount = amount;
        self
    }

    /// Lump invested on the first trading day.
    pub fn initial_amount(mut self, amount: f64) -> Self {
        self.config.initial_amount = amount;
        self
    }

    /// Reinvest dividends while accumulating.
    pub fn reinvest_dividends(mut self, reinvest: bool) -> Self {
        self.config.reinvest_dividends = reinvest;
        self
    }

    /// Track a finite starting balance instead of uncapped funding.
    pub fn account_balance(mut self, balance: f64) -> Self {
        self.config.account_balance = Some(balance);
        self
    }

    /// Maximum portfolio-to-equity ratio when borrowing.
    pub fn margin_ratio(mut self, ratio: f64) -> Self {
        self.config.margin_ratio = ratio;
        self
    }

    /// Equity ratio that triggers forced liquidation.
    pub fn maintenance_margin(mut self, margin: f64) -> Self {
        self.config.maintenance_margin = margin;
        self
    }

    /// Net-equity level at which withdrawal mode engages.
    pub fn withdrawal_threshold(mut self, threshold: f64) -> Self {
        self.config.withdrawal_threshold = Some(threshold);
        self
    }

    /// Monthly withdrawal target once in withdrawal mode.
    pub fn monthly_withdrawal_amount(mut self, amount: f64) -> Self {
        self.config.monthly_withdrawal_amount = Some(amount);
        self
    }

    /// Contribution cadence.
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.config.frequency = frequency;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<SimulationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
