//! Mutable portfolio state evolved by the daily pipeline.

use chrono::NaiveDate;

use crate::config::SimulationConfig;
use crate::math;
use crate::models::{CashBalance, DailyRecord};

/// Portfolio state owned by the driver for the duration of one run.
///
/// Constructed from the configuration, mutated only through the event
/// handlers, and consumed by the result assembler. Nothing here survives
/// the run.
#[derive(Debug, Clone)]
pub struct PortfolioState {
    /// Fractional shares held
    pub shares: f64,
    /// Total cash ever spent acquiring the held position
    pub cost_basis: f64,
    /// Cash on hand (or the no-cap sentinel)
    pub cash: CashBalance,
    /// Margin debt outstanding
    pub debt: f64,
    /// Original user capital not yet deployed (finite-cash mode only)
    pub available_principal: f64,
    /// Running sum of user principal deployed into purchases
    pub total_invested: f64,
    /// Cumulative dividend income
    pub cumulative_dividends: f64,
    /// Cumulative margin interest assessed
    pub cumulative_interest_paid: f64,
    /// Cumulative cash withdrawn
    pub cumulative_withdrawn: f64,
    /// Month of the most recent interest assessment
    pub last_interest_month: Option<(i32, u32)>,
    /// Month of the most recent withdrawal
    pub last_withdrawal_month: Option<(i32, u32)>,
    /// Whether the one-way decumulation switch has fired
    pub withdrawal_mode_active: bool,
    /// Date the decumulation switch fired
    pub withdrawal_mode_start_date: Option<NaiveDate>,
    /// Whether equity reached zero after the first day
    pub insolvent: bool,
    /// Date insolvency was detected
    pub insolvency_date: Option<NaiveDate>,
    /// Lowest net equity seen over the run
    pub min_equity: f64,
    /// Date of the lowest net equity
    pub min_equity_date: Option<NaiveDate>,
    /// Highest net equity seen over the run
    pub peak_equity: f64,
}

impl PortfolioState {
    /// Starting state for a run of `config`.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            shares: 0.0,
            cost_basis: 0.0,
            cash: CashBalance::from_initial(config.account_balance),
            debt: 0.0,
            available_principal: config.account_balance.unwrap_or(0.0).max(0.0),
            total_invested: 0.0,
            cumulative_dividends: 0.0,
            cumulative_interest_paid: 0.0,
            cumulative_withdrawn: 0.0,
            last_interest_month: None,
            last_withdrawal_month: None,
            withdrawal_mode_active: false,
            withdrawal_mode_start_date: None,
            insolvent: false,
            insolvency_date: None,
            min_equity: f64::INFINITY,
            min_equity_date: None,
            peak_equity: f64::NEG_INFINITY,
        }
    }

    /// Market value of the held position at `price`.
    pub fn portfolio_value(&self, price: f64) -> f64 {
        self.shares * price
    }

    /// Equity including usable cash: `portfolio + max(0, cash) - debt`.
    pub fn equity(&self, price: f64) -> f64 {
        self.portfolio_value(price) + self.cash.available() - self.debt
    }

    /// Net equity excluding cash: `portfolio - debt`.
    pub fn net_equity(&self, price: f64) -> f64 {
        self.portfolio_value(price) - self.debt
    }

    /// Average acquisition cost per held share; zero with no position.
    pub fn average_cost(&self) -> f64 {
        if self.shares > 0.0 {
            self.cost_basis / self.shares
        } else {
            0.0
        }
    }

    /// End-of-day snapshot at `price`.
    pub fn snapshot(&self, date: NaiveDate, price: f64) -> DailyRecord {
        let portfolio_value = self.portfolio_value(price);
        DailyRecord {
            date,
            total_invested: self.total_invested,
            portfolio_value,
            cumulative_dividends: self.cumulative_dividends,
            cash: self.cash.tracked(),
            debt: self.debt,
            cumulative_interest: self.cumulative_interest_paid,
            net_portfolio: portfolio_value - self.debt,
            leverage: math::leverage(portfolio_value, self.cash.available(), self.debt),
            average_cost: self.average_cost(),
            withdrawal_mode: self.withdrawal_mode_active,
            cumulative_withdrawn: self.cumulative_withdrawn,
        }
    }

    /// Advance the run-wide net-equity extrema with the day's close.
    pub fn track_equity(&mut self, date: NaiveDate, net_equity: f64) {
        if net_equity > self.peak_equity {
            self.peak_equity = net_equity;
        }
        if net_equity < self.min_equity {
            self.min_equity = net_equity;
            self.min_equity_date = Some(date);
        }
    }
}
