//! Simulation event records.
//!
//! Events are observability records with before/after snapshots; they never
//! feed back into subsequent simulation logic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forced liquidation triggered by the equity ratio falling below the
/// maintenance margin.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginCallEvent {
    /// Trading date of the call
    pub date: NaiveDate,
    /// Closing price the sale executed at
    pub price: f64,
    /// Shares sold to restore the maintenance margin
    pub shares_sold: f64,
    /// Sale proceeds
    pub proceeds: f64,
    /// Debt repaid out of the proceeds (and any cash on hand)
    pub debt_repaid: f64,
    /// Shares held before the call
    pub shares_before: f64,
    /// Shares held after the call
    pub shares_after: f64,
    /// Margin debt before the call
    pub debt_before: f64,
    /// Margin debt after the call
    pub debt_after: f64,
    /// Equity ratio before the call
    pub equity_ratio_before: f64,
    /// Equity ratio after the call
    pub equity_ratio_after: f64,
}

/// Kind of cash-flow event recorded during the withdrawal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalKind {
    /// Scheduled monthly withdrawal
    Withdrawal,
    /// Debt cleared when the withdrawal threshold was first met
    ThresholdDebtPayoff,
    /// Dividend income received while in withdrawal mode
    Dividend,
}

/// Cash-flow event during the decumulation phase, with before/after state.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalEvent {
    /// Trading date of the event
    pub date: NaiveDate,
    /// What happened
    #[serde(rename = "event_type")]
    pub kind: WithdrawalKind,
    /// Withdrawal amount the schedule asked for (0 for payoff and dividend events)
    pub amount_requested: f64,
    /// Cash actually paid out
    pub amount_withdrawn: f64,
    /// Shares sold to fund the event
    pub shares_sold: f64,
    /// Debt repaid before anything was paid out
    pub debt_repaid: f64,
    /// Dividend income (only for [`WithdrawalKind::Dividend`] events)
    pub dividend_income: f64,
    /// Shares held before the event
    pub shares_before: f64,
    /// Shares held after the event
    pub shares_after: f64,
    /// Margin debt before the event
    pub debt_before: f64,
    /// Margin debt after the event
    pub debt_after: f64,
}
