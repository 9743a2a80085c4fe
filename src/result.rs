//! External result shape and assembly.
//!
//! The driver works at full precision and keeps an append-only sequence of
//! per-day records; everything here is presentation. Rounding (two decimal
//! places, four for share counts) happens exactly once, at assembly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DailyRecord, MarginCallEvent, WithdrawalEvent};

/// Round to two decimal places for presentation.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to four decimal places (share counts).
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Aggregate figures for the whole run.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// User principal deployed
    pub total_invested: f64,
    /// Market value of the position on the last day
    pub current_value: f64,
    /// Shares held on the last day
    pub total_shares: f64,
    /// Cumulative dividend income
    pub total_dividends: f64,
    /// Return on invested principal in percent; `None` when nothing was invested
    pub roi: Option<f64>,
    /// Final cash, or `None` in unbounded-cash mode
    pub account_balance: Option<f64>,
    /// Margin debt outstanding on the last day
    pub total_borrowed: f64,
    /// Cumulative margin interest assessed
    pub total_interest_paid: f64,
    /// Leverage on the last day
    pub current_leverage: f64,
    /// Number of margin calls over the run
    pub margin_calls: usize,
    /// `current_value - total_borrowed`
    pub net_portfolio_value: f64,
    /// Average acquisition cost per held share
    pub average_cost: f64,
    /// Whether the run terminated on insolvency
    pub insolvency_detected: bool,
    /// Date insolvency was detected
    pub insolvency_date: Option<NaiveDate>,
    /// Lowest net equity over the run
    pub min_equity_value: f64,
    /// Date of the lowest net equity
    pub min_equity_date: Option<NaiveDate>,
    /// `(min_equity - peak_equity) / peak_equity` as a fraction
    pub actual_max_drawdown: f64,
    /// Cumulative cash withdrawn
    pub total_withdrawn: f64,
    /// Whether withdrawal mode was active at the end
    pub withdrawal_mode_active: bool,
    /// Date withdrawal mode engaged
    pub withdrawal_mode_start_date: Option<NaiveDate>,
}

/// Risk and performance analytics over the net-equity series.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationAnalytics {
    /// Total return on principal in percent
    pub total_return_pct: f64,
    /// Compound annual growth rate in percent
    pub cagr: f64,
    /// Annualised volatility in percent
    pub volatility: f64,
    /// CAGR-based Sharpe ratio
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline in percent (`<= 0`)
    pub max_drawdown: f64,
    /// Date of the drawdown peak
    pub max_drawdown_peak_date: Option<NaiveDate>,
    /// Date of the drawdown trough
    pub max_drawdown_trough_date: Option<NaiveDate>,
    /// Percentage of positive days
    pub win_rate: f64,
    /// Best daily return in percent
    pub best_day: f64,
    /// Date of the best day
    pub best_day_date: Option<NaiveDate>,
    /// Worst daily return in percent
    pub worst_day: f64,
    /// Date of the worst day
    pub worst_day_date: Option<NaiveDate>,
    /// CAGR over drawdown magnitude
    pub calmar_ratio: f64,
    /// Alpha vs the benchmark in percent; filled by the orchestrator
    pub alpha: Option<f64>,
    /// Beta vs the benchmark; filled by the orchestrator
    pub beta: Option<f64>,
}

/// Complete result of one simulation run.
///
/// The per-day vectors are parallel arrays of identical length; event
/// vectors carry the before/after snapshots of every margin call and
/// withdrawal-phase cash flow.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Simulated trading dates
    pub dates: Vec<NaiveDate>,
    /// Running total of deployed principal
    pub invested: Vec<f64>,
    /// Position market value per day
    pub portfolio: Vec<f64>,
    /// Cumulative dividend income per day
    pub dividends: Vec<f64>,
    /// Tracked cash per day, `None` in unbounded-cash mode
    pub balance: Vec<Option<f64>>,
    /// Margin debt per day
    pub borrowed: Vec<f64>,
    /// Cumulative interest per day
    pub interest: Vec<f64>,
    /// `portfolio - borrowed` per day
    pub net_portfolio: Vec<f64>,
    /// Leverage per day
    pub leverage: Vec<f64>,
    /// Average cost per share per day
    pub average_cost: Vec<f64>,
    /// Withdrawal-mode flag per day (monotonically non-decreasing)
    pub withdrawal_mode: Vec<bool>,
    /// Cumulative withdrawals per day
    pub withdrawals: Vec<f64>,
    /// Dates of margin calls
    pub margin_call_dates: Vec<NaiveDate>,
    /// Margin-call details with before/after snapshots
    pub margin_call_details: Vec<MarginCallEvent>,
    /// Dates of withdrawal-phase events
    pub withdrawal_dates: Vec<NaiveDate>,
    /// Withdrawal-phase event details
    pub withdrawal_details: Vec<WithdrawalEvent>,
    /// First simulated date
    pub actual_start_date: NaiveDate,
    /// Aggregate figures
    pub summary: SimulationSummary,
    /// Risk and performance analytics
    pub analytics: SimulationAnalytics,
}

impl SimulationResult {
    /// Map the driver's full-precision records and events to the external
    /// shape, rounding for presentation.
    pub(crate) fn assemble(
        records: &[DailyRecord],
        margin_calls: Vec<MarginCallEvent>,
        withdrawal_events: Vec<WithdrawalEvent>,
        summary: SimulationSummary,
        analytics: SimulationAnalytics,
    ) -> Self {
        let actual_start_date = records
            .first()
            .map(|r| r.date)
            .expect("assemble requires at least one record");

        let margin_calls: Vec<MarginCallEvent> =
            margin_calls.into_iter().map(|e| e.rounded()).collect();
        let withdrawal_events: Vec<WithdrawalEvent> =
            withdrawal_events.into_iter().map(|e| e.rounded()).collect();

        Self {
            dates: records.iter().map(|r| r.date).collect(),
            invested: records.iter().map(|r| round2(r.total_invested)).collect(),
            portfolio: records.iter().map(|r| round2(r.portfolio_value)).collect(),
            dividends: records
                .iter()
                .map(|r| round2(r.cumulative_dividends))
                .collect(),
            balance: records.iter().map(|r| r.cash.map(round2)).collect(),
            borrowed: records.iter().map(|r| round2(r.debt)).collect(),
            interest: records
                .iter()
                .map(|r| round2(r.cumulative_interest))
                .collect(),
            net_portfolio: records.iter().map(|r| round2(r.net_portfolio)).collect(),
            leverage: records.iter().map(|r| round2(r.leverage)).collect(),
            average_cost: records.iter().map(|r| round2(r.average_cost)).collect(),
            withdrawal_mode: records.iter().map(|r| r.withdrawal_mode).collect(),
            withdrawals: records
                .iter()
                .map(|r| round2(r.cumulative_withdrawn))
                .collect(),
            margin_call_dates: margin_calls.iter().map(|e| e.date).collect(),
            margin_call_details: margin_calls,
            withdrawal_dates: withdrawal_events.iter().map(|e| e.date).collect(),
            withdrawal_details: withdrawal_events,
            actual_start_date,
            summary,
            analytics,
        }
    }
}

impl SimulationSummary {
    /// Apply presentation rounding in place.
    pub(crate) fn rounded(mut self) -> Self {
        self.total_invested = round2(self.total_invested);
        self.current_value = round2(self.current_value);
        self.total_shares = round4(self.total_shares);
        self.total_dividends = round2(self.total_dividends);
        self.roi = self.roi.map(round2);
        self.account_balance = self.account_balance.map(round2);
        self.total_borrowed = round2(self.total_borrowed);
        self.total_interest_paid = round2(self.total_interest_paid);
        self.current_leverage = round2(self.current_leverage);
        self.net_portfolio_value = round2(self.net_portfolio_value);
        self.average_cost = round2(self.average_cost);
        self.min_equity_value = round2(self.min_equity_value);
        self.actual_max_drawdown = round2(self.actual_max_drawdown);
        self.total_withdrawn = round2(self.total_withdrawn);
        self
    }
}

impl MarginCallEvent {
    /// Apply presentation rounding in place.
    pub(crate) fn rounded(mut self) -> Self {
        self.price = round2(self.price);
        self.shares_sold = round4(self.shares_sold);
        self.proceeds = round2(self.proceeds);
        self.debt_repaid = round2(self.debt_repaid);
        self.shares_before = round4(self.shares_before);
        self.shares_after = round4(self.shares_after);
        self.debt_before = round2(self.debt_before);
        self.debt_after = round2(self.debt_after);
        self.equity_ratio_before = round2(self.equity_ratio_before);
        self.equity_ratio_after = round2(self.equity_ratio_after);
        self
    }
}

impl WithdrawalEvent {
    /// Apply presentation rounding in place.
    pub(crate) fn rounded(mut self) -> Self {
        self.amount_requested = round2(self.amount_requested);
        self.amount_withdrawn = round2(self.amount_withdrawn);
        self.shares_sold = round4(self.shares_sold);
        self.debt_repaid = round2(self.debt_repaid);
        self.dividend_income = round2(self.dividend_income);
        self.shares_before = round4(self.shares_before);
        self.shares_after = round4(self.shares_after);
        self.debt_before = round2(self.debt_before);
        self.debt_after = round2(self.debt_after);
        self
    }
}

impl SimulationAnalytics {
    /// Apply presentation rounding in place.
    pub(crate) fn rounded(mut self) -> Self {
        self.total_return_pct = round2(self.total_return_pct);
        self.cagr = round2(self.cagr);
        self.volatility = round2(self.volatility);
        self.sharpe_ratio = round2(self.sharpe_ratio);
        self.max_drawdown = round2(self.max_drawdown);
        self.win_rate = round2(self.win_rate);
        self.best_day = round2(self.best_day);
        self.worst_day = round2(self.worst_day);
        self.calmar_ratio = round2(self.calmar_ratio);
        self.alpha = self.alpha.map(round2);
        self.beta = self.beta.map(round2);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(1.004), 1.0);
        assert_eq!(round2(-13.636), -13.64);
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.83333), 1.8333);
        assert_eq!(round4(2.5), 2.5);
    }
}
