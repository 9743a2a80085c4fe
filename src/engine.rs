//! Simulation driver: the ordered daily pipeline.
//!
//! For each trading day, in this exact order: margin call, insolvency probe,
//! withdrawal-mode transition, monthly withdrawal, dividend, monthly
//! interest, contribution. The order is a behavioural contract — it keeps a
//! dividend from resurrecting an insolvent account and keeps freshly
//! borrowed cash from funding interest payments.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::analytics;
use crate::config::SimulationConfig;
use crate::constants::SHARPE_RISK_FREE_RATE;
use crate::error::{Result, SimulationError};
use crate::handlers;
use crate::math;
use crate::models::{
    DailyRecord, DividendSeries, MarginCallEvent, PriceSeries, WithdrawalEvent, WithdrawalKind,
};
use crate::rates::RateTable;
use crate::result::{SimulationAnalytics, SimulationResult, SimulationSummary};
use crate::schedule::ContributionSchedule;
use crate::state::PortfolioState;

fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// Run the daily simulation over an aligned price series.
///
/// The series and dividends come from the market-data provider; the rate
/// table supplies the base annual rate for interest months. Configuration is
/// assumed validated at the boundary. An empty or null-laden price history
/// yields [`SimulationError::DataUnavailable`]; everything else — including
/// insolvency, which terminates the run early — is a normal result.
pub fn simulate(
    config: &SimulationConfig,
    prices: &PriceSeries,
    dividends: &DividendSeries,
    rates: &RateTable,
) -> Result<SimulationResult> {
    if prices.is_empty() {
        return Err(SimulationError::unavailable(
            &config.ticker,
            "no price history in the requested window",
        ));
    }
    if prices.points().iter().any(|p| !p.close.is_finite()) {
        return Err(SimulationError::unavailable(
            &config.ticker,
            "price history contains null closes",
        ));
    }

    info!(
        "Simulating {} over {} trading days",
        config.ticker,
        prices.len()
    );

    let mut state = PortfolioState::new(config);
    let mut schedule = ContributionSchedule::new(config.frequency, config.start_date);
    let mut records: Vec<DailyRecord> = Vec::with_capacity(prices.len());
    let mut margin_calls: Vec<MarginCallEvent> = Vec::new();
    let mut withdrawal_events: Vec<WithdrawalEvent> = Vec::new();
    let mut first_day = true;

    for point in prices.points() {
        let (date, price) = (point.date, point.close);

        // 1. Margin call, before the day's dividend can paper over a breach.
        if config.margin_ratio > 1.0 && state.debt > 0.0 && state.shares > 0.0 {
            let ratio_before =
                math::equity_ratio(state.portfolio_value(price), state.cash.available(), state.debt);
            let out = handlers::execute_margin_call(
                state.shares,
                price,
                state.debt,
                state.cash,
                config.maintenance_margin,
            );
            if out.triggered {
                debug!(
                    "Margin call on {date}: sold {:.4} shares at {price}",
                    out.shares_sold
                );
                margin_calls.push(MarginCallEvent {
                    date,
                    price,
                    shares_sold: out.shares_sold,
                    proceeds: out.proceeds,
                    debt_repaid: out.debt_repaid,
                    shares_before: state.shares,
                    shares_after: out.shares,
                    debt_before: state.debt,
                    debt_after: out.debt,
                    equity_ratio_before: ratio_before,
                    equity_ratio_after: math::equity_ratio(
                        out.shares * price,
                        out.cash.available(),
                        out.debt,
                    ),
                });
                state.shares = out.shares;
                state.cash = out.cash;
                state.debt = out.debt;
            }
        }

        // 2. Insolvency probe. Terminal; no event can resurrect the account.
        if !first_day && state.equity(price) <= 0.0 {
            state.insolvent = true;
            state.insolvency_date = Some(date);
            debug!("Insolvency detected on {date}");
            let record = state.snapshot(date, price);
            state.track_equity(date, record.net_portfolio);
            records.push(record);
            break;
        }

        // 3. One-way transition to the decumulation phase.
        if !state.withdrawal_mode_active
            && let Some(threshold) = config.withdrawal_threshold
            && state.equity(price) >= threshold
        {
            if state.debt > 0.0 {
                let out = handlers::execute_monthly_withdrawal(
                    0.0,
                    state.shares,
                    price,
                    state.debt,
                    state.cash,
                    state.cost_basis,
                );
                withdrawal_events.push(WithdrawalEvent {
                    date,
                    kind: WithdrawalKind::ThresholdDebtPayoff,
                    amount_requested: 0.0,
                    amount_withdrawn: out.withdrawn,
                    shares_sold: out.shares_sold,
                    debt_repaid: out.debt_repaid,
                    dividend_income: 0.0,
                    shares_before: state.shares,
                    shares_after: out.shares,
                    debt_before: state.debt,
                    debt_after: out.debt,
                });
                state.shares = out.shares;
                state.cash = out.cash;
                state.debt = out.debt;
                state.cost_basis = out.cost_basis;
            }
            state.withdrawal_mode_active = true;
            state.withdrawal_mode_start_date = Some(date);
            info!("Withdrawal mode engaged on {date}");
        }

        // 4. Monthly withdrawal.
        if state.withdrawal_mode_active
            && let Some(amount) = config.monthly_withdrawal_amount
            && amount > 0.0
            && state.last_withdrawal_month != Some(month_of(date))
        {
            let out = handlers::execute_monthly_withdrawal(
                amount,
                state.shares,
                price,
                state.debt,
                state.cash,
                state.cost_basis,
            );
            withdrawal_events.push(WithdrawalEvent {
                date,
                kind: WithdrawalKind::Withdrawal,
                amount_requested: amount,
                amount_withdrawn: out.withdrawn,
                shares_sold: out.shares_sold,
                debt_repaid: out.debt_repaid,
                dividend_income: 0.0,
                shares_before: state.shares,
                shares_after: out.shares,
                debt_before: state.debt,
                debt_after: out.debt,
            });
            state.shares = out.shares;
            state.cash = out.cash;
            state.debt = out.debt;
            state.cost_basis = out.cost_basis;
            state.cumulative_withdrawn += out.withdrawn;
            state.last_withdrawal_month = Some(month_of(date));
        }

        // 5. Dividend, computed on shares held right now — the day-one
        // contribution earns nothing.
        let dps = dividends.per_share_on(date);
        let reinvest_today = config.reinvest_dividends && !state.withdrawal_mode_active;
        let out = handlers::process_dividend(
            state.shares,
            dps,
            price,
            reinvest_today,
            state.cash,
            state.cost_basis,
        );
        if out.income > 0.0 {
            state.cumulative_dividends += out.income;
            state.shares += out.shares_added;
            state.cost_basis = out.cost_basis;
            state.cash = out.cash;
            if state.withdrawal_mode_active {
                withdrawal_events.push(WithdrawalEvent {
                    date,
                    kind: WithdrawalKind::Dividend,
                    amount_requested: 0.0,
                    amount_withdrawn: 0.0,
                    shares_sold: 0.0,
                    debt_repaid: 0.0,
                    dividend_income: out.income,
                    shares_before: state.shares,
                    shares_after: state.shares,
                    debt_before: state.debt,
                    debt_after: state.debt,
                });
            }
        }

        // 6. Monthly interest. The memo advances on every month boundary;
        // interest is assessed only when debt is outstanding.
        let month = month_of(date);
        if state.last_interest_month != Some(month) {
            if state.debt > 0.0 {
                let rate = rates.rate_for(date);
                let out = handlers::process_interest(state.debt, rate, state.cash);
                state.cash = out.cash;
                state.debt = out.debt;
                state.cumulative_interest_paid += out.interest;
            }
            state.last_interest_month = Some(month);
        }

        // 7. Contribution. Suppressed for good once decumulation starts.
        if !state.withdrawal_mode_active {
            let due = schedule.tick(date);
            if first_day || due {
                let mut desired = config.contribution_amount;
                if first_day {
                    desired += config.initial_amount;
                }
                if desired > 0.0 {
                    let out = handlers::execute_purchase(
                        desired,
                        price,
                        state.cash,
                        state.debt,
                        config.margin_ratio,
                        state.shares,
                        state.available_principal,
                    );
                    state.shares += out.shares_bought;
                    state.cost_basis += out.actual_investment;
                    state.cash = out.cash;
                    state.debt = out.debt;
                    if state.cash.is_unbounded() {
                        state.total_invested += out.cash_used;
                    } else {
                        state.total_invested += out.principal_used;
                        state.available_principal =
                            (state.available_principal - out.principal_used).max(0.0);
                    }
                }
            }
        }

        let record = state.snapshot(date, price);
        state.track_equity(date, record.net_portfolio);
        records.push(record);
        first_day = false;
    }

    let analytics = compute_analytics(&records, state.total_invested);
    let summary = build_summary(&records, &state, margin_calls.len());

    info!(
        "Simulation of {} finished: {} days, invested {:.2}",
        config.ticker,
        records.len(),
        state.total_invested
    );

    Ok(SimulationResult::assemble(
        &records,
        margin_calls,
        withdrawal_events,
        summary.rounded(),
        analytics.rounded(),
    ))
}

/// Analytics over the net-equity series at full precision.
fn compute_analytics(records: &[DailyRecord], total_invested: f64) -> SimulationAnalytics {
    let equity: Vec<f64> = records.iter().map(|r| r.net_portfolio).collect();
    let final_value = equity.last().copied().unwrap_or(0.0);

    let total_return = analytics::total_return_pct(total_invested, final_value);
    let cagr = analytics::cagr(total_invested, final_value, equity.len());
    let returns = analytics::daily_returns(&equity);
    let volatility = analytics::volatility(&returns);
    let sharpe = analytics::sharpe_ratio(cagr / 100.0, volatility, SHARPE_RISK_FREE_RATE);
    let drawdown = analytics::max_drawdown(&equity);
    let best_worst = analytics::best_worst_days(&returns);

    SimulationAnalytics {
        total_return_pct: total_return,
        cagr,
        volatility,
        sharpe_ratio: sharpe,
        max_drawdown: drawdown.pct,
        max_drawdown_peak_date: (drawdown.pct < 0.0).then(|| records[drawdown.peak_idx].date),
        max_drawdown_trough_date: (drawdown.pct < 0.0).then(|| records[drawdown.trough_idx].date),
        win_rate: analytics::win_rate(&returns),
        best_day: best_worst.map(|bw| bw.best_pct).unwrap_or(0.0),
        best_day_date: best_worst.map(|bw| records[bw.best_idx].date),
        worst_day: best_worst.map(|bw| bw.worst_pct).unwrap_or(0.0),
        worst_day_date: best_worst.map(|bw| records[bw.worst_idx].date),
        calmar_ratio: analytics::calmar_ratio(cagr, drawdown.pct),
        alpha: None,
        beta: None,
    }
}

/// Aggregate summary at full precision.
fn build_summary(
    records: &[DailyRecord],
    state: &PortfolioState,
    margin_call_count: usize,
) -> SimulationSummary {
    let last = records.last().expect("simulate produces at least one record");

    let roi = if state.total_invested > 0.0 {
        Some(100.0 * (last.net_portfolio - state.total_invested) / state.total_invested)
    } else {
        None
    };

    let actual_max_drawdown = if state.peak_equity > 0.0 {
        (state.min_equity - state.peak_equity) / state.peak_equity
    } else {
        0.0
    };

    SimulationSummary {
        total_invested: state.total_invested,
        current_value: last.portfolio_value,
        total_shares: state.shares,
        total_dividends: state.cumulative_dividends,
        roi,
        account_balance: state.cash.tracked(),
        total_borrowed: state.debt,
        total_interest_paid: state.cumulative_interest_paid,
        current_leverage: last.leverage,
        margin_calls: margin_call_count,
        net_portfolio_value: last.net_portfolio,
        average_cost: state.average_cost(),
        insolvency_detected: state.insolvent,
        insolvency_date: state.insolvency_date,
        min_equity_value: if state.min_equity.is_finite() {
            state.min_equity
        } else {
            0.0
        },
        min_equity_date: state.min_equity_date,
        actual_max_drawdown,
        total_withdrawn: state.cumulative_withdrawn,
        withdrawal_mode_active: state.withdrawal_mode_active,
        withdrawal_mode_start_date: state.withdrawal_mode_start_date,
    }
}
