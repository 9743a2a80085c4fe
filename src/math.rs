//! Pure arithmetic primitives underpinning the event handlers.
//!
//! Every function is total: division is guarded and degenerate inputs
//! produce a documented neutral value instead of panicking.

use crate::constants::MARGIN_RATE_SPREAD;

/// Shares purchasable with `cash` at `price`. Zero when `price <= 0`.
pub fn shares_bought(cash: f64, price: f64) -> f64 {
    if price > 0.0 { cash / price } else { 0.0 }
}

/// Cash income of a dividend of `dps` per share on `shares` held.
pub fn dividend_income(shares: f64, dps: f64) -> f64 {
    shares * dps
}

/// One month of margin interest on `debt` at `annual_rate` plus the broker
/// spread.
pub fn monthly_interest(debt: f64, annual_rate: f64) -> f64 {
    debt * (annual_rate + MARGIN_RATE_SPREAD) / 12.0
}

/// Equity as a fraction of portfolio value.
///
/// `(portfolio_value + max(0, cash) - debt) / portfolio_value`; zero when
/// the portfolio value is not positive. Negative cash counts as zero.
pub fn equity_ratio(portfolio_value: f64, cash: f64, debt: f64) -> f64 {
    if portfolio_value > 0.0 {
        (portfolio_value + cash.max(0.0) - debt) / portfolio_value
    } else {
        0.0
    }
}

/// Portfolio value that restores the equity ratio to exactly
/// `maintenance_margin` after a forced sale whose proceeds repay debt.
///
/// Derived from `equity = portfolio - debt + cash` and
/// `equity = maintenance_margin * portfolio`.
pub fn target_portfolio_for_call(debt: f64, cash: f64, maintenance_margin: f64) -> f64 {
    let remaining = 1.0 - maintenance_margin;
    if remaining > 0.0 {
        (debt - cash.max(0.0)) / remaining
    } else {
        0.0
    }
}

/// Portfolio value over equity; `1.0` when equity is not positive.
pub fn leverage(portfolio_value: f64, cash: f64, debt: f64) -> f64 {
    let equity = portfolio_value + cash.max(0.0) - debt;
    if equity > 0.0 {
        portfolio_value / equity
    } else {
        1.0
    }
}

/// How a withdrawal request is satisfied from cash, share sales, and debt
/// repayment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithdrawalSplit {
    /// Shares that must be sold (not yet clamped to the held position)
    pub shares_to_sell: f64,
    /// Debt repaid out of the combined cash pool
    pub debt_repayment: f64,
    /// Cash actually paid out to the investor
    pub actual_withdrawal: f64,
}

/// Split a withdrawal of `amount` into share sales, debt repayment, and
/// payout.
///
/// Debt repayment has priority over the payout. Negative cash counts as
/// zero; a non-positive price makes share sales impossible.
pub fn split_withdrawal(amount: f64, debt: f64, cash: f64, price: f64) -> WithdrawalSplit {
    let available = cash.max(0.0);
    let needed_from_sales = (debt + amount - available).max(0.0);
    let shares_to_sell = shares_bought(needed_from_sales, price);
    let total_cash = available + shares_to_sell * price;
    let debt_repayment = total_cash.min(debt);
    let actual_withdrawal = (total_cash - debt_repayment).min(amount);
    WithdrawalSplit {
        shares_to_sell,
        debt_repayment,
        actual_withdrawal,
    }
}
