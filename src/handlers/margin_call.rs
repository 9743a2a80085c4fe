//! Forced liquidation when equity falls below the maintenance margin.

use crate::math;
use crate::models::CashBalance;

/// Result of a margin-call check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginCallOutcome {
    /// Shares after any forced sale
    pub shares: f64,
    /// Cash after proceeds and debt repayment
    pub cash: CashBalance,
    /// Debt after repayment
    pub debt: f64,
    /// Whether a forced sale happened
    pub triggered: bool,
    /// Shares sold
    pub shares_sold: f64,
    /// Sale proceeds
    pub proceeds: f64,
    /// Debt repaid out of cash plus proceeds
    pub debt_repaid: f64,
}

/// Check the maintenance margin and liquidate if violated.
///
/// Sells just enough to bring the portfolio down to the target value that
/// restores the maintenance ratio; when no partial sale can achieve that the
/// whole position goes. With finite cash the proceeds join cash and debt is
/// repaid from the combined pool; with unbounded cash the debt is settled
/// externally and stays on the book.
pub fn execute_margin_call(
    shares: f64,
    price: f64,
    debt: f64,
    cash: CashBalance,
    maintenance_margin: f64,
) -> MarginCallOutcome {
    let portfolio_value = shares * price;
    let ratio = math::equity_ratio(portfolio_value, cash.available(), debt);
    if ratio >= maintenance_margin {
        return MarginCallOutcome {
            shares,
            cash,
            debt,
            triggered: false,
            shares_sold: 0.0,
            proceeds: 0.0,
            debt_repaid: 0.0,
        };
    }

    let target = math::target_portfolio_for_call(debt, cash.available(), maintenance_margin);
    let shares_sold = if target > 0.0 && target < portfolio_value {
        ((portfolio_value - target) / price).min(shares)
    } else {
        shares
    };
    let proceeds = shares_sold * price;

    let (new_cash, new_debt, debt_repaid) = match cash {
        CashBalance::Unbounded => (cash, debt, 0.0),
        CashBalance::Finite(balance) => {
            let pool = balance.max(0.0) + proceeds;
            let repaid = pool.min(debt);
            (CashBalance::Finite(pool - repaid), debt - repaid, repaid)
        }
    };

    MarginCallOutcome {
        shares: shares - shares_sold,
        cash: new_cash,
        debt: new_debt,
        triggered: true,
        shares_sold,
        proceeds,
        debt_repaid,
    }
}
