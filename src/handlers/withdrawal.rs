//! Monthly withdrawal execution with debt-first priority.

use crate::math;
use crate::models::CashBalance;

/// Result of a withdrawal (or a zero-amount debt payoff).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithdrawalOutcome {
    /// Shares after the sale
    pub shares: f64,
    /// Cash after the event
    pub cash: CashBalance,
    /// Debt after repayment
    pub debt: f64,
    /// Cost basis after the proportional reduction
    pub cost_basis: f64,
    /// Shares sold (clamped to the held position)
    pub shares_sold: f64,
    /// Debt repaid out of the combined cash pool
    pub debt_repaid: f64,
    /// Cash actually paid out
    pub withdrawn: f64,
}

/// Withdraw `amount`, selling shares as needed and repaying debt first.
///
/// With `amount == 0` this clears as much outstanding debt as the position
/// allows — the path taken when withdrawal mode first engages. The sale
/// reduces the cost basis proportionally; with finite cash any leftover from
/// the pool stays as cash, with unbounded cash the balance is untouched.
pub fn execute_monthly_withdrawal(
    amount: f64,
    shares: f64,
    price: f64,
    debt: f64,
    cash: CashBalance,
    cost_basis: f64,
) -> WithdrawalOutcome {
    let split = math::split_withdrawal(amount, debt, cash.available(), price);
    let shares_sold = split.shares_to_sell.min(shares);

    let cost_basis = if shares > 0.0 {
        cost_basis * (1.0 - shares_sold / shares)
    } else {
        cost_basis
    };

    // Recompute from the clamped sale: the pool may fall short of the split's
    // targets when the position could not cover them.
    let proceeds = shares_sold * price;
    let pool = cash.available() + proceeds;
    let debt_repaid = pool.min(debt);
    let withdrawn = (pool - debt_repaid).min(amount);

    let new_cash = match cash {
        CashBalance::Unbounded => CashBalance::Unbounded,
        CashBalance::Finite(_) => CashBalance::Finite(pool - debt_repaid - withdrawn),
    };

    WithdrawalOutcome {
        shares: shares - shares_sold,
        cash: new_cash,
        debt: debt - debt_repaid,
        cost_basis,
        shares_sold,
        debt_repaid,
        withdrawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_covers_withdrawal() {
        let out = execute_monthly_withdrawal(
            5_000.0,
            100.0,
            100.0,
            0.0,
            CashBalance::Finite(10_000.0),
            10_000.0,
        );
        assert_eq!(out.shares_sold, 0.0);
        assert_eq!(out.withdrawn, 5_000.0);
        assert_eq!(out.cash, CashBalance::Finite(5_000.0));
        assert_eq!(out.cost_basis, 10_000.0);
    }

    #[test]
    fn test_sells_to_cover_shortfall() {
        let out = execute_monthly_withdrawal(
            5_000.0,
            100.0,
            100.0,
            0.0,
            CashBalance::Finite(2_000.0),
            10_000.0,
        );
        assert_eq!(out.shares_sold, 30.0);
        assert_eq!(out.shares, 70.0);
        assert_eq!(out.withdrawn, 5_000.0);
        assert_eq!(out.cash, CashBalance::Finite(0.0));
        // Basis reduced by the 30% of the position sold
        assert!((out.cost_basis - 7_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_debt_repaid_before_payout() {
        let out = execute_monthly_withdrawal(
            5_000.0,
            200.0,
            100.0,
            8_000.0,
            CashBalance::Finite(1_000.0),
            20_000.0,
        );
        assert_eq!(out.shares_sold, 120.0);
        assert_eq!(out.debt_repaid, 8_000.0);
        assert_eq!(out.debt, 0.0);
        assert_eq!(out.withdrawn, 5_000.0);
    }

    #[test]
    fn test_zero_amount_clears_debt() {
        let out = execute_monthly_withdrawal(
            0.0,
            100.0,
            100.0,
            3_000.0,
            CashBalance::Unbounded,
            10_000.0,
        );
        assert_eq!(out.shares_sold, 30.0);
        assert_eq!(out.debt_repaid, 3_000.0);
        assert_eq!(out.debt, 0.0);
        assert_eq!(out.withdrawn, 0.0);
        assert_eq!(out.cash, CashBalance::Unbounded);
    }

    #[test]
    fn test_cannot_oversell_position() {
        // Wants 50 shares' worth but only 20 held
        let out = execute_monthly_withdrawal(
            5_000.0,
            20.0,
            100.0,
            0.0,
            CashBalance::Finite(0.0),
            2_000.0,
        );
        assert_eq!(out.shares_sold, 20.0);
        assert_eq!(out.shares, 0.0);
        assert_eq!(out.withdrawn, 2_000.0);
        assert_eq!(out.cost_basis, 0.0);
    }

    #[test]
    fn test_noop_when_nothing_to_do() {
        let out = execute_monthly_withdrawal(
            0.0,
            100.0,
            100.0,
            0.0,
            CashBalance::Finite(500.0),
            10_000.0,
        );
        assert_eq!(out.shares_sold, 0.0);
        assert_eq!(out.debt_repaid, 0.0);
        assert_eq!(out.withdrawn, 0.0);
        assert_eq!(out.cash, CashBalance::Finite(500.0));
    }
}
