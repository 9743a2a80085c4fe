//! Contribution execution: cash first, then margin up to buying power.

use crate::math;
use crate::models::CashBalance;

/// Result of executing a scheduled contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseOutcome {
    /// Shares acquired
    pub shares_bought: f64,
    /// Cash drawn from the account
    pub cash_used: f64,
    /// Amount borrowed on margin
    pub margin_borrowed: f64,
    /// Total actually invested (`cash_used + margin_borrowed`)
    pub actual_investment: f64,
    /// Portion of `cash_used` that was original user principal
    pub principal_used: f64,
    /// Cash after the purchase
    pub cash: CashBalance,
    /// Debt after the purchase
    pub debt: f64,
}

impl PurchaseOutcome {
    fn nothing(cash: CashBalance, debt: f64) -> Self {
        Self {
            shares_bought: 0.0,
            cash_used: 0.0,
            margin_borrowed: 0.0,
            actual_investment: 0.0,
            principal_used: 0.0,
            cash,
            debt,
        }
    }
}

/// Execute a contribution of `desired` at the day's close.
///
/// Unbounded cash funds the full amount externally and never borrows. With
/// finite cash the contribution is funded from cash first; when margin is
/// enabled (`margin_ratio > 1`) the remainder is borrowed, capped at the
/// remaining buying power `equity * margin_ratio - portfolio_value`.
///
/// `available_principal` bounds how much of the cash draw counts as user
/// principal (dividend income sitting in cash does not).
pub fn execute_purchase(
    desired: f64,
    price: f64,
    cash: CashBalance,
    debt: f64,
    margin_ratio: f64,
    shares: f64,
    available_principal: f64,
) -> PurchaseOutcome {
    if desired <= 0.0 {
        return PurchaseOutcome::nothing(cash, debt);
    }

    match cash {
        CashBalance::Unbounded => PurchaseOutcome {
            shares_bought: math::shares_bought(desired, price),
            cash_used: desired,
            margin_borrowed: 0.0,
            actual_investment: desired,
            principal_used: desired,
            cash,
            debt,
        },
        CashBalance::Finite(_) => {
            let available = cash.available();
            let (actual, cash_used) = if margin_ratio <= 1.0 {
                let actual = desired.min(available);
                (actual, actual)
            } else if available >= desired {
                (desired, desired)
            } else {
                let portfolio_value = shares * price;
                let equity = portfolio_value + available - debt;
                let max_additional = (equity * margin_ratio - portfolio_value).max(0.0);
                let actual = desired.min(max_additional);
                (actual, actual.min(available))
            };
            let margin_borrowed = actual - cash_used;

            PurchaseOutcome {
                shares_bought: math::shares_bought(actual, price),
                cash_used,
                margin_borrowed,
                actual_investment: actual,
                principal_used: cash_used.min(available_principal),
                cash: cash.withdraw(cash_used),
                debt: debt + margin_borrowed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_contribution_is_a_noop() {
        let out = execute_purchase(0.0, 100.0, CashBalance::Finite(500.0), 0.0, 2.0, 0.0, 500.0);
        assert_eq!(out.shares_bought, 0.0);
        assert_eq!(out.cash, CashBalance::Finite(500.0));
    }

    #[test]
    fn test_unbounded_cash_never_borrows() {
        let out = execute_purchase(100.0, 50.0, CashBalance::Unbounded, 0.0, 2.0, 0.0, 0.0);
        assert_eq!(out.shares_bought, 2.0);
        assert_eq!(out.cash_used, 100.0);
        assert_eq!(out.margin_borrowed, 0.0);
        assert_eq!(out.principal_used, 100.0);
        assert_eq!(out.cash, CashBalance::Unbounded);
        assert_eq!(out.debt, 0.0);
    }

    #[test]
    fn test_no_margin_caps_at_cash() {
        let out = execute_purchase(100.0, 100.0, CashBalance::Finite(50.0), 0.0, 1.0, 2.0, 50.0);
        assert_eq!(out.actual_investment, 50.0);
        assert_eq!(out.margin_borrowed, 0.0);
        assert_eq!(out.cash, CashBalance::Finite(0.0));
        assert_eq!(out.shares_bought, 0.5);
    }

    #[test]
    fn test_margin_skipped_when_cash_suffices() {
        let out = execute_purchase(
            100.0,
            100.0,
            CashBalance::Finite(500.0),
            0.0,
            2.0,
            0.0,
            500.0,
        );
        assert_eq!(out.cash_used, 100.0);
        assert_eq!(out.margin_borrowed, 0.0);
        assert_eq!(out.debt, 0.0);
    }

    #[test]
    fn test_borrows_up_to_buying_power() {
        // No position yet, $10k cash, 2x margin: buying power is $20k
        let out = execute_purchase(
            25_000.0,
            100.0,
            CashBalance::Finite(10_000.0),
            0.0,
            2.0,
            0.0,
            10_000.0,
        );
        assert_eq!(out.actual_investment, 20_000.0);
        assert_eq!(out.cash_used, 10_000.0);
        assert_eq!(out.margin_borrowed, 10_000.0);
        assert_eq!(out.principal_used, 10_000.0);
        assert_eq!(out.debt, 10_000.0);
        assert_eq!(out.shares_bought, 200.0);
    }

    #[test]
    fn test_small_shortfall_is_borrowed_in_full() {
        // $50 cash, wants $100, plenty of buying power
        let out = execute_purchase(
            100.0,
            100.0,
            CashBalance::Finite(50.0),
            0.0,
            2.0,
            10.0,
            50.0,
        );
        assert_eq!(out.actual_investment, 100.0);
        assert_eq!(out.cash_used, 50.0);
        assert_eq!(out.margin_borrowed, 50.0);
    }

    #[test]
    fn test_exhausted_buying_power_invests_nothing() {
        // Fully levered: equity * ratio equals current exposure
        let out = execute_purchase(
            100.0,
            100.0,
            CashBalance::Finite(0.0),
            10_000.0,
            2.0,
            200.0,
            0.0,
        );
        assert_eq!(out.actual_investment, 0.0);
        assert_eq!(out.margin_borrowed, 0.0);
        assert_eq!(out.debt, 10_000.0);
    }

    #[test]
    fn test_principal_capped_by_available_principal() {
        // $60 in cash but only $40 of it is original principal
        let out = execute_purchase(60.0, 100.0, CashBalance::Finite(60.0), 0.0, 1.0, 0.0, 40.0);
        assert_eq!(out.cash_used, 60.0);
        assert_eq!(out.principal_used, 40.0);
    }
}
