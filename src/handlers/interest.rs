//! Monthly margin interest assessment.

use crate::math;
use crate::models::CashBalance;

/// Result of one month's interest assessment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestOutcome {
    /// Cash after paying what could be paid
    pub cash: CashBalance,
    /// Debt after capitalising any shortfall
    pub debt: f64,
    /// Interest assessed this month
    pub interest: f64,
}

/// Assess one month of interest on `debt` at the given annual rate.
///
/// Finite cash pays the bill first; whatever cash cannot cover is
/// capitalised into the debt. Unbounded cash settles the bill externally,
/// so the debt is unchanged. No debt, no interest.
pub fn process_interest(debt: f64, annual_rate: f64, cash: CashBalance) -> InterestOutcome {
    if debt <= 0.0 {
        return InterestOutcome {
            cash,
            debt,
            interest: 0.0,
        };
    }

    let interest = math::monthly_interest(debt, annual_rate);
    match cash {
        CashBalance::Unbounded => InterestOutcome {
            cash,
            debt,
            interest,
        },
        CashBalance::Finite(balance) => {
            let paid = balance.max(0.0).min(interest);
            let shortfall = interest - paid;
            InterestOutcome {
                cash: CashBalance::Finite((balance - paid).max(0.0)),
                debt: debt + shortfall,
                interest,
            }
        }
    }
}
