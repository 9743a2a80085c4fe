//! Tagged cash representation.
//!
//! A finite balance tracks every dollar; an unbounded balance models an
//! inexhaustible external funding source where per-day cash is not a
//! meaningful quantity.

use serde::{Deserialize, Serialize};

/// Cash held in the account.
///
/// `Unbounded` means contributions are funded externally and no cap is
/// enforced; wherever a formula needs a cash figure, unbounded cash counts
/// as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CashBalance {
    /// Tracked balance in account currency. Never negative after an event.
    Finite(f64),
    /// No cap; contributions draw on an external source.
    Unbounded,
}

impl CashBalance {
    /// Build the starting balance from the configured account balance,
    /// where `None` means "no cap".
    pub fn from_initial(account_balance: Option<f64>) -> Self {
        match account_balance {
            Some(amount) => Self::Finite(amount.max(0.0)),
            None => Self::Unbounded,
        }
    }

    /// Cash usable in equity and liquidation formulas.
    ///
    /// Finite balances are floored at zero; unbounded cash counts as zero.
    pub fn available(&self) -> f64 {
        match self {
            Self::Finite(amount) => amount.max(0.0),
            Self::Unbounded => 0.0,
        }
    }

    /// `true` when this balance is the no-cap sentinel.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// The tracked amount, or `None` when unbounded.
    ///
    /// This is the shape the external result reports per day.
    pub fn tracked(&self) -> Option<f64> {
        match self {
            Self::Finite(amount) => Some(*amount),
            Self::Unbounded => None,
        }
    }

    /// Add income to a finite balance. Unbounded cash is unchanged.
    pub fn deposit(self, amount: f64) -> Self {
        match self {
            Self::Finite(balance) => Self::Finite(balance + amount),
            Self::Unbounded => Self::Unbounded,
        }
    }

    /// Remove up to `amount` from a finite balance, flooring at zero.
    /// Unbounded cash is unchanged.
    pub fn withdraw(self, amount: f64) -> Self {
        match self {
            Self::Finite(balance) => Self::Finite((balance - amount).max(0.0)),
            Self::Unbounded => Self::Unbounded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_initial() {
        assert_eq!(
            CashBalance::from_initial(Some(250.0)),
            CashBalance::Finite(250.0)
        );
        assert_eq!(CashBalance::from_initial(None), CashBalance::Unbounded);
        // Negative input is clamped
        assert_eq!(
            CashBalance::from_initial(Some(-10.0)),
            CashBalance::Finite(0.0)
        );
    }

    #[test]
    fn test_available_treats_unbounded_as_zero() {
        assert_eq!(CashBalance::Unbounded.available(), 0.0);
        assert_eq!(CashBalance::Finite(100.0).available(), 100.0);
        assert_eq!(CashBalance::Finite(-5.0).available(), 0.0);
    }

    #[test]
    fn test_deposit_withdraw() {
        let cash = CashBalance::Finite(100.0).deposit(50.0);
        assert_eq!(cash, CashBalance::Finite(150.0));
        assert_eq!(cash.withdraw(200.0), CashBalance::Finite(0.0));
        assert_eq!(CashBalance::Unbounded.deposit(50.0), CashBalance::Unbounded);
        assert_eq!(
            CashBalance::Unbounded.withdraw(50.0),
            CashBalance::Unbounded
        );
    }

    #[test]
    fn test_tracked() {
        assert_eq!(CashBalance::Finite(42.0).tracked(), Some(42.0));
        assert_eq!(CashBalance::Unbounded.tracked(), None);
    }
}
