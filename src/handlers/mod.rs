//! Daily event handlers.
//!
//! One handler per event type. Each takes an immutable view of the relevant
//! state plus the day's inputs and returns an outcome struct describing the
//! resulting state; the driver decides whether and how to apply it. Handlers
//! never fail on numeric edges — inapplicable inputs (zero dividend, no
//! debt, zero contribution) yield an unchanged-state outcome.

mod dividend;
mod interest;
mod margin_call;
mod purchase;
mod withdrawal;

pub use self::dividend::{DividendOutcome, process_dividend};
pub use self::interest::{InterestOutcome, process_interest};
pub use self::margin_call::{MarginCallOutcome, execute_margin_call};
pub use self::purchase::{PurchaseOutcome, execute_purchase};
pub use self::withdrawal::{WithdrawalOutcome, execute_monthly_withdrawal};
