//! Core data model: cash representation, price and dividend series,
//! simulation events, and the per-day snapshot record.

mod cash;
mod event;
mod series;
mod snapshot;

pub use self::cash::CashBalance;
pub use self::event::{MarginCallEvent, WithdrawalEvent, WithdrawalKind};
pub use self::series::{DividendPayment, DividendSeries, PricePoint, PriceSeries};
pub use self::snapshot::DailyRecord;
