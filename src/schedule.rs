//! Contribution cadence.
//!
//! A small stateful selector owned by the driver: `tick` answers "does a
//! contribution fall due today" and advances the monthly memo when it does.
//! The first-trading-day rule is the driver's, not the selector's.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::Frequency;

/// Stateful contribution schedule.
#[derive(Debug, Clone)]
pub struct ContributionSchedule {
    frequency: Frequency,
    anchor_weekday: Weekday,
    last_month: Option<(i32, u32)>,
}

impl ContributionSchedule {
    /// Create a schedule anchored at the configured start date.
    ///
    /// Weekly cadence fires on the start date's weekday, whether or not that
    /// weekday turns out to be a trading day in a given week.
    pub fn new(frequency: Frequency, start_date: NaiveDate) -> Self {
        Self {
            frequency,
            anchor_weekday: start_date.weekday(),
            last_month: None,
        }
    }

    /// Whether a contribution falls due on `date`.
    ///
    /// Monthly cadence updates its memo when it fires, so at most one
    /// contribution is due per calendar month.
    pub fn tick(&mut self, date: NaiveDate) -> bool {
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Weekly => date.weekday() == self.anchor_weekday,
            Frequency::Monthly => {
                let month = (date.year(), date.month());
                if self.last_month != Some(month) {
                    self.last_month = Some(month);
                    true
                } else {
                    false
                }
            }
        }
    }
}
