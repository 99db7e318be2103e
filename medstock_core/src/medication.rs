//! Stock arithmetic and depletion forecasting for a single medication.
//!
//! Every stock change, whether from the daily reconciliation or a manual
//! edit, goes through [`Medication::update_stock`], which clamps at zero.

use crate::{Medication, Prediction};
use chrono::{Days, NaiveDate};

impl Medication {
    /// Create a new record with no skip history
    pub fn new(name: impl Into<String>, stock: u32, daily_intake: u32, is_sleeping_med: bool) -> Self {
        Self {
            name: name.into(),
            stock,
            daily_intake,
            is_sleeping_med,
            last_skipped: None,
        }
    }

    /// Taken only when needed, never decremented automatically
    pub fn is_as_needed(&self) -> bool {
        self.daily_intake == 0
    }

    /// Add a signed amount to the stock, clamping the result to `0..=u32::MAX`
    pub fn update_stock(&mut self, amount: i64) {
        let next = i64::from(self.stock).saturating_add(amount);
        self.stock = next.clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// Overwrite the stock with an exact count
    pub fn set_stock(&mut self, exact: u32) {
        self.stock = exact;
    }

    /// Deduct `days` worth of scheduled intake; returns the doses actually removed
    pub fn consume_days(&mut self, days: u32) -> u32 {
        if self.is_as_needed() || days == 0 {
            return 0;
        }

        let before = self.stock;
        let due = i64::from(self.daily_intake) * i64::from(days);
        self.update_stock(-due);
        before - self.stock
    }

    /// Credit back one day's dose of a sleeping medication
    ///
    /// Only sleeping medications with a scheduled intake can be skipped, and
    /// only once per calendar day. Returns whether the skip was applied.
    pub fn skip_dose(&mut self, today: NaiveDate) -> bool {
        if !self.is_sleeping_med || self.is_as_needed() {
            return false;
        }
        if self.last_skipped == Some(today) {
            tracing::debug!("{} already skipped on {}", self.name, today);
            return false;
        }

        self.update_stock(i64::from(self.daily_intake));
        self.last_skipped = Some(today);
        true
    }

    /// Forecast when the stock runs out and when to buy more
    ///
    /// `days_left = stock / daily_intake` (floor); the buy date is
    /// `buy_lead_days` before the end date and is allowed to be in the past.
    pub fn predict_end_date(&self, today: NaiveDate, buy_lead_days: u32) -> Prediction {
        if self.is_as_needed() {
            return Prediction::AsNeeded;
        }

        let days_left = u64::from(self.stock / self.daily_intake);
        let end_date = today
            .checked_add_days(Days::new(days_left))
            .unwrap_or(NaiveDate::MAX);
        let buy_date = end_date
            .checked_sub_days(Days::new(u64::from(buy_lead_days)))
            .unwrap_or(NaiveDate::MIN);

        Prediction::Dated { end_date, buy_date }
    }
}
