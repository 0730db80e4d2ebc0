use chrono::{DateTime, NaiveDate, Utc};

/// Nominal annual rate the projection starts from.
pub const ANNUAL_BASE_RATE: f64 = 0.07;

/// Amount the daily rate grows by for every day already elapsed.
pub const DAILY_RATE_STEP: f64 = 0.000001;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Projects the current value of an investment from its principal and age.
///
/// The projection compounds daily, and the daily rate itself rises linearly
/// with the number of days already elapsed:
///
/// ```text
/// amount = principal
/// for d in 0..elapsed_days:
///     amount *= 1 + (0.07 / 365 + d * 0.000001)
/// ```
///
/// The loop must stay iterative; a closed form does not reproduce the same
/// floating-point result.
///
/// Pure. "Today" is always passed in, never read from a clock.
pub struct GrowthService;

impl GrowthService {
    pub fn new() -> Self {
        Self
    }

    /// Whole days between the purchase date and `as_of`.
    /// Negative when the purchase date lies in the future.
    pub fn elapsed_days(&self, purchase_date: NaiveDate, as_of: NaiveDate) -> i64 {
        (as_of - purchase_date).num_days()
    }

    /// Whole days between midnight UTC of the purchase date and `now`,
    /// floored (so a partial day does not count).
    pub fn elapsed_days_at(&self, purchase_date: NaiveDate, now: DateTime<Utc>) -> i64 {
        let start = purchase_date.and_time(chrono::NaiveTime::MIN).and_utc();
        (now - start).num_milliseconds().div_euclid(MILLIS_PER_DAY)
    }

    /// Projected value on `as_of`, rounded to 2 decimal places.
    ///
    /// Total over every input: a future purchase date or a zero principal
    /// simply yields the principal back. No validation happens here.
    pub fn current_value(&self, principal: f64, purchase_date: NaiveDate, as_of: NaiveDate) -> f64 {
        self.compound(principal, self.elapsed_days(purchase_date, as_of))
    }

    /// Same as [`current_value`](Self::current_value) but measured against a timestamp.
    pub fn current_value_at(
        &self,
        principal: f64,
        purchase_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> f64 {
        self.compound(principal, self.elapsed_days_at(purchase_date, now))
    }

    fn compound(&self, principal: f64, days: i64) -> f64 {
        let daily_base_rate = ANNUAL_BASE_RATE / 365.0;
        let mut amount = principal;
        for d in 0..days {
            amount *= 1.0 + (daily_base_rate + d as f64 * DAILY_RATE_STEP);
        }
        round_cents(amount)
    }
}

impl Default for GrowthService {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to 2 decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
