use chrono::{Months, NaiveDate, NaiveDateTime, Utc};

use crate::constants::DAYS_PER_MONTH;

/// Current instant as a naive UTC timestamp, the form stored on entities.
pub fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Approximate whole months from `from` to `to` using 30-day months.
pub fn approx_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    days_between(from, to) / DAYS_PER_MONTH
}

/// Adds calendar months, clamping to the end of shorter months.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}
