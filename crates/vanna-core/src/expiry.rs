//! US-equity option expiry clock math.
//!
//! US equity options stop trading at 4:00 PM US Eastern on their expiry
//! date. The conversion to UTC applies the statutory DST rule (second
//! Sunday of March through first Sunday of November) directly, so no
//! timezone database is required.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};

/// Hours an option is kept after expiry close before it is dropped
/// from a cycle, giving the upstream feed time to settle quantities.
pub const EXPIRY_GRACE_HOURS: i64 = 2;

/// Seconds in the year used for time-to-expiry, 365.25 days.
const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

fn nth_sunday(year: i32, month: u32, nth: u32) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
    let offset = (Weekday::Sun.num_days_from_monday() + 7
        - first.weekday().num_days_from_monday())
        % 7;
    first + chrono::Duration::days(i64::from(offset + (nth - 1) * 7))
}

/// True if US Eastern time observes DST on `date`.
#[must_use]
pub fn is_us_eastern_dst(date: NaiveDate) -> bool {
    let start = nth_sunday(date.year(), 3, 2);
    let end = nth_sunday(date.year(), 11, 1);
    date >= start && date < end
}

/// UTC instant of 4:00 PM US Eastern on the given expiry calendar date.
#[must_use]
pub fn expiry_close_utc(expiry: NaiveDate) -> DateTime<Utc> {
    let utc_hour = if is_us_eastern_dst(expiry) { 20 } else { 21 };
    Utc.with_ymd_and_hms(
        expiry.year(),
        expiry.month(),
        expiry.day(),
        utc_hour,
        0,
        0,
    )
    .single()
    .expect("expiry close is an unambiguous UTC instant")
}

/// Time remaining until expiry close, in years of 365.25 days.
///
/// Negative once the option has expired; callers treat `<= 0` as the
/// intrinsic-value regime.
#[must_use]
pub fn time_to_expiry_years(expiry: NaiveDate, now: DateTime<Utc>) -> f64 {
    let secs = (expiry_close_utc(expiry) - now).num_seconds() as f64;
    secs / SECONDS_PER_YEAR
}

/// Whole calendar days remaining until expiry close, floored at zero.
///
/// On expiry day before the close this reports 0, not 1.
#[must_use]
pub fn days_to_expiry(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
    let secs = (expiry_close_utc(expiry) - now).num_seconds();
    (secs / 86_400).max(0)
}

/// True once `now` is more than [`EXPIRY_GRACE_HOURS`] past the expiry
/// close; such options are ignored for the rest of the process.
#[must_use]
pub fn expired_beyond_grace(expiry: NaiveDate, now: DateTime<Utc>) -> bool {
    now - expiry_close_utc(expiry) > chrono::Duration::hours(EXPIRY_GRACE_HOURS)
}
