use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};

/// Weekly options settle on Fridays at 08:00 UTC.
pub const EXPIRY_WEEKDAY: Weekday = Weekday::Fri;
pub const EXPIRY_HOUR: i64 = 8;

const SECONDS_PER_YEAR: f64 = 365.0 * 86_400.0;

/// First Friday 08:00 UTC strictly after `now`.
pub fn next_weekly_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_ahead = (EXPIRY_WEEKDAY.num_days_from_monday() + 7
        - now.weekday().num_days_from_monday())
        % 7;
    let date = now.date_naive() + Duration::days(i64::from(days_ahead));
    let expiry =
        Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)) + Duration::hours(EXPIRY_HOUR);
    if expiry > now {
        expiry
    } else {
        expiry + Duration::days(7)
    }
}

/// Time from `now` to the next weekly expiry, in years of 365 days.
pub fn years_until_next_expiry(now: DateTime<Utc>) -> f64 {
    let remaining = next_weekly_expiry(now) - now;
    remaining.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_YEAR
}
