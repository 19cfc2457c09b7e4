use anyhow::{anyhow, Result};
use chrono::{Datelike, Locale, NaiveDate, NaiveTime, TimeZone, Utc};

pub fn parse_locale(name: &str) -> Result<Locale> {
    Locale::try_from(name).map_err(|_| anyhow!("Unknown locale '{}'", name))
}

/// Full weekday name of `date` in `locale`, e.g. "Montag" for `de_DE`.
pub fn day_name(date: NaiveDate, locale: Locale) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
        .format_localized("%A", locale)
        .to_string()
}

/// ISO-8601 week number; the bistro numbers its bulletins the same way.
pub fn week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}
