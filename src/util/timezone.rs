use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime, UtcOffset};

pub fn localized_datetime(time: OffsetDateTime, tz: Tz) -> DateTime<Tz> {
    let utc = time.to_offset(UtcOffset::UTC);
    let seconds = utc.unix_timestamp();
    let datetime_utc = DateTime::<Utc>::from_timestamp(seconds, utc.nanosecond())
        .or_else(|| DateTime::<Utc>::from_timestamp(seconds, 0))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    tz.from_utc_datetime(&datetime_utc.naive_utc())
}

/// Calendar day of `time` as observed in `tz`.
pub fn localized_date(time: OffsetDateTime, tz: Tz) -> Date {
    let localized = localized_datetime(time, tz);
    let converted = u8::try_from(localized.month())
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .zip(u8::try_from(localized.day()).ok())
        .and_then(|(month, day)| Date::from_calendar_date(localized.year(), month, day).ok());
    converted.unwrap_or_else(|| time.to_offset(UtcOffset::UTC).date())
}
