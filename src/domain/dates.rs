//! Calendar-date serde helpers (`YYYY-MM-DD`).

use serde::Deserializer;
use time::Date;

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Nullable patch field for dates: missing stays `None`, `null` clears.
pub fn nullable_date<'de, D>(deserializer: D) -> Result<Option<Option<Date>>, D::Error>
where
    D: Deserializer<'de>,
{
    iso_date::option::deserialize(deserializer).map(Some)
}

/// Optional patch field for dates that cannot be cleared.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    iso_date::option::deserialize(deserializer)
}
