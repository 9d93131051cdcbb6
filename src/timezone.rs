//! Helpers for resolving the server's configured timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in the timezone `canonical_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a
/// known canonical timezone name.
pub fn local_today(canonical_timezone: &str) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })?;

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}

/// A file name of the form `{prefix}_YYYYMMDD.{extension}`, e.g.
/// `expenses_20240115.csv`.
pub fn dated_file_name(prefix: &str, date: Date, extension: &str) -> String {
    format!(
        "{prefix}_{:04}{:02}{:02}.{extension}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}
