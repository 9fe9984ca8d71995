//! Time-axis metadata handling.
//!
//! Product time axes store integral second offsets from an epoch declared
//! in the variable's `units` attribute, e.g.
//! `"seconds since 2020-01-01 00:00:00"`.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

const EPOCH_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum TimeUnitError {
    #[error("time units '{0}' do not have the form 'seconds since <timestamp>'")]
    BadFormat(String),

    #[error("time units epoch '{0}' is not a 'YYYY-MM-DD HH:MM:SS' timestamp")]
    BadEpoch(String),
}

/// Decode a `units` attribute into its epoch.
///
/// The attribute must consist of exactly the tokens `seconds`, `since` and
/// a `YYYY-MM-DD HH:MM:SS` timestamp (which itself contains one space, so
/// the split is limited to three parts).
pub fn parse_time_units(units: &str) -> Result<DateTime<Utc>, TimeUnitError> {
    let trimmed = units.trim();
    let parts: Vec<&str> = trimmed.splitn(3, ' ').collect();
    if parts.len() != 3 || parts[0] != "seconds" || parts[1] != "since" {
        return Err(TimeUnitError::BadFormat(units.to_string()));
    }
    let epoch = NaiveDateTime::parse_from_str(parts[2], EPOCH_FORMAT)
        .map_err(|_| TimeUnitError::BadEpoch(parts[2].to_string()))?;
    Ok(Utc.from_utc_datetime(&epoch))
}

/// The timestamp `offset` seconds after `epoch`.
pub fn offset_from_epoch(epoch: DateTime<Utc>, offset: i64) -> DateTime<Utc> {
    epoch + Duration::seconds(offset)
}
