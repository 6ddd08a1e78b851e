//! Timestamp normalization
//!
//! Stored timestamps carry no timezone and are read as UTC. Display dates use a flat UTC+9
//! offset, no daylight saving rules apply.

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Offset;
use chrono::Utc;

/// Offset of the display timezone, in hours east of UTC
pub const DISPLAY_OFFSET_HOURS: i32 = 9;

/// Naive formats accepted after RFC 3339 fails, all read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Postgres renders `timestamptz` as text with an hour-only offset (`+00`)
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Parse a stored timestamp into an instant
///
/// Returns `None` for empty or unparseable input.
///
/// ```rust
/// let instant = parse_instant("2025-01-01T15:00:00Z").unwrap();
/// assert_eq!(instant.timestamp(), 1_735_743_600);
/// ```
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(raw, format) {
            return Some(instant.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Epoch milliseconds of a stored timestamp
pub fn instant_millis(raw: Option<&str>) -> Option<i64> {
    raw.and_then(parse_instant)
        .map(|instant| instant.timestamp_millis())
}

/// The display offset as a chrono timezone
fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix())
}

/// Calendar date of an instant in the display timezone, as `YYYY-MM-DD`
pub fn format_local_date(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&display_offset())
        .format("%Y-%m-%d")
        .to_string()
}

/// Calendar date of a stored timestamp in the display timezone
///
/// ```rust
/// assert_eq!(local_date(Some("2025-01-01T15:00:00Z")).as_deref(), Some("2025-01-02"));
/// assert_eq!(local_date(None), None);
/// ```
pub fn local_date(raw: Option<&str>) -> Option<String> {
    raw.and_then(parse_instant).map(format_local_date)
}
