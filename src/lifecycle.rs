//! Booking window lifecycle
//!
//! Whether a deal is still bookable depends on the instant it is evaluated at, so the
//! classification is recomputed on every pass and never stored.

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

/// Lifecycle of a deal relative to an evaluation instant
///
/// Ordered so that active deals come before expired ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lifecycle {
    /// Booking window still open
    Active,

    /// Booking window ended before the evaluation instant
    Expired,
}

impl Lifecycle {
    pub fn is_expired(self) -> bool {
        self == Lifecycle::Expired
    }
}

/// Has a booking window ending at `booking_end` closed at `now`?
///
/// Strictly before `now`: a window ending exactly at `now` is still active. A missing end can
/// not be proven closed and counts as active.
pub fn is_expired(booking_end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    booking_end.is_some_and(|end| end < now)
}

/// Classify a booking window end against `now`
pub fn classify(booking_end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Lifecycle {
    if is_expired(booking_end, now) {
        Lifecycle::Expired
    } else {
        Lifecycle::Active
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_is_expired_boundary() {
        let now = now();

        assert!(is_expired(Some(now - Duration::milliseconds(1)), now));
        assert!(!is_expired(Some(now), now));
        assert!(!is_expired(Some(now + Duration::milliseconds(1)), now));
    }

    #[test]
    fn test_is_expired_missing_end() {
        assert!(!is_expired(None, now()));
    }

    #[test]
    fn test_classification_follows_now() {
        let end = now();

        assert_eq!(classify(Some(end), end - Duration::hours(1)), Lifecycle::Active);
        assert_eq!(classify(Some(end), end + Duration::hours(1)), Lifecycle::Expired);
    }

    #[test]
    fn test_active_orders_before_expired() {
        assert!(Lifecycle::Active < Lifecycle::Expired);
        assert!(Lifecycle::Expired.is_expired());
        assert!(!Lifecycle::Active.is_expired());
    }
}
