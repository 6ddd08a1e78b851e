use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use crate::time::parse_instant;

/// A single airline promotion, as stored in the `flight_deals` relation
///
/// Read-only: every field is owned by the external data source. Timestamps are kept as the raw
/// text the source returned, so a malformed value degrades at normalization time instead of
/// failing the whole fetch.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Deal {
    pub id: i64,
    pub airline: String,
    pub deal_name: String,
    pub booking_start: Option<String>,
    pub booking_end: Option<String>,
    pub department: Option<String>,
    pub arrival: Option<String>,
    pub discount_rate: Option<String>,
    pub description: Option<String>,
    pub source_url: Option<String>,
}

impl Deal {
    /// End of the booking window as an instant, if it can be parsed
    pub fn booking_end_at(&self) -> Option<DateTime<Utc>> {
        self.booking_end.as_deref().and_then(parse_instant)
    }
}

impl AsRef<Deal> for Deal {
    fn as_ref(&self) -> &Deal {
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn deal(booking_end: Option<&str>) -> Deal {
        Deal {
            id: 1,
            airline: "대한항공".to_string(),
            deal_name: "여름 특가".to_string(),
            booking_start: None,
            booking_end: booking_end.map(ToString::to_string),
            department: None,
            arrival: None,
            discount_rate: None,
            description: None,
            source_url: None,
        }
    }

    #[test]
    fn test_booking_end_at() {
        assert_eq!(
            deal(Some("2025-01-01T15:00:00")).booking_end_at(),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 15, 0, 0).unwrap())
        );
        assert_eq!(deal(Some("")).booking_end_at(), None);
        assert_eq!(deal(None).booking_end_at(), None);
    }
}
