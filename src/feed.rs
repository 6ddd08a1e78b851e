//! The deal feed
//!
//! Raw deals flow one way: classify against a single `now`, sort, optionally drop expired deals,
//! filter by airline, then shape for the selected display mode.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::deals::Deal;
use crate::filters::AirlineFilter;
use crate::lifecycle::Lifecycle;
use crate::lifecycle::classify;
use crate::storage::Storage;
use crate::time::format_local_date;

/// Source of the evaluation instant
///
/// Read once per evaluation batch, every comparison in that batch uses the same instant
#[derive(Clone, Debug, Default)]
pub struct Clock {
    /// Pinned instant, the system clock is used when not set
    fixed: Option<DateTime<Utc>>,
}

impl Clock {
    /// Clock following the system time
    pub fn system() -> Self {
        Self { fixed: None }
    }

    /// Clock pinned to a single instant
    #[allow(dead_code)] // used by tests
    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self { fixed: Some(now) }
    }

    /// The current instant
    pub fn now(&self) -> DateTime<Utc> {
        self.fixed.unwrap_or_else(Utc::now)
    }
}

/// A deal tagged with its lifecycle for one evaluation pass
///
/// Only valid for the `now` it was classified with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedDeal {
    pub deal: Deal,
    pub lifecycle: Lifecycle,
    pub booking_end_at: Option<DateTime<Utc>>,
}

impl ClassifiedDeal {
    /// Classify a deal against `now`
    pub fn classify(deal: Deal, now: DateTime<Utc>) -> Self {
        let booking_end_at = deal.booking_end_at();

        Self {
            lifecycle: classify(booking_end_at, now),
            booking_end_at,
            deal,
        }
    }
}

impl AsRef<Deal> for ClassifiedDeal {
    fn as_ref(&self) -> &Deal {
        &self.deal
    }
}

/// Load the complete deal collection
///
/// A failing source is logged and shows up as an empty feed, so is an absent result
pub async fn load_deals<S: Storage>(storage: &S) -> Vec<Deal> {
    match storage.find_all_deals().await {
        Ok(Some(deals)) => {
            tracing::debug!("Loaded {} deals", deals.len());

            deals
        }
        Ok(None) => {
            tracing::debug!("No deals returned by the source");

            Vec::new()
        }
        Err(err) => {
            tracing::error!("Could not load deals: {err}");

            Vec::new()
        }
    }
}

/// Order deals for display
///
/// Active deals first, then expired ones. Inside each group the soonest booking end comes
/// first, deals without a readable end trail their group. The sort is stable.
pub fn sort_deals(deals: Vec<Deal>, now: DateTime<Utc>) -> Vec<ClassifiedDeal> {
    let mut classified = deals
        .into_iter()
        .map(|deal| ClassifiedDeal::classify(deal, now))
        .collect::<Vec<_>>();

    classified.sort_by(|a, b| {
        a.lifecycle
            .cmp(&b.lifecycle)
            .then_with(|| compare_booking_ends(a.booking_end_at, b.booking_end_at))
    });

    classified
}

/// Ascending by end, missing ends last
fn compare_booking_ends(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// How the feed is presented
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Flat sequence of cards
    #[default]
    List,

    /// Cards grouped by the local date their booking window ends
    Calendar,
}

/// Options for building a feed view
#[derive(Clone, Debug)]
pub struct FeedOptions {
    pub mode: DisplayMode,
    pub airline: AirlineFilter,

    /// Keep expired deals at the end of the feed
    pub include_expired: bool,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            mode: DisplayMode::List,
            airline: AirlineFilter::All,
            include_expired: true,
        }
    }
}

/// A single day of the calendar view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    /// Local date, `YYYY-MM-DD`
    pub date: String,
    pub deals: Vec<ClassifiedDeal>,
}

/// The feed, shaped for its display mode
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedView {
    List(Vec<ClassifiedDeal>),
    Calendar(Vec<CalendarDay>),
}

/// Build the feed view from a freshly loaded collection
pub fn build_feed(deals: Vec<Deal>, now: DateTime<Utc>, options: &FeedOptions) -> FeedView {
    let mut sorted = sort_deals(deals, now);

    if !options.include_expired {
        sorted.retain(|deal| !deal.lifecycle.is_expired());
    }

    let filtered = options.airline.apply(sorted);

    match options.mode {
        DisplayMode::List => FeedView::List(filtered),
        DisplayMode::Calendar => FeedView::Calendar(group_by_day(filtered)),
    }
}

/// Group sorted deals by the local date of their booking end
///
/// Days ascend, feed order is kept inside a day, undated deals are left out
fn group_by_day(deals: Vec<ClassifiedDeal>) -> Vec<CalendarDay> {
    let mut days: BTreeMap<String, Vec<ClassifiedDeal>> = BTreeMap::new();

    for deal in deals {
        let Some(booking_end_at) = deal.booking_end_at else {
            tracing::debug!("Deal {} has no booking end, not on the calendar", deal.deal.id);
            continue;
        };

        days.entry(format_local_date(booking_end_at))
            .or_default()
            .push(deal);
    }

    days.into_iter()
        .map(|(date, deals)| CalendarDay { date, deals })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::SecondsFormat;
    use chrono::TimeZone;

    use crate::storage::Memory;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap()
    }

    fn deal(id: i64, airline: &str, booking_end: Option<&str>) -> Deal {
        Deal {
            id,
            airline: airline.to_string(),
            deal_name: format!("deal {id}"),
            booking_start: Some("2025-05-01T00:00:00Z".to_string()),
            booking_end: booking_end.map(ToString::to_string),
            department: None,
            arrival: None,
            discount_rate: None,
            description: None,
            source_url: None,
        }
    }

    fn ending_at(id: i64, end: DateTime<Utc>) -> Deal {
        deal(
            id,
            "대한항공",
            Some(&end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        )
    }

    fn ids(deals: &[ClassifiedDeal]) -> Vec<i64> {
        deals.iter().map(|deal| deal.deal.id).collect()
    }

    fn sample() -> Vec<Deal> {
        let now = now();

        vec![
            ending_at(1, now + Duration::days(3)),
            ending_at(2, now - Duration::days(2)),
            ending_at(3, now + Duration::hours(5)),
            ending_at(4, now - Duration::hours(1)),
            ending_at(5, now),
            ending_at(6, now + Duration::hours(5)),
            ending_at(7, now - Duration::days(2)),
        ]
    }

    #[test]
    fn test_sort_expiry_scenario() {
        let now = now();
        let a = ending_at(1, now - Duration::hours(2));
        let b = ending_at(2, now + Duration::days(1));
        let c = ending_at(3, now - Duration::hours(1));

        let sorted = sort_deals(vec![a, b, c], now);

        assert_eq!(ids(&sorted), vec![2, 1, 3]);
        assert_eq!(sorted[0].lifecycle, Lifecycle::Active);
        assert_eq!(sorted[1].lifecycle, Lifecycle::Expired);
        assert_eq!(sorted[2].lifecycle, Lifecycle::Expired);
    }

    #[test]
    fn test_sort_active_before_expired() {
        let sorted = sort_deals(sample(), now());

        let first_expired = sorted
            .iter()
            .position(|deal| deal.lifecycle.is_expired())
            .unwrap();

        assert!(sorted[..first_expired]
            .iter()
            .all(|deal| !deal.lifecycle.is_expired()));
        assert!(sorted[first_expired..]
            .iter()
            .all(|deal| deal.lifecycle.is_expired()));
    }

    #[test]
    fn test_sort_groups_ascend_by_end() {
        let sorted = sort_deals(sample(), now());

        for pair in sorted.windows(2) {
            if pair[0].lifecycle == pair[1].lifecycle {
                assert!(pair[0].booking_end_at <= pair[1].booking_end_at);
            }
        }
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let now = now();
        let sorted = sort_deals(sample(), now);

        // ending exactly now is still active
        assert_eq!(ids(&sorted), vec![5, 3, 6, 1, 2, 7, 4]);

        let resorted = sort_deals(
            sorted.iter().map(|deal| deal.deal.clone()).collect(),
            now,
        );
        assert_eq!(resorted, sorted);
    }

    #[test]
    fn test_sort_empty() {
        assert!(sort_deals(Vec::new(), now()).is_empty());
    }

    #[test]
    fn test_sort_all_expired() {
        let now = now();
        let deals = vec![
            ending_at(1, now - Duration::hours(1)),
            ending_at(2, now - Duration::days(10)),
            ending_at(3, now - Duration::days(1)),
        ];

        let sorted = sort_deals(deals, now);

        assert_eq!(ids(&sorted), vec![2, 3, 1]);
        assert!(sorted.iter().all(|deal| deal.lifecycle.is_expired()));
    }

    #[test]
    fn test_sort_tolerates_malformed_ends() {
        let now = now();
        let deals = vec![
            deal(1, "대한항공", None),
            ending_at(2, now - Duration::hours(1)),
            deal(3, "대한항공", Some("someday")),
            ending_at(4, now + Duration::hours(1)),
        ];

        let sorted = sort_deals(deals, now);

        assert_eq!(ids(&sorted), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_sort_follows_now() {
        let now = now();
        let deals = vec![
            ending_at(1, now + Duration::hours(1)),
            ending_at(2, now + Duration::hours(2)),
        ];

        let later = sort_deals(deals, now + Duration::minutes(90));

        assert_eq!(ids(&later), vec![2, 1]);
    }

    #[test]
    fn test_build_feed_filters_after_sorting() {
        let now = now();
        let deals = vec![
            deal(1, "제주항공", Some("2025-06-03T00:00:00Z")),
            deal(2, "대한항공", Some("2025-06-02T00:00:00Z")),
            deal(3, "대한항공 일본노선", Some("2025-05-01T00:00:00Z")),
            deal(4, "대한항공", Some("2025-06-01T12:00:00Z")),
        ];

        let options = FeedOptions {
            airline: AirlineFilter::parse(Some("대한항공")),
            ..FeedOptions::default()
        };

        let FeedView::List(feed) = build_feed(deals, now, &options) else {
            panic!("Expected a list view");
        };

        assert_eq!(ids(&feed), vec![4, 2, 3]);
    }

    #[test]
    fn test_build_feed_active_only() {
        let options = FeedOptions {
            include_expired: false,
            ..FeedOptions::default()
        };

        let FeedView::List(feed) = build_feed(sample(), now(), &options) else {
            panic!("Expected a list view");
        };

        assert_eq!(ids(&feed), vec![5, 3, 6, 1]);
    }

    #[test]
    fn test_build_feed_calendar() {
        let now = now();
        let deals = vec![
            deal(1, "제주항공", Some("2025-06-02T16:00:00Z")),
            deal(2, "대한항공", Some("2025-06-01T15:00:00Z")),
            deal(3, "대한항공", None),
            deal(4, "대한항공", Some("2025-06-02T14:00:00Z")),
            deal(5, "티웨이", Some("2025-05-31T00:00:00Z")),
        ];

        let options = FeedOptions {
            mode: DisplayMode::Calendar,
            ..FeedOptions::default()
        };

        let FeedView::Calendar(days) = build_feed(deals, now, &options) else {
            panic!("Expected a calendar view");
        };

        let dates = days.iter().map(|day| day.date.as_str()).collect::<Vec<_>>();
        assert_eq!(dates, vec!["2025-05-31", "2025-06-02", "2025-06-03"]);

        assert_eq!(ids(&days[0].deals), vec![5]);
        assert_eq!(ids(&days[1].deals), vec![2, 4]);
        assert_eq!(ids(&days[2].deals), vec![1]);
    }

    #[test]
    fn test_clock() {
        let now = now();

        assert_eq!(Clock::fixed(now).now(), now);
        assert!(Clock::system().now() > now);
    }

    #[tokio::test]
    async fn test_load_deals() {
        let storage = Memory::with_deals(sample());
        assert_eq!(load_deals(&storage).await.len(), 7);
    }

    #[tokio::test]
    async fn test_load_deals_absent_is_empty() {
        let storage = Memory::new();
        assert!(load_deals(&storage).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_deals_failure_is_empty() {
        let storage = Memory::failing("connection refused");
        assert!(load_deals(&storage).await.is_empty());
    }
}
