//! Deals API endpoints
//!
//! The feed and the detail of a single deal

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::feed::CalendarDay;
use crate::feed::ClassifiedDeal;
use crate::feed::Clock;
use crate::feed::DisplayMode;
use crate::feed::FeedOptions;
use crate::feed::FeedView;
use crate::feed::build_feed;
use crate::feed::load_deals;
use crate::filters::AirlineChip;
use crate::filters::AirlineFilter;
use crate::links::normalize_url;
use crate::storage::Storage;
use crate::time::instant_millis;
use crate::time::local_date;

use super::Error;
use super::PathParameters;
use super::QueryParameters;
use super::Success;
use super::fetch_deal;

/// Deal card going to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealResponse {
    /// Deal ID
    pub id: i64,

    /// Airline running the promotion
    pub airline: String,

    /// Chip style of the airline
    pub chip: AirlineChip,

    /// Title of the promotion
    pub deal_name: String,

    /// First day of the booking window, local date
    pub booking_start: Option<String>,

    /// Last day of the booking window, local date
    pub booking_end: Option<String>,

    /// End of the booking window, epoch milliseconds
    pub deadline: Option<i64>,

    /// Booking window closed at the time of the request
    pub expired: bool,

    /// Link to the promotion, `#` when there is none
    pub url: String,
}

impl DealResponse {
    /// Create a card from a [`ClassifiedDeal`](ClassifiedDeal)
    fn from_classified_deal(classified: ClassifiedDeal) -> Self {
        let deal = classified.deal;

        Self {
            id: deal.id,
            chip: AirlineChip::from_airline(&deal.airline),
            booking_start: local_date(deal.booking_start.as_deref()),
            booking_end: local_date(deal.booking_end.as_deref()),
            deadline: instant_millis(deal.booking_end.as_deref()),
            expired: classified.lifecycle.is_expired(),
            url: normalize_url(deal.source_url.as_deref()),
            airline: deal.airline,
            deal_name: deal.deal_name,
        }
    }

    /// Create cards from multiple [`ClassifiedDeal`](ClassifiedDeal)s
    fn from_classified_deal_multiple(deals: Vec<ClassifiedDeal>) -> Vec<Self> {
        deals
            .into_iter()
            .map(Self::from_classified_deal)
            .collect::<Vec<Self>>()
    }
}

/// Deal detail going to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealDetailResponse {
    #[serde(flatten)]
    pub deal: DealResponse,

    /// Where the route departs
    pub department: Option<String>,

    /// Where the route arrives
    pub arrival: Option<String>,

    /// Free-text discount
    pub discount_rate: Option<String>,

    /// Free-text remarks
    pub description: Option<String>,
}

impl DealDetailResponse {
    /// Create a detail from a [`ClassifiedDeal`](ClassifiedDeal)
    fn from_classified_deal(mut classified: ClassifiedDeal) -> Self {
        Self {
            department: classified.deal.department.take(),
            arrival: classified.deal.arrival.take(),
            discount_rate: classified.deal.discount_rate.take(),
            description: classified.deal.description.take(),
            deal: DealResponse::from_classified_deal(classified),
        }
    }
}

/// A day of the calendar going to the user
#[derive(Debug, Serialize)]
pub struct CalendarDayResponse {
    /// Local date, `YYYY-MM-DD`
    pub date: String,

    pub deals: Vec<DealResponse>,
}

/// The feed going to the user
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum FeedResponse {
    List { deals: Vec<DealResponse> },
    Calendar { days: Vec<CalendarDayResponse> },
}

impl FeedResponse {
    /// Create a response from a [`FeedView`](FeedView)
    fn from_feed_view(view: FeedView) -> Self {
        match view {
            FeedView::List(deals) => Self::List {
                deals: DealResponse::from_classified_deal_multiple(deals),
            },
            FeedView::Calendar(days) => Self::Calendar {
                days: days
                    .into_iter()
                    .map(|CalendarDay { date, deals }| CalendarDayResponse {
                        date,
                        deals: DealResponse::from_classified_deal_multiple(deals),
                    })
                    .collect(),
            },
        }
    }
}

/// Feed query parameters
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Selected airline filter, `전체` for all
    airline: Option<String>,

    /// Display mode, `list` by default
    mode: Option<DisplayMode>,

    /// Include expired deals, `true` by default
    expired: Option<bool>,
}

impl FeedQuery {
    fn into_options(self) -> FeedOptions {
        let defaults = FeedOptions::default();

        FeedOptions {
            mode: self.mode.unwrap_or(defaults.mode),
            airline: AirlineFilter::parse(self.airline.as_deref()),
            include_expired: self.expired.unwrap_or(defaults.include_expired),
        }
    }
}

/// List the feed
///
/// Active deals first, soonest deadline first. A failing source results in an empty feed.
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:6000/api/deals?airline=대한항공&mode=list'
/// ```
///
/// Response:
/// ```json
/// { "data": { "mode": "list", "deals": [ { "id": 1, "airline": "대한항공" ... } ] } }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    Extension(clock): Extension<Clock>,
    QueryParameters(query): QueryParameters<FeedQuery>,
) -> Success<FeedResponse> {
    let options = query.into_options();

    let deals = load_deals(&storage).await;

    // one instant for the whole pass
    let now = clock.now();

    tracing::debug!(
        "Building {:?} feed of {} deals for {:?}",
        options.mode,
        deals.len(),
        options.airline
    );

    Success::ok(FeedResponse::from_feed_view(build_feed(deals, now, &options)))
}

/// Get the detail of a single deal
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/deals/1
/// ```
///
/// Response:
/// ```json
/// { "data": { "id": 1, "airline": "대한항공", "department": "서울" ... } }
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    Extension(clock): Extension<Clock>,
    PathParameters(deal_id): PathParameters<i64>,
) -> Result<Success<DealDetailResponse>, Error> {
    let deal = fetch_deal(&storage, deal_id).await?;

    tracing::debug!("Showing deal {deal_id}: {}", deal.deal_name);

    Ok(Success::ok(DealDetailResponse::from_classified_deal(
        ClassifiedDeal::classify(deal, clock.now()),
    )))
}
