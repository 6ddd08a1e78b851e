//! Airline filtering and chip styles

use serde::Serialize;

use crate::deals::Deal;
use crate::utils::env_var_or_else;

/// Token selecting every airline
pub const ALL_AIRLINES: &str = "전체";

/// Chips offered when `AIRLINE_FILTERS` is not set
const DEFAULT_AIRLINE_FILTERS: &str = "전체,대한항공,제주항공";

/// Selected airline filter
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AirlineFilter {
    /// Every deal matches
    All,

    /// Deals with an airline containing the token
    Airline(String),
}

impl AirlineFilter {
    /// Create a filter from a selected token
    ///
    /// Missing, blank or the [`ALL_AIRLINES`](ALL_AIRLINES) token select everything
    pub fn parse(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            None | Some("" | ALL_AIRLINES) => Self::All,
            Some(token) => Self::Airline(token.to_string()),
        }
    }

    /// Does the deal pass the filter?
    ///
    /// Substring match, so a short label matches a fuller airline name
    pub fn matches(&self, deal: &Deal) -> bool {
        match self {
            Self::All => true,
            Self::Airline(token) => deal.airline.contains(token.as_str()),
        }
    }

    /// Keep the matching items, order is untouched
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T>
    where
        T: AsRef<Deal>,
    {
        items
            .into_iter()
            .filter(|item| self.matches(item.as_ref()))
            .collect()
    }
}

/// Filter chips offered to the user
///
/// Read from the comma separated `AIRLINE_FILTERS`, the all token always comes first
pub fn airline_filters() -> Vec<String> {
    let configured = env_var_or_else("AIRLINE_FILTERS", || {
        DEFAULT_AIRLINE_FILTERS.to_string()
    });

    parse_airline_filters(&configured)
}

fn parse_airline_filters(configured: &str) -> Vec<String> {
    let mut filters = vec![ALL_AIRLINES.to_string()];

    for token in configured.split(',').map(str::trim) {
        if token.is_empty() || filters.iter().any(|filter| filter == token) {
            continue;
        }

        filters.push(token.to_string());
    }

    filters
}

/// Chip style of an airline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AirlineChip {
    KoreanAir,
    JejuAir,
    TwayAir,
    Default,
}

impl AirlineChip {
    /// Look up the chip style by airline name
    pub fn from_airline(airline: &str) -> Self {
        if airline.contains("대한항공") {
            Self::KoreanAir
        } else if airline.contains("제주항공") {
            Self::JejuAir
        } else if airline.contains("티웨이") {
            Self::TwayAir
        } else {
            Self::Default
        }
    }
}
