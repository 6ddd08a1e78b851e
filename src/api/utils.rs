//! Utility functions for the API

use crate::api::Error;
use crate::deals::Deal;
use crate::feed::load_deals;
use crate::storage::Storage;

/// Fetch a single deal from a freshly loaded feed
///
/// The source only offers the full collection, a failing source reads as an unknown deal
pub async fn fetch_deal<S: Storage>(storage: &S, deal_id: i64) -> Result<Deal, Error> {
    load_deals(storage)
        .await
        .into_iter()
        .find(|deal| deal.id == deal_id)
        .map_or_else(|| Err(Error::not_found("Deal not found")), Ok)
}
