//! All API endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::post;

pub use request::Form;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use response::Error;
pub use response::Success;
pub use utils::fetch_deal;

use crate::storage::Storage;

mod deals;
mod events;
mod filters;
mod request;
mod response;
mod utils;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let deals = Router::new()
        .route("/", get(deals::list::<S>))
        .route("/{deal}", get(deals::single::<S>));

    Router::new()
        .nest("/deals", deals)
        .route("/filters", get(filters::list))
        .route("/events", post(events::create))
}
