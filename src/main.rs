#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::analytics::Analytics;
use crate::api::router;
use crate::feed::Clock;
use crate::storage::Storage;
use crate::storage::setup;
use crate::utils::env_var_or_else;

mod analytics;
mod api;
mod deals;
mod feed;
mod filters;
mod graceful_shutdown;
mod lifecycle;
mod links;
mod root;
mod storage;
#[cfg(test)]
mod tests;
mod time;
mod utils;

const DEFAULT_RUST_LOG: &str = "airdeal=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app().await?;

    let address = setup_address()?;
    tracing::info!("Listening on {}", address);

    let listener = TcpListener::bind(address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if the storage can not be set up
pub async fn setup_app() -> Result<Router> {
    let storage = setup().await?;

    Ok(create_router(storage, Analytics::from_env(), Clock::system()))
}

/// Create the router for AirDeal
fn create_router<S: Storage>(storage: S, analytics: Analytics, clock: Clock) -> Router {
    Router::new()
        .nest("/api", router::<S>())
        .route("/go/{deal}", get(root::go::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
        .layer(Extension(analytics))
        .layer(Extension(clock))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Ok(port) = std::env::var("PORT") {
        // only check non-empty strings
        if !port.is_empty() {
            let port = port.parse::<u16>()?;

            address.set_port(port);
        }
    }

    Ok(address)
}
