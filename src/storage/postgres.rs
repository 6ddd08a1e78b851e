//! Postgres storage
//!
//! Reads `flight_deals` as maintained by the external source, no migrations are run

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::deals::Deal;

use super::Error;
use super::Result;
use super::Storage;

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    pub async fn new() -> anyhow::Result<Self> {
        let database_connection_string =
            std::env::var("DATABASE_URL").context("`DATABASE_URL` is not set")?;

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .context("Could not connect to the database")?;

        Ok(Self::new_with_pool(connection_pool))
    }

    /// Create Postgres storage with existing pool
    pub fn new_with_pool(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

/// Postgres version of a deal
///
/// Timestamps are selected as text, parsing happens in the feed
#[derive(sqlx::FromRow)]
struct PostgresDeal {
    id: i64,
    airline: String,
    deal_name: String,
    booking_start: Option<String>,
    booking_end: Option<String>,
    department: Option<String>,
    arrival: Option<String>,
    discount_rate: Option<String>,
    description: Option<String>,
    source_url: Option<String>,
}

impl Deal {
    /// Create deal from postgres version
    fn from_postgres_deal(deal: PostgresDeal) -> Self {
        Self {
            id: deal.id,
            airline: deal.airline,
            deal_name: deal.deal_name,
            booking_start: deal.booking_start,
            booking_end: deal.booking_end,
            department: deal.department,
            arrival: deal.arrival,
            discount_rate: deal.discount_rate,
            description: deal.description,
            source_url: deal.source_url,
        }
    }

    /// Create deals from multiple postgres versions
    fn from_postgres_deal_multiple(deals: Vec<PostgresDeal>) -> Vec<Self> {
        deals.into_iter().map(Self::from_postgres_deal).collect()
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_all_deals(&self) -> Result<Option<Vec<Deal>>> {
        let deals = sqlx::query_as::<_, PostgresDeal>(
            r#"
            SELECT
                id::bigint AS id,
                COALESCE(airline, '') AS airline,
                COALESCE(deal_name, '') AS deal_name,
                booking_start::text AS booking_start,
                booking_end::text AS booking_end,
                department::text AS department,
                arrival::text AS arrival,
                discount_rate::text AS discount_rate,
                description::text AS description,
                source_url::text AS source_url
            FROM flight_deals
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
        .map(Deal::from_postgres_deal_multiple)
        .map_err(connection_error)?;

        Ok(Some(deals))
    }
}

/// Utility function for mapping any error into a connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
