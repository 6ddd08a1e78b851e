//! All things related to the storage of deals
//!
//! Deals are owned by an external source, the application only reads them.

use core::fmt;

use async_trait::async_trait;

use crate::deals::Deal;

pub use memory::Memory;
#[cfg(feature = "postgres")]
pub use postgres::Postgres;

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
///
/// Loads the deals from `DEALS_FILE` when it is set
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> anyhow::Result<Memory> {
    Memory::from_env()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> anyhow::Result<Postgres> {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug)]
pub enum Error {
    /// A connection error with the storage
    Connection(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Connection(error) => write!(f, "Connection error: {error}"),
        }
    }
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find all deals in `flight_deals`
    ///
    /// `None` when the source answered without a result, which is not the same as an empty one
    async fn find_all_deals(&self) -> Result<Option<Vec<Deal>>>;
}
