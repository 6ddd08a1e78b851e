//! Memory storage
//!
//! Holds a fixed set of deals, optionally read from a JSON file on startup

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use crate::deals::Deal;

use super::Error;
use super::Result;
use super::Storage;

/// An in-memory storage
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "postgres", allow(dead_code))]
pub struct Memory {
    /// All deals in storage, `None` when nothing was loaded
    deals: Arc<Option<Vec<Deal>>>,

    /// Answer every query with this connection error
    failure: Option<String>,
}

#[cfg_attr(feature = "postgres", allow(dead_code))]
impl Memory {
    /// Create a Memory storage without any result
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Memory storage holding `deals`
    pub fn with_deals(deals: Vec<Deal>) -> Self {
        Self {
            deals: Arc::new(Some(deals)),
            failure: None,
        }
    }

    /// Create a Memory storage that fails every query
    #[allow(dead_code)] // used by tests
    pub fn failing<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            deals: Arc::new(None),
            failure: Some(message.to_string()),
        }
    }

    /// Create a Memory storage from the JSON array in `path`
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file can not be read or is not an array of deals
    pub fn from_file<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        let contents = std::fs::read(path)
            .with_context(|| format!("Could not read deals from {}", path.display()))?;

        let deals = serde_json::from_slice::<Vec<Deal>>(&contents)
            .with_context(|| format!("Invalid deals in {}", path.display()))?;

        tracing::info!("Loaded {} deals from {}", deals.len(), path.display());

        Ok(Self::with_deals(deals))
    }

    /// Create a Memory storage from the `DEALS_FILE` environment variable
    ///
    /// Without the variable the storage has no result at all
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var("DEALS_FILE") {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            _ => {
                tracing::info!("`DEALS_FILE` is not set, serving an empty feed");

                Ok(Self::new())
            }
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_all_deals(&self) -> Result<Option<Vec<Deal>>> {
        if let Some(failure) = &self.failure {
            return Err(Error::Connection(failure.clone()));
        }

        Ok((*self.deals).clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn test_empty_memory_has_no_result() {
        let storage = Memory::new();

        assert_eq!(storage.find_all_deals().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failing_memory() {
        let storage = Memory::failing("offline");

        let error = storage.find_all_deals().await.unwrap_err();
        assert_eq!(error.to_string(), "Connection error: offline");
    }

    #[tokio::test]
    async fn test_from_file() {
        let path = std::env::temp_dir().join(format!("airdeal-{}.json", std::process::id()));

        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            r#"[
                {
                    "id": 1,
                    "airline": "대한항공",
                    "deal_name": "여름 특가",
                    "booking_start": "2025-06-01T00:00:00",
                    "booking_end": "2025-06-30T15:00:00",
                    "department": "서울",
                    "arrival": "도쿄",
                    "discount_rate": "최대 30%",
                    "description": null,
                    "source_url": "koreanair.com"
                },
                {
                    "id": 2,
                    "airline": "제주항공",
                    "deal_name": "찜특가",
                    "booking_start": null,
                    "booking_end": null,
                    "department": null,
                    "arrival": null,
                    "discount_rate": null,
                    "description": null,
                    "source_url": null
                }
            ]"#
            .as_bytes(),
        )
        .unwrap();

        let storage = Memory::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let deals = storage.find_all_deals().await.unwrap().unwrap();
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].deal_name, "여름 특가");
        assert_eq!(deals[0].source_url.as_deref(), Some("koreanair.com"));
        assert_eq!(deals[1].booking_end, None);
    }

    #[test]
    fn test_from_missing_file() {
        assert!(Memory::from_file("/definitely/not/here.json").is_err());
    }
}
