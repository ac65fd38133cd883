//! The external collaborators the pipeline consumes: a station catalog, a
//! per-station index of yearly archives, and a reader for the archives
//! themselves.
//!
//! Each one is a trait so that the pipeline only ever sees `Arc<dyn ...>`
//! handles. [`ndbc_catalog`], [`ndbc_locator`] and [`reader`] hold the NDBC
//! implementations; tests inject in-memory doubles instead.

pub mod error;
pub(crate) mod http;
pub mod ndbc_catalog;
pub mod ndbc_locator;
pub mod reader;

use crate::types::station::CatalogLocation;
use async_trait::async_trait;
use error::ServiceError;
use std::collections::BTreeMap;

/// Year token (e.g. `"2019"`) to resource locator.
pub type YearLocators = BTreeMap<String, String>;

/// Lists stations and their catalog locations.
#[async_trait]
pub trait StationCatalog: Send + Sync {
    async fn list_station_ids(&self) -> Result<Vec<String>, ServiceError>;

    async fn get_station_location(&self, station_id: &str)
        -> Result<CatalogLocation, ServiceError>;

    /// Every listed station with its location, in listing order.
    async fn station_locations(&self) -> Result<Vec<(String, CatalogLocation)>, ServiceError> {
        let mut entries = Vec::new();
        for id in self.list_station_ids().await? {
            let location = self.get_station_location(&id).await?;
            entries.push((id, location));
        }
        Ok(entries)
    }
}

/// Maps a station to the locators of its yearly historical archives.
#[async_trait]
pub trait HistoricalLocatorService: Send + Sync {
    async fn available_years(&self, station_id: &str) -> Result<YearLocators, ServiceError>;
}

/// Reads the bytes behind a locator.
#[async_trait]
pub trait RawResourceReader: Send + Sync {
    async fn read(&self, locator: &str) -> Result<Vec<u8>, ServiceError>;
}
