use crate::records::error::RecordError;
use crate::records::raw_table::RawTable;
use crate::services::{HistoricalLocatorService, RawResourceReader, YearLocators};
use log::info;
use std::sync::Arc;

/// Retrieves and parses the archive of one station-year.
#[derive(Clone)]
pub struct RawRecordFetcher {
    locator: Arc<dyn HistoricalLocatorService>,
    reader: Arc<dyn RawResourceReader>,
}

impl RawRecordFetcher {
    pub fn new(
        locator: Arc<dyn HistoricalLocatorService>,
        reader: Arc<dyn RawResourceReader>,
    ) -> Self {
        Self { locator, reader }
    }

    pub(crate) fn locator(&self) -> &Arc<dyn HistoricalLocatorService> {
        &self.locator
    }

    /// Looks the station's archives up, then fetches `year`.
    pub async fn fetch_raw(&self, station_id: &str, year: i32) -> Result<RawTable, RecordError> {
        let locators = self
            .locator
            .available_years(station_id)
            .await
            .map_err(|source| RecordError::Unreachable {
                station: station_id.to_string(),
                year,
                source,
            })?;
        self.fetch_located(station_id, year, &locators).await
    }

    /// Fetches `year` from an already retrieved locator map.
    pub async fn fetch_located(
        &self,
        station_id: &str,
        year: i32,
        locators: &YearLocators,
    ) -> Result<RawTable, RecordError> {
        let locator = locators
            .get(&year.to_string())
            .ok_or_else(|| RecordError::NotFound {
                station: station_id.to_string(),
                year,
            })?;

        let bytes = self
            .reader
            .read(locator)
            .await
            .map_err(|source| RecordError::Unreachable {
                station: station_id.to_string(),
                year,
                source,
            })?;
        info!(
            "Fetched {} bytes for station {} in {}",
            bytes.len(),
            station_id,
            year
        );

        // Parsing is CPU work, keep it off the reactor
        let station = station_id.to_string();
        tokio::task::spawn_blocking(move || {
            let text = String::from_utf8_lossy(&bytes);
            RawTable::parse(&station, year, &text)
        })
        .await?
    }
}
