use crate::pool::WorkerPool;
use crate::records::error::RecordError;
use crate::records::fetcher::RawRecordFetcher;
use crate::records::normalizer::RecordNormalizer;
use crate::services::YearLocators;
use crate::types::cadence::Cadence;
use crate::types::observation::{StationSeries, YearObservationBatch};
use log::{info, warn};
use std::collections::BTreeSet;

/// Fetches and normalizes many years of one station on a [`WorkerPool`],
/// absorbing per-year failures.
#[derive(Clone)]
pub struct ConcurrentYearFetcher {
    fetcher: RawRecordFetcher,
    normalizer: RecordNormalizer,
    pool: WorkerPool,
}

impl ConcurrentYearFetcher {
    pub fn new(fetcher: RawRecordFetcher, normalizer: RecordNormalizer, pool: WorkerPool) -> Self {
        Self {
            fetcher,
            normalizer,
            pool,
        }
    }

    /// Returns `None` when no requested year could be fetched.
    pub async fn fetch_station_years(
        &self,
        station_id: &str,
        years: &[i32],
        cadence: Cadence,
    ) -> Option<StationSeries> {
        let locators = match self.fetcher.locator().available_years(station_id).await {
            Ok(locators) => locators,
            Err(e) => {
                warn!("Could not list archives of station {}: {}", station_id, e);
                return None;
            }
        };
        let locators = &locators;

        let years: BTreeSet<i32> = years.iter().copied().collect();
        let mut results = self
            .pool
            .run(years, |year| async move {
                (year, self.fetch_year(station_id, year, locators, cadence).await)
            })
            .await;
        // Completion order is arbitrary; the earlier year wins duplicate timestamps.
        results.sort_by_key(|(year, _)| *year);

        let mut batches = Vec::with_capacity(results.len());
        for (year, result) in results {
            match result {
                Ok(batch) => batches.push(batch),
                Err(RecordError::NotFound { .. }) => {
                    warn!("Station {} has no archive for {}", station_id, year)
                }
                Err(e) => warn!("Skipping station {} in {}: {}", station_id, year, e),
            }
        }

        let fetched = batches.len();
        let series = StationSeries::concat(station_id, batches);
        match &series {
            Some(series) => info!(
                "Station {}: {} years, {} records",
                station_id,
                fetched,
                series.len()
            ),
            None => warn!("Station {} returned no data", station_id),
        }
        series
    }

    async fn fetch_year(
        &self,
        station_id: &str,
        year: i32,
        locators: &YearLocators,
        cadence: Cadence,
    ) -> Result<YearObservationBatch, RecordError> {
        let raw = self.fetcher.fetch_located(station_id, year, locators).await?;
        let normalizer = self.normalizer.clone();
        tokio::task::spawn_blocking(move || normalizer.normalize(raw, cadence)).await?
    }
}
