//! The main entry point: listing NDBC buoys and fetching their historical
//! standard meteorological records as one merged dataset.

use crate::config::{FetchConfig, ServiceConfig};
use crate::dataset::coverage::annotate_coverage;
use crate::dataset::merger::{merge, merge_unlocated};
use crate::dataset::region::Region;
use crate::error::BuoyError;
use crate::records::fetcher::RawRecordFetcher;
use crate::records::normalizer::RecordNormalizer;
use crate::records::year_fetcher::ConcurrentYearFetcher;
use crate::services::ndbc_catalog::NdbcStationCatalog;
use crate::services::ndbc_locator::NdbcLocatorService;
use crate::services::reader::HttpResourceReader;
use crate::services::{HistoricalLocatorService, RawResourceReader, StationCatalog};
use crate::stations::bounds::StationBoundsResolver;
use crate::stations::metadata::StationMetadataBuilder;
use crate::types::cadence::Cadence;
use crate::types::dataset::{MergedDataset, StationTable};
use bon::bon;
use log::{info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Client for historical buoy observations.
///
/// Every call goes back to the services; nothing is cached between calls.
///
/// # Examples
///
/// ```no_run
/// # use buoydata::{Buoy, BuoyError, Cadence};
/// # #[tokio::main]
/// # async fn main() -> Result<(), BuoyError> {
/// let client = Buoy::new()?;
/// let data = client
///     .fetch_data()
///     .stations(&["tplm2", "44013"])
///     .years(&[2018, 2019, 2020])
///     .cadence(Cadence::Weekly)
///     .call()
///     .await?;
/// let data = client.compute_coverage(data, "WTMP")?;
/// println!("{}", data.to_frame()?);
/// # Ok(())
/// # }
/// ```
pub struct Buoy {
    metadata: StationMetadataBuilder,
    years: ConcurrentYearFetcher,
}

#[bon]
impl Buoy {
    /// A client on the public NDBC web site with default settings.
    pub fn new() -> Result<Self, BuoyError> {
        Self::with_config(&ServiceConfig::default(), FetchConfig::default())
    }

    /// A client on the NDBC services described by `service`.
    pub fn with_config(service: &ServiceConfig, fetch: FetchConfig) -> Result<Self, BuoyError> {
        Ok(Self::with_services()
            .catalog(Arc::new(NdbcStationCatalog::new(service)?))
            .locator(Arc::new(NdbcLocatorService::new(service)?))
            .reader(Arc::new(HttpResourceReader::new(service)?))
            .config(fetch)
            .call())
    }

    /// A client on explicitly provided services.
    #[builder]
    pub fn with_services(
        catalog: Arc<dyn StationCatalog>,
        locator: Arc<dyn HistoricalLocatorService>,
        reader: Arc<dyn RawResourceReader>,
        #[builder(default)] config: FetchConfig,
    ) -> Self {
        let bounds = StationBoundsResolver::new(locator.clone(), config.pool);
        Self {
            metadata: StationMetadataBuilder::new(catalog, bounds),
            years: ConcurrentYearFetcher::new(
                RawRecordFetcher::new(locator, reader),
                RecordNormalizer::new(config.required_variable),
                config.pool,
            ),
        }
    }

    /// Lists buoys with known archive bounds, optionally restricted to a region.
    ///
    /// Stations whose bounds or location cannot be determined are left out.
    ///
    /// # Errors
    ///
    /// Returns [`BuoyError::Station`] when the catalog cannot be listed.
    #[builder]
    pub async fn list_stations(&self, region: Option<Region>) -> Result<StationTable, BuoyError> {
        let table = self.metadata.build_table().await?;
        Ok(match region {
            Some(region) => table.filter_by_region(&region),
            None => table,
        })
    }

    /// Fetches `years` of every station in `stations` and merges them.
    ///
    /// * `.cadence(Cadence)`: resampling cadence, daily by default.
    /// * `.add_location(bool)`: attach station locations, `true` by default.
    ///
    /// Years and stations that fail are logged and skipped. A station with no
    /// usable year is absent from the result; compare
    /// [`MergedDataset::station_ids`] with the request to find such stations.
    ///
    /// # Errors
    ///
    /// With locations attached, fails when the catalog cannot be read and with
    /// [`DatasetError::InconsistentJoin`](crate::DatasetError::InconsistentJoin)
    /// when a fetched station has no usable catalog location.
    #[builder]
    pub async fn fetch_data(
        &self,
        stations: &[&str],
        years: &[i32],
        cadence: Option<Cadence>,
        add_location: Option<bool>,
    ) -> Result<MergedDataset, BuoyError> {
        let cadence = cadence.unwrap_or_default();
        let add_location = add_location.unwrap_or(true);

        let mut requested = BTreeSet::new();
        let mut series = Vec::new();
        // Stations one at a time; the years of a station run on the pool.
        for &station_id in stations {
            if !requested.insert(station_id) {
                continue;
            }
            if let Some(s) = self
                .years
                .fetch_station_years(station_id, years, cadence)
                .await
            {
                series.push(s);
            }
        }

        let dataset = if add_location {
            let locations = self
                .metadata
                .locate_many(series.iter().map(|s| s.station_id()))
                .await?;
            merge(series, &locations)?
        } else {
            merge_unlocated(series)
        };

        for station_id in &requested {
            if dataset.station(station_id).is_none() {
                warn!("Station {} is absent from the result", station_id);
            }
        }
        info!(
            "Fetched {} of {} stations over {} {} steps",
            dataset.len(),
            requested.len(),
            dataset.time().len(),
            cadence
        );
        Ok(dataset)
    }

    /// Keeps the stations of `dataset` inside `region`, bounds inclusive.
    pub fn filter_by_region(
        &self,
        dataset: &MergedDataset,
        region: &Region,
    ) -> Result<MergedDataset, BuoyError> {
        Ok(dataset.filter_by_region(region)?)
    }

    /// Annotates every station with the percentage of time steps where
    /// `variable` is present.
    pub fn compute_coverage(
        &self,
        dataset: MergedDataset,
        variable: &str,
    ) -> Result<MergedDataset, BuoyError> {
        Ok(annotate_coverage(dataset, variable)?)
    }
}
