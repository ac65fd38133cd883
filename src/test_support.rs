//! In-memory service doubles and fixtures shared by the unit tests.

use crate::services::error::ServiceError;
use crate::services::{HistoricalLocatorService, RawResourceReader, StationCatalog, YearLocators};
use crate::types::observation::{StationSeries, YearObservationBatch};
use crate::types::station::CatalogLocation;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// A single-variable series on the given days.
pub(crate) fn series(
    station_id: &str,
    days: &[NaiveDateTime],
    variable: &str,
    values: &[f64],
) -> StationSeries {
    let batch = YearObservationBatch {
        station_id: station_id.to_string(),
        year: days.first().map_or(2000, |d| d.year()),
        timestamps: days.to_vec(),
        variables: BTreeMap::from([(
            variable.to_string(),
            values.iter().copied().map(Some).collect(),
        )]),
    };
    StationSeries::concat(station_id, vec![batch]).unwrap()
}

/// A modern stdmet archive with one midnight reading per day from the 1st of
/// `month`. `values` go into `WTMP`.
pub(crate) fn archive(year: i32, month: u32, values: &[f64]) -> String {
    let mut text = String::from(
        "#YY  MM DD hh mm WSPD WTMP\n#yr  mo dy hr mn m/s  degC\n",
    );
    for (i, value) in values.iter().enumerate() {
        text.push_str(&format!(
            "{} {:02} {:02} 00 00 5.0 {:.1}\n",
            year,
            month,
            i + 1,
            value
        ));
    }
    text
}

#[derive(Default)]
pub(crate) struct MemoryCatalog {
    stations: Vec<(String, CatalogLocation)>,
    unavailable: bool,
    listings: AtomicUsize,
}

impl MemoryCatalog {
    pub(crate) fn with_station(self, id: &str, latitude: f64, longitude: f64) -> Self {
        let ns = if latitude < 0.0 { "S" } else { "N" };
        let ew = if longitude < 0.0 { "W" } else { "E" };
        self.with_raw_station(
            id,
            &latitude.abs().to_string(),
            ns,
            &longitude.abs().to_string(),
            ew,
        )
    }

    pub(crate) fn with_raw_station(
        mut self,
        id: &str,
        latitude: &str,
        latitude_hemisphere: &str,
        longitude: &str,
        longitude_hemisphere: &str,
    ) -> Self {
        self.stations.push((
            id.to_string(),
            CatalogLocation {
                latitude: latitude.into(),
                latitude_hemisphere: latitude_hemisphere.into(),
                longitude: longitude.into(),
                longitude_hemisphere: longitude_hemisphere.into(),
                notes: String::new(),
            },
        ));
        self
    }

    pub(crate) fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub(crate) fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StationCatalog for MemoryCatalog {
    async fn list_station_ids(&self) -> Result<Vec<String>, ServiceError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(ServiceError::MalformedTable {
                line: 1,
                reason: "catalog offline".into(),
            });
        }
        Ok(self.stations.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn get_station_location(
        &self,
        station_id: &str,
    ) -> Result<CatalogLocation, ServiceError> {
        self.stations
            .iter()
            .find(|(id, _)| id == station_id)
            .map(|(_, location)| location.clone())
            .ok_or_else(|| ServiceError::UnknownStation(station_id.to_string()))
    }
}

/// Unknown stations have no archives; failing stations error on lookup.
#[derive(Default)]
pub(crate) struct MemoryLocator {
    years: BTreeMap<String, YearLocators>,
    failing: BTreeSet<String>,
    calls: AtomicUsize,
}

impl MemoryLocator {
    pub(crate) fn with_year(mut self, station_id: &str, year: i32, locator: &str) -> Self {
        self.years
            .entry(station_id.to_string())
            .or_default()
            .insert(year.to_string(), locator.to_string());
        self
    }

    pub(crate) fn failing(mut self, station_id: &str) -> Self {
        self.failing.insert(station_id.to_string());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoricalLocatorService for MemoryLocator {
    async fn available_years(&self, station_id: &str) -> Result<YearLocators, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(station_id) {
            return Err(ServiceError::FileRead(
                PathBuf::from(station_id),
                io::Error::new(io::ErrorKind::ConnectionRefused, "history page offline"),
            ));
        }
        Ok(self.years.get(station_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub(crate) struct MemoryReader {
    resources: HashMap<String, Vec<u8>>,
    delays: HashMap<String, Duration>,
}

impl MemoryReader {
    pub(crate) fn with(mut self, locator: &str, text: &str) -> Self {
        self.resources
            .insert(locator.to_string(), text.as_bytes().to_vec());
        self
    }

    /// Holds back reads of `locator` by `delay`.
    pub(crate) fn delayed(mut self, locator: &str, delay: Duration) -> Self {
        self.delays.insert(locator.to_string(), delay);
        self
    }
}

#[async_trait]
impl RawResourceReader for MemoryReader {
    async fn read(&self, locator: &str) -> Result<Vec<u8>, ServiceError> {
        if let Some(delay) = self.delays.get(locator) {
            tokio::time::sleep(*delay).await;
        }
        self.resources.get(locator).cloned().ok_or_else(|| {
            ServiceError::FileRead(PathBuf::from(locator), io::ErrorKind::NotFound.into())
        })
    }
}
