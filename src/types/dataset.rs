//! Multi-station containers: the station metadata table returned by
//! [`crate::Buoy::list_stations`] and the merged observation dataset returned by
//! [`crate::Buoy::fetch_data`].

use crate::types::observation::Variables;
use crate::types::station::{Location, StationRecord};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Stations with known archive bounds, ordered by station id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationTable {
    stations: Vec<StationRecord>,
}

impl StationTable {
    /// Builds a table from records. Records with unknown bounds are dropped
    /// and a repeated id keeps its first record.
    pub fn new(records: impl IntoIterator<Item = StationRecord>) -> Self {
        let mut by_id: BTreeMap<String, StationRecord> = BTreeMap::new();
        for record in records.into_iter().filter(|r| r.bounds.is_known()) {
            by_id.entry(record.id.clone()).or_insert(record);
        }
        Self {
            stations: by_id.into_values().collect(),
        }
    }

    pub fn stations(&self) -> &[StationRecord] {
        &self.stations
    }

    pub fn get(&self, station_id: &str) -> Option<&StationRecord> {
        self.stations
            .binary_search_by(|r| r.id.as_str().cmp(station_id))
            .ok()
            .map(|i| &self.stations[i])
    }

    pub fn station_ids(&self) -> Vec<&str> {
        self.stations.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// One station's slice of a [`MergedDataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct StationData {
    /// `None` when the dataset was fetched without location metadata.
    pub location: Option<Location>,
    /// Values aligned with [`MergedDataset::time`].
    pub variables: Variables,
    /// Percentage of non-missing values per annotated variable.
    pub coverage: BTreeMap<String, f64>,
}

/// The union of several station series on a shared time axis, keyed by station id.
///
/// Every station holds every variable in the dataset; cells a station did not
/// observe are `None`. Stations whose fetch failed entirely are simply absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedDataset {
    pub(crate) time: Vec<NaiveDateTime>,
    pub(crate) stations: BTreeMap<String, StationData>,
}

impl MergedDataset {
    /// The shared, strictly increasing time axis.
    pub fn time(&self) -> &[NaiveDateTime] {
        &self.time
    }

    /// Ids of the stations present in the dataset, in ascending order.
    ///
    /// Compare against the requested ids to detect stations that returned no data.
    pub fn station_ids(&self) -> Vec<&str> {
        self.stations.keys().map(String::as_str).collect()
    }

    pub fn station(&self, station_id: &str) -> Option<&StationData> {
        self.stations.get(station_id)
    }

    pub fn stations(&self) -> impl Iterator<Item = (&str, &StationData)> {
        self.stations.iter().map(|(id, data)| (id.as_str(), data))
    }

    /// Variable names, taken from any station since all share the same set.
    pub fn variables(&self) -> Vec<&str> {
        self.stations
            .values()
            .next()
            .map(|s| s.variables.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn values(&self, station_id: &str, variable: &str) -> Option<&[Option<f64>]> {
        self.stations
            .get(station_id)?
            .variables
            .get(variable)
            .map(Vec::as_slice)
    }

    pub fn location(&self, station_id: &str) -> Option<Location> {
        self.stations.get(station_id)?.location
    }

    pub fn coverage(&self, station_id: &str, variable: &str) -> Option<f64> {
        self.stations.get(station_id)?.coverage.get(variable).copied()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
