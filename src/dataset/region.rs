//! Rectangular longitude/latitude regions and filtering stations by them.

use crate::dataset::error::DatasetError;
use crate::types::dataset::{MergedDataset, StationTable};
use crate::types::station::Location;
use bon::Builder;
use rstar::{RTree, AABB};
use serde::{Deserialize, Serialize};

/// An inclusive bounding box in signed decimal degrees.
///
/// Every bound left unset covers the whole globe on that side. A box whose
/// minimum exceeds its maximum contains nothing.
///
/// # Examples
///
/// ```
/// use buoydata::{Location, Region};
///
/// let region = Region::builder()
///     .lon_min(-75.0)
///     .lon_max(-65.0)
///     .lat_min(35.0)
///     .lat_max(45.0)
///     .build();
/// assert!(region.contains(&Location::new(40.0, -70.0).unwrap()));
/// assert!(!region.contains(&Location::new(30.0, -60.0).unwrap()));
///
/// // Only the northern hemisphere.
/// let north = Region::builder().lat_min(0.0).build();
/// assert_eq!(north.lon_min, -180.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Builder)]
pub struct Region {
    #[builder(default = -180.0)]
    pub lon_min: f64,
    #[builder(default = 180.0)]
    pub lon_max: f64,
    #[builder(default = -90.0)]
    pub lat_min: f64,
    #[builder(default = 90.0)]
    pub lat_max: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Region {
    pub fn contains(&self, location: &Location) -> bool {
        (self.lon_min..=self.lon_max).contains(&location.longitude)
            && (self.lat_min..=self.lat_max).contains(&location.latitude)
    }

    /// The box as an R-tree envelope over `[latitude, longitude]` points.
    fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.lat_min, self.lon_min], [self.lat_max, self.lon_max])
    }

    fn is_empty(&self) -> bool {
        self.lon_min > self.lon_max || self.lat_min > self.lat_max
    }
}

impl StationTable {
    /// Keeps the stations located inside `region`.
    pub fn filter_by_region(&self, region: &Region) -> StationTable {
        if region.is_empty() {
            return StationTable::default();
        }
        let tree = RTree::bulk_load(self.stations().to_vec());
        // StationTable::new restores id order.
        StationTable::new(tree.locate_in_envelope(&region.envelope()).cloned())
    }
}

impl MergedDataset {
    /// Keeps the stations located inside `region`. The time axis is unchanged.
    ///
    /// Fails with [`DatasetError::MissingLocation`] if the dataset was fetched
    /// without locations.
    pub fn filter_by_region(&self, region: &Region) -> Result<MergedDataset, DatasetError> {
        let mut stations = self.stations.clone();
        for (station_id, data) in &self.stations {
            let location = data
                .location
                .ok_or_else(|| DatasetError::MissingLocation(station_id.clone()))?;
            if !region.contains(&location) {
                stations.remove(station_id);
            }
        }
        Ok(MergedDataset {
            time: self.time.clone(),
            stations,
        })
    }
}
