use crate::services::StationCatalog;
use crate::stations::bounds::StationBoundsResolver;
use crate::stations::error::StationError;
use crate::types::dataset::StationTable;
use crate::types::station::{CatalogLocation, Location, StationRecord};
use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Joins catalog entries with their archive bounds.
///
/// Each call reads the catalog once.
#[derive(Clone)]
pub struct StationMetadataBuilder {
    catalog: Arc<dyn StationCatalog>,
    bounds: StationBoundsResolver,
}

impl StationMetadataBuilder {
    pub fn new(catalog: Arc<dyn StationCatalog>, bounds: StationBoundsResolver) -> Self {
        Self { catalog, bounds }
    }

    /// Lists the catalog and keeps the stations with known bounds and a valid
    /// location. Only a failure to list the catalog is an error.
    pub async fn build_table(&self) -> Result<StationTable, StationError> {
        let entries: HashMap<String, CatalogLocation> =
            self.catalog.station_locations().await?.into_iter().collect();
        let bounds = self
            .bounds
            .resolve_bounds_many(entries.keys().map(String::as_str))
            .await;

        let mut records = Vec::new();
        for (id, bounds) in bounds {
            if !bounds.is_known() {
                warn!("Station {} has no archive bounds, leaving it out", id);
                continue;
            }
            let Some(raw) = entries.get(&id) else {
                continue;
            };
            match locate(&id, raw) {
                Ok(location) => records.push(StationRecord {
                    location,
                    notes: raw.notes.clone(),
                    bounds,
                    id,
                }),
                Err(e) => warn!("Leaving station {} out: {}", id, e),
            }
        }

        let table = StationTable::new(records);
        info!("Station table holds {} stations", table.len());
        Ok(table)
    }

    /// Locations of the given stations. Stations missing from the catalog or
    /// with an unusable location are logged and left out.
    pub async fn locate_many<'a>(
        &self,
        station_ids: impl IntoIterator<Item = &'a str>,
    ) -> Result<BTreeMap<String, Location>, StationError> {
        let entries: HashMap<String, CatalogLocation> =
            self.catalog.station_locations().await?.into_iter().collect();

        let mut locations = BTreeMap::new();
        for id in station_ids {
            let Some(raw) = entries.get(id) else {
                warn!("Station {} is not in the catalog", id);
                continue;
            };
            match locate(id, raw) {
                Ok(location) => {
                    locations.insert(id.to_string(), location);
                }
                Err(e) => warn!("Could not locate station {}: {}", id, e),
            }
        }
        Ok(locations)
    }
}

fn locate(station_id: &str, raw: &CatalogLocation) -> Result<Location, StationError> {
    Location::from_catalog(raw).map_err(|source| StationError::InvalidLocation {
        station: station_id.to_string(),
        source,
    })
}
