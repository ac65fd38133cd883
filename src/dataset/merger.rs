//! Outer join of per-station series onto one shared time axis.

use crate::dataset::error::DatasetError;
use crate::types::dataset::{MergedDataset, StationData};
use crate::types::observation::StationSeries;
use crate::types::station::Location;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

/// Merges series and attaches each station's location.
///
/// Fails with [`DatasetError::InconsistentJoin`] when a series has no entry in
/// `locations`.
pub fn merge(
    series: Vec<StationSeries>,
    locations: &BTreeMap<String, Location>,
) -> Result<MergedDataset, DatasetError> {
    join(series, |station_id| {
        locations
            .get(station_id)
            .copied()
            .map(Some)
            .ok_or_else(|| DatasetError::InconsistentJoin(station_id.to_string()))
    })
}

/// Merges series without location metadata.
pub fn merge_unlocated(series: Vec<StationSeries>) -> MergedDataset {
    // The lookup below never fails
    join(series, |_| Ok(None)).unwrap_or_default()
}

fn join<F>(series: Vec<StationSeries>, mut location_of: F) -> Result<MergedDataset, DatasetError>
where
    F: FnMut(&str) -> Result<Option<Location>, DatasetError>,
{
    let time: Vec<NaiveDateTime> = series
        .iter()
        .flat_map(|s| s.timestamps().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let names: BTreeSet<&str> = series
        .iter()
        .flat_map(|s| s.variables().keys().map(String::as_str))
        .collect();

    let mut stations = BTreeMap::new();
    for s in &series {
        if stations.contains_key(s.station_id()) {
            continue;
        }
        let location = location_of(s.station_id())?;

        // Both axes are sorted, so every station timestamp has a slot.
        let slots: Vec<usize> = s
            .timestamps()
            .iter()
            .filter_map(|ts| time.binary_search(ts).ok())
            .collect();
        let variables = names
            .iter()
            .map(|name| {
                let mut column = vec![None; time.len()];
                if let Some(values) = s.values(name) {
                    for (slot, value) in slots.iter().zip(values) {
                        column[*slot] = *value;
                    }
                }
                (name.to_string(), column)
            })
            .collect();

        stations.insert(
            s.station_id().to_string(),
            StationData {
                location,
                variables,
                coverage: BTreeMap::new(),
            },
        );
    }

    Ok(MergedDataset { time, stations })
}
