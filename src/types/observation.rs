//! Time-indexed observation containers produced by the fetch pipeline.

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

/// Variable name to values, index-aligned with a timestamp axis. `None` is missing.
pub type Variables = BTreeMap<String, Vec<Option<f64>>>;

/// The normalized, resampled output of fetching one station-year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearObservationBatch {
    pub station_id: String,
    pub year: i32,
    /// Strictly increasing bucket labels.
    pub timestamps: Vec<NaiveDateTime>,
    pub variables: Variables,
}

/// All successfully fetched years of one station, concatenated on a single axis.
///
/// The axis is strictly increasing and every variable has the axis length.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSeries {
    station_id: String,
    timestamps: Vec<NaiveDateTime>,
    variables: Variables,
}

impl YearObservationBatch {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl StationSeries {
    /// Concatenates batches into one series.
    ///
    /// Batches are taken in the given order and rows are stably sorted by
    /// timestamp, so when two batches share a timestamp the row from the
    /// earlier batch wins. Variables missing from a batch are filled with
    /// `None`. Returns `None` when the batches hold no rows at all.
    pub fn concat(station_id: &str, batches: Vec<YearObservationBatch>) -> Option<Self> {
        if batches.iter().all(YearObservationBatch::is_empty) {
            return None;
        }

        let names: BTreeSet<String> = batches
            .iter()
            .flat_map(|b| b.variables.keys().cloned())
            .collect();

        // (timestamp, batch, row) triples; sort_by_key is stable.
        let mut rows: Vec<(NaiveDateTime, usize, usize)> = batches
            .iter()
            .enumerate()
            .flat_map(|(b, batch)| {
                batch
                    .timestamps
                    .iter()
                    .enumerate()
                    .map(move |(r, ts)| (*ts, b, r))
            })
            .collect();
        rows.sort_by_key(|(ts, _, _)| *ts);
        rows.dedup_by_key(|(ts, _, _)| *ts);

        let timestamps = rows.iter().map(|(ts, _, _)| *ts).collect();
        let variables = names
            .into_iter()
            .map(|name| {
                let values = rows
                    .iter()
                    .map(|(_, b, r)| {
                        batches[*b]
                            .variables
                            .get(&name)
                            .and_then(|column| column[*r])
                    })
                    .collect();
                (name, values)
            })
            .collect();

        Some(Self {
            station_id: station_id.to_string(),
            timestamps,
            variables,
        })
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn values(&self, variable: &str) -> Option<&[Option<f64>]> {
        self.variables.get(variable).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
