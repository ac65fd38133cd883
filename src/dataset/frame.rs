use crate::dataset::coverage::coverage_field;
use crate::dataset::error::DatasetError;
use crate::types::dataset::{MergedDataset, StationTable};
use chrono::NaiveDateTime;
use polars::prelude::{Column, DataFrame};
use std::collections::BTreeSet;

impl StationTable {
    /// One row per station: `station_id`, `latitude`, `longitude`, `notes`,
    /// `min_year`, `max_year`.
    pub fn to_frame(&self) -> Result<DataFrame, DatasetError> {
        let stations = self.stations();
        let ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();
        let latitudes: Vec<f64> = stations.iter().map(|s| s.location.latitude).collect();
        let longitudes: Vec<f64> = stations.iter().map(|s| s.location.longitude).collect();
        let notes: Vec<&str> = stations.iter().map(|s| s.notes.as_str()).collect();
        let min_years: Vec<Option<i32>> = stations
            .iter()
            .map(|s| s.bounds.years().map(|(min, _)| min))
            .collect();
        let max_years: Vec<Option<i32>> = stations
            .iter()
            .map(|s| s.bounds.years().map(|(_, max)| max))
            .collect();

        Ok(DataFrame::new(vec![
            Column::new("station_id".into(), ids),
            Column::new("latitude".into(), latitudes),
            Column::new("longitude".into(), longitudes),
            Column::new("notes".into(), notes),
            Column::new("min_year".into(), min_years),
            Column::new("max_year".into(), max_years),
        ])?)
    }
}

impl MergedDataset {
    /// Long format: one row per station and time step.
    ///
    /// Columns are `station_id`, `time`, `latitude`, `longitude`, one column
    /// per variable, and a `{variable}_coverage` column for every annotated
    /// variable, repeated on each row of the station.
    pub fn to_frame(&self) -> Result<DataFrame, DatasetError> {
        let steps = self.time.len();
        let rows = steps * self.stations.len();

        let mut ids: Vec<&str> = Vec::with_capacity(rows);
        let mut time: Vec<NaiveDateTime> = Vec::with_capacity(rows);
        let mut latitudes: Vec<Option<f64>> = Vec::with_capacity(rows);
        let mut longitudes: Vec<Option<f64>> = Vec::with_capacity(rows);
        for (station_id, data) in &self.stations {
            ids.extend(std::iter::repeat(station_id.as_str()).take(steps));
            time.extend_from_slice(&self.time);
            latitudes.extend(std::iter::repeat(data.location.map(|l| l.latitude)).take(steps));
            longitudes.extend(std::iter::repeat(data.location.map(|l| l.longitude)).take(steps));
        }

        let mut columns = vec![
            Column::new("station_id".into(), ids),
            Column::new("time".into(), time),
            Column::new("latitude".into(), latitudes),
            Column::new("longitude".into(), longitudes),
        ];

        for variable in self.variables() {
            let values: Vec<Option<f64>> = self
                .stations
                .values()
                .flat_map(|data| match data.variables.get(variable) {
                    Some(values) => values.clone(),
                    None => vec![None; steps],
                })
                .collect();
            columns.push(Column::new(variable.into(), values));
        }

        let annotated: BTreeSet<&str> = self
            .stations
            .values()
            .flat_map(|data| data.coverage.keys().map(String::as_str))
            .collect();
        for variable in annotated {
            let values: Vec<Option<f64>> = self
                .stations
                .values()
                .flat_map(|data| std::iter::repeat(data.coverage.get(variable).copied()).take(steps))
                .collect();
            columns.push(Column::new(coverage_field(variable).into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }
}
