use crate::dataset::error::DatasetError;
use crate::types::dataset::MergedDataset;
use log::debug;

/// Name of the coverage field for `variable` in exported frames.
pub fn coverage_field(variable: &str) -> String {
    format!("{}_coverage", variable)
}

/// Human readable description of the coverage field for `variable`.
pub fn coverage_description(variable: &str) -> String {
    format!(
        "percentage of existing {} data across specified interval length",
        variable
    )
}

/// Stores, per station, the percentage of time steps where `variable` is present.
///
/// Annotating the same variable twice overwrites the earlier value.
pub fn annotate_coverage(
    mut dataset: MergedDataset,
    variable: &str,
) -> Result<MergedDataset, DatasetError> {
    let total = dataset.time.len();
    if total == 0 {
        return Err(DatasetError::EmptyTimeAxis);
    }
    if !dataset
        .stations
        .values()
        .any(|s| s.variables.contains_key(variable))
    {
        return Err(DatasetError::UnknownVariable(variable.to_string()));
    }

    for (station_id, data) in dataset.stations.iter_mut() {
        let present = data
            .variables
            .get(variable)
            .map_or(0, |values| values.iter().filter(|v| v.is_some()).count());
        let coverage = 100.0 * present as f64 / total as f64;
        debug!("Station {} {} coverage: {:.1}%", station_id, variable, coverage);
        data.coverage.insert(variable.to_string(), coverage);
    }
    Ok(dataset)
}
