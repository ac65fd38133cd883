use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Station '{0}' has a series but no metadata to join with")]
    InconsistentJoin(String),

    #[error("Dataset has an empty time axis")]
    EmptyTimeAxis,

    #[error("Variable '{0}' is not in the dataset")]
    UnknownVariable(String),

    #[error("Station '{0}' has no location to filter on")]
    MissingLocation(String),

    #[error("Failed building DataFrame")]
    Frame(#[from] PolarsError),
}
