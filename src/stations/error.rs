use crate::services::error::ServiceError;
use crate::types::station::InvalidLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("Station catalog is unavailable")]
    Catalog(#[from] ServiceError),

    #[error("Station '{station}' has an invalid catalog location")]
    InvalidLocation {
        station: String,
        #[source]
        source: InvalidLocation,
    },
}
