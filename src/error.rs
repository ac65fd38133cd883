use crate::dataset::error::DatasetError;
use crate::records::error::RecordError;
use crate::services::error::ServiceError;
use crate::stations::error::StationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuoyError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Station(#[from] StationError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
