use crate::services::error::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("No archive for station '{station}' in {year}")]
    NotFound { station: String, year: i32 },

    // Locator lookup or resource read failed
    #[error("Archive for station '{station}' in {year} is unreachable")]
    Unreachable {
        station: String,
        year: i32,
        #[source]
        source: ServiceError,
    },

    #[error("Malformed archive for station '{station}' in {year} at line {line}: {reason}")]
    MalformedSource {
        station: String,
        year: i32,
        line: usize,
        reason: String,
    },

    #[error("Archive for station '{station}' in {year} lacks required column '{variable}'")]
    MissingRequiredVariable {
        station: String,
        year: i32,
        variable: String,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
