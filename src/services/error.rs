use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    // Stream errors and gzip decompression
    #[error("Download or decompression failed for {0}")]
    DownloadIo(String, #[source] std::io::Error),

    #[error("Failed to read local resource '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Malformed station table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("Failed to read the station table")]
    TableParse(#[source] PolarsError),

    #[error("Station table parsing task failed")]
    TaskJoin(#[from] JoinError),

    #[error("Station '{0}' is not in the catalog")]
    UnknownStation(String),
}
