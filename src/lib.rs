mod buoy;
mod config;
mod error;
mod pool;
mod types;

pub mod dataset;
pub mod records;
pub mod services;
pub mod stations;

#[cfg(test)]
mod test_support;

pub use buoy::*;
pub use config::{FetchConfig, ServiceConfig};
pub use error::BuoyError;
pub use pool::WorkerPool;

pub use types::cadence::{Cadence, ParseCadenceError};
pub use types::dataset::{MergedDataset, StationData, StationTable};
pub use types::observation::{StationSeries, Variables, YearObservationBatch};
pub use types::station::{Bounds, CatalogLocation, InvalidLocation, Location, StationRecord};

pub use dataset::coverage::{coverage_description, coverage_field};
pub use dataset::error::DatasetError;
pub use dataset::region::Region;
pub use records::error::RecordError;
pub use services::error::ServiceError;
pub use stations::error::StationError;
