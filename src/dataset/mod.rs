//! Operations on multi-station data: merging series, coverage, region
//! filtering and DataFrame export.

pub mod coverage;
pub mod error;
pub mod frame;
pub mod merger;
pub mod region;
