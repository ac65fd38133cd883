pub mod cadence;
pub mod dataset;
pub mod observation;
pub mod station;
