//! Per station-year retrieval: fetch an archive, parse it, normalize it onto a
//! cadence, and gather the years of a station into one series.

pub mod error;
pub mod fetcher;
pub mod normalizer;
pub mod raw_table;
pub mod year_fetcher;
