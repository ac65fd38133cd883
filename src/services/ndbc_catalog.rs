//! The NDBC station catalog, read from the pipe-delimited `station_table.txt`.
//!
//! The table starts with a `#`-prefixed header row naming the columns and a
//! `#`-prefixed hint row, followed by one row per station. Only the id, type,
//! location and note columns are used, and only buoys are listed.
//!
//! Every operation downloads the table again.

use crate::config::ServiceConfig;
use crate::services::error::ServiceError;
use crate::services::http::{build_client, download};
use crate::services::StationCatalog;
use crate::types::station::CatalogLocation;
use async_trait::async_trait;
use log::{debug, info};
use polars::prelude::*;
use reqwest::Client;
use std::collections::HashSet;
use std::io::Cursor;
use tokio::task;

const STATION_TABLE_PATH: &str = "data/stations/station_table.txt";

pub struct NdbcStationCatalog {
    client: Client,
    table_url: String,
}

impl NdbcStationCatalog {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(config)?,
            table_url: config.url(STATION_TABLE_PATH),
        })
    }

    async fn read_table(&self) -> Result<Vec<(String, CatalogLocation)>, ServiceError> {
        let bytes = download(&self.client, &self.table_url).await?;
        let entries = task::spawn_blocking(move || parse_station_table(bytes)).await??;
        info!("Station table lists {} buoys", entries.len());
        Ok(entries)
    }
}

#[async_trait]
impl StationCatalog for NdbcStationCatalog {
    async fn list_station_ids(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .read_table()
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    async fn get_station_location(
        &self,
        station_id: &str,
    ) -> Result<CatalogLocation, ServiceError> {
        self.read_table()
            .await?
            .into_iter()
            .find(|(id, _)| id == station_id)
            .map(|(_, location)| location)
            .ok_or_else(|| ServiceError::UnknownStation(station_id.to_string()))
    }

    async fn station_locations(&self) -> Result<Vec<(String, CatalogLocation)>, ServiceError> {
        self.read_table().await
    }
}

struct Columns {
    id: usize,
    kind: Option<usize>,
    location: usize,
    note: Option<usize>,
}

/// Buoys in table order, first row winning for a repeated id.
fn parse_station_table(bytes: Vec<u8>) -> Result<Vec<(String, CatalogLocation)>, ServiceError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ServiceError::MalformedTable {
            line: 1,
            reason: "table is empty".into(),
        });
    }

    // Every column is read as text; no quoting, free text may contain `"`.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| {
            options
                .with_separator(b'|')
                .with_quote_char(None)
                .with_truncate_ragged_lines(true)
        })
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(ServiceError::TableParse)?;

    let columns = header_columns(&df).ok_or_else(|| ServiceError::MalformedTable {
        line: 1,
        reason: "header lacks a LOCATION column".into(),
    })?;
    let ids = text_column(&df, columns.id)?;
    let kinds = columns.kind.map(|i| text_column(&df, i)).transpose()?;
    let locations = text_column(&df, columns.location)?;
    let notes = columns.note.map(|i| text_column(&df, i)).transpose()?;

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for row in 0..df.height() {
        let id = ids.get(row).unwrap_or_default().trim();
        // The hint row below the header is commented out as well.
        if id.starts_with('#') {
            continue;
        }
        if id.is_empty() {
            debug!("Skipping station table row {} without an id", row + 1);
            continue;
        }
        if let Some(kinds) = kinds {
            let kind = kinds.get(row).unwrap_or_default();
            if !kind.to_lowercase().contains("buoy") {
                continue;
            }
        }
        if !seen.insert(id.to_string()) {
            continue;
        }

        let mut tokens = locations.get(row).unwrap_or_default().split_whitespace();
        let mut next = || tokens.next().unwrap_or_default().to_string();
        let location = CatalogLocation {
            latitude: next(),
            latitude_hemisphere: next(),
            longitude: next(),
            longitude_hemisphere: next(),
            notes: notes
                .and_then(|notes| notes.get(row))
                .unwrap_or_default()
                .trim()
                .to_string(),
        };
        entries.push((id.to_string(), location));
    }
    Ok(entries)
}

fn header_columns(df: &DataFrame) -> Option<Columns> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str().trim().trim_start_matches('#').trim().to_uppercase())
        .collect();
    let find = |wanted: &str| names.iter().position(|n| n == wanted);

    Some(Columns {
        id: find("STATION_ID").unwrap_or(0),
        kind: find("TTYPE"),
        location: find("LOCATION")?,
        note: find("NOTE"),
    })
}

fn text_column(df: &DataFrame, index: usize) -> Result<&StringChunked, ServiceError> {
    df.get_columns()[index].str().map_err(ServiceError::TableParse)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
# STATION_ID | OWNER | TTYPE | HULL | NAME | PAYLOAD | LOCATION | TIMEZONE | FORECAST | NOTE
#          |       |       |      |      |         |          |          |          |
0y2w3|CG|Weather Buoy||Sturgeon Bay CG Station, WI||44.794 N 87.313 W (44&#176;47'38\" N 87&#176;18'45\" W)|C|LMZ|
41001|NDBC|Weather Buoy|6N|EAST HATTERAS|MARS|34.724 N 72.317 W (34&#176;43'26\" N 72&#176;19'1\" W)|E|FZNT23| Station moved
tplm2|NDBC|C-MAN Station||Thomas Point, MD||38.899 N 76.436 W|E||
41001|NDBC|Weather Buoy|6N|EAST HATTERAS|MARS|0.0 N 0.0 W|E|FZNT23|
";

    fn parse(text: &str) -> Result<Vec<(String, CatalogLocation)>, ServiceError> {
        parse_station_table(text.as_bytes().to_vec())
    }

    #[test]
    fn test_parse_keeps_buoys_only() {
        let entries = parse(TABLE).unwrap();
        let ids: Vec<&str> = entries.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["0y2w3", "41001"]);

        let loc = &entries[1].1;
        assert_eq!(loc.latitude, "34.724");
        assert_eq!(loc.latitude_hemisphere, "N");
        assert_eq!(loc.longitude, "72.317");
        assert_eq!(loc.longitude_hemisphere, "W");
        assert_eq!(loc.notes, "Station moved");
        assert_eq!(entries[0].1.notes, "");
    }

    #[test]
    fn test_parse_requires_location_column() {
        let err = parse("# STATION_ID | OWNER\nabc|x\n").unwrap_err();
        assert!(matches!(err, ServiceError::MalformedTable { line: 1, .. }));
        assert!(parse("").is_err());
    }

    #[test]
    fn test_short_location_leaves_fields_empty() {
        let table = "# STATION_ID | TTYPE | LOCATION\nabc|Buoy|12.0 N\n";
        let entries = parse(table).unwrap();
        let loc = &entries[0].1;
        assert_eq!(loc.latitude, "12.0");
        assert_eq!(loc.longitude, "");
    }
}
