use crate::config::ServiceConfig;
use crate::services::error::ServiceError;
use crate::services::http::{build_client, download};
use crate::services::{HistoricalLocatorService, YearLocators};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

const STDMET_DIR: &str = "data/historical/stdmet/";

/// Finds yearly standard meteorological archives by reading a station's
/// history page, and points each one at its plain-text view.
pub struct NdbcLocatorService {
    client: Client,
    base_url: String,
}

impl NdbcLocatorService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.url(""),
        })
    }

    fn history_url(&self, station_id: &str) -> String {
        format!("{}station_history.php?station={}", self.base_url, station_id)
    }
}

#[async_trait]
impl HistoricalLocatorService for NdbcLocatorService {
    async fn available_years(&self, station_id: &str) -> Result<YearLocators, ServiceError> {
        let page = download(&self.client, &self.history_url(station_id)).await?;
        let page = String::from_utf8_lossy(&page);
        let locators = parse_history_page(&page, station_id, &self.base_url);
        debug!(
            "Station {} lists {} stdmet years",
            station_id,
            locators.len()
        );
        Ok(locators)
    }
}

/// Collects `filename={id}h{year}.txt.gz&dir=data/historical/stdmet/` links.
fn parse_history_page(page: &str, station_id: &str, base_url: &str) -> YearLocators {
    let prefix = format!("{}h", station_id.to_lowercase());
    let mut locators = YearLocators::new();

    for (start, _) in page.match_indices("filename=") {
        let link = &page[start..];
        let end = link.find(['"', '\'', '>', ' ']).unwrap_or(link.len());
        let query = link[..end].replace("&amp;", "&");

        let mut filename = None;
        let mut dir = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("filename", value)) => filename = Some(value),
                Some(("dir", value)) => dir = Some(value),
                _ => {}
            }
        }
        let (Some(filename), Some(STDMET_DIR)) = (filename, dir) else {
            continue;
        };

        let Some(year) = filename
            .to_lowercase()
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".txt.gz"))
            .filter(|year| !year.is_empty() && year.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
        else {
            continue;
        };

        locators.entry(year).or_insert_with(|| {
            format!(
                "{}view_text_file.php?filename={}&dir={}",
                base_url, filename, STDMET_DIR
            )
        });
    }
    locators
}
