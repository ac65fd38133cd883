use crate::config::ServiceConfig;
use crate::services::error::ServiceError;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use reqwest::Client;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

pub(crate) fn build_client(config: &ServiceConfig) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(ServiceError::ClientBuild)
}

/// Downloads `url`, gunzipping on the fly when the resource name ends in `.gz`.
pub(crate) async fn download(client: &Client, url: &str) -> Result<Vec<u8>, ServiceError> {
    info!("Downloading {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ServiceError::NetworkRequest(url.to_string(), e))?;

    let response = match response.error_for_status() {
        Ok(resp) => resp,
        Err(e) => {
            warn!("HTTP error for {}: {:?}", url, e);
            return Err(if let Some(status) = e.status() {
                ServiceError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e,
                }
            } else {
                ServiceError::NetworkRequest(url.to_string(), e)
            });
        }
    };

    let stream = response.bytes_stream().map_err(std::io::Error::other);
    let stream_reader = StreamReader::new(stream);

    let mut body = Vec::new();
    if is_gzip_name(url) {
        let mut decoder = GzipDecoder::new(stream_reader);
        decoder
            .read_to_end(&mut body)
            .await
            .map_err(|e| ServiceError::DownloadIo(url.to_string(), e))?;
    } else {
        let mut reader = stream_reader;
        reader
            .read_to_end(&mut body)
            .await
            .map_err(|e| ServiceError::DownloadIo(url.to_string(), e))?;
    }
    debug!("Read {} bytes from {}", body.len(), url);
    Ok(body)
}

/// True when the resource path (query string excluded) names a gzip file.
pub(crate) fn is_gzip_name(locator: &str) -> bool {
    let path = locator.split(['?', '#']).next().unwrap_or(locator);
    path.ends_with(".gz")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gzip_detection_ignores_query() {
        assert!(is_gzip_name("https://host/data/historical/stdmet/tplm2h2019.txt.gz"));
        assert!(is_gzip_name("/mirror/tplm2h2019.txt.gz"));
        // The text view of an archive names the .gz only in its query string.
        assert!(!is_gzip_name(
            "https://host/view_text_file.php?filename=tplm2h2019.txt.gz&dir=data/historical/stdmet/"
        ));
        assert!(!is_gzip_name("station_table.txt"));
    }
}
