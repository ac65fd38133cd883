use crate::config::ServiceConfig;
use crate::services::error::ServiceError;
use crate::services::http::{build_client, download, is_gzip_name};
use crate::services::RawResourceReader;
use async_compression::tokio::bufread::GzipDecoder;
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};

/// Reads locators as URLs.
pub struct HttpResourceReader {
    client: Client,
}

impl HttpResourceReader {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

#[async_trait]
impl RawResourceReader for HttpResourceReader {
    async fn read(&self, locator: &str) -> Result<Vec<u8>, ServiceError> {
        download(&self.client, locator).await
    }
}

/// Reads locators as paths, relative ones resolved against a mirror directory.
/// Files ending in `.gz` are decompressed.
pub struct FileResourceReader {
    root: PathBuf,
}

impl FileResourceReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, locator: &str) -> PathBuf {
        let path = Path::new(locator);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl RawResourceReader for FileResourceReader {
    async fn read(&self, locator: &str) -> Result<Vec<u8>, ServiceError> {
        let path = self.resolve(locator);
        let file = File::open(&path)
            .await
            .map_err(|e| ServiceError::FileRead(path.clone(), e))?;

        let mut body = Vec::new();
        let result = if is_gzip_name(locator) {
            GzipDecoder::new(BufReader::new(file))
                .read_to_end(&mut body)
                .await
        } else {
            BufReader::new(file).read_to_end(&mut body).await
        };
        result.map_err(|e| ServiceError::FileRead(path, e))?;
        Ok(body)
    }
}
