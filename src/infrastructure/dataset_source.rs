use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::domain::error::{AppError, Result};

/// Where the raw CSV comes from on each visualization activation
#[async_trait]
pub trait DatasetSource {
    /// Raw file contents; every failure is an `AppError::DataLoad`
    async fn fetch(&self) -> Result<Vec<u8>>;

    fn describe(&self) -> String;
}

pub struct FileDatasetSource {
    path: PathBuf,
}

impl FileDatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileDatasetSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        debug!(path = %self.path.display(), "Reading dataset file");
        tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::DataLoad(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct HttpDatasetSource {
    client: reqwest::Client,
    url: url::Url,
}

impl HttpDatasetSource {
    pub fn new(url: url::Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        debug!(url = %self.url, "Fetching dataset");
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| AppError::DataLoad(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::DataLoad(format!(
                "Failed to load CSV file: HTTP {}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| AppError::DataLoad(format!("Failed to read response: {}", e)))
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// `http(s)://` locations are fetched over the network, anything else is a
/// filesystem path.
pub fn dataset_source_from_location(
    location: &str,
    timeout: Duration,
) -> Result<Arc<dyn DatasetSource + Send + Sync>> {
    match url::Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Arc::new(HttpDatasetSource::new(url, timeout)?))
        }
        _ => Ok(Arc::new(FileDatasetSource::new(location))),
    }
}
