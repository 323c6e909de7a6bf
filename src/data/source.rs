//! Data sources for chart input
//!
//! Observations (and the bar chart's box averages) are JSON arrays served by
//! the dashboard backend or stored on disk. Both are fetched once, up front.

use super::error::Result;
use super::records::{BoxAverage, ObservationSet};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Where chart JSON comes from
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human readable location for logging
    fn describe(&self) -> String;

    /// Raw JSON payload
    async fn fetch_bytes(&self) -> Result<Vec<u8>>;

    async fn load_observations(&self) -> Result<ObservationSet> {
        let bytes = self.fetch_bytes().await?;
        let set = ObservationSet::from_json(&bytes)?;
        info!(
            "Loaded {} observations from {} ({} .. {})",
            set.len(),
            self.describe(),
            set.min_date(),
            set.max_date()
        );
        Ok(set)
    }
}

/// Fetch and decode any JSON payload from a source
pub async fn load_json<T: DeserializeOwned>(source: &dyn DataSource) -> Result<T> {
    let bytes = source.fetch_bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Per-box averages for the bar chart
pub async fn load_box_averages(source: &dyn DataSource) -> Result<Vec<BoxAverage>> {
    let boxes: Vec<BoxAverage> = load_json(source).await?;
    info!("Loaded {} box averages from {}", boxes.len(), source.describe());
    Ok(boxes)
}

/// JSON file on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_bytes(&self) -> Result<Vec<u8>> {
        debug!("Reading {}", self.path.display());
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// JSON endpoint fetched with a GET request
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(HttpSource {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch_bytes(&self) -> Result<Vec<u8>> {
        debug!("GET {}", self.url);
        let resp = self.client.get(&self.url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}

/// URLs (`http://`, `https://`) become HTTP sources, anything else a file path
pub fn source_for(location: &str) -> Result<Box<dyn DataSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}
