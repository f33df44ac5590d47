use crate::domain::ports::CatalogSource;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::is_remote_location;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Making catalog request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);
        if !status.is_success() {
            return Err(CatalogError::CatalogUnavailable {
                location: self.url.clone(),
                reason: format!("HTTP status {}", status),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading catalog file: {}", self.path.display());
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// HTTP for `http(s)://` locations, a local file otherwise.
pub fn catalog_source_for(location: &str) -> Box<dyn CatalogSource> {
    if is_remote_location(location) {
        Box::new(HttpCatalogSource::new(location))
    } else {
        Box::new(FileCatalogSource::new(location))
    }
}
