//! Loader for the static work-order export.
//!
//! The export is a JSON array of work orders, read once per view either from
//! disk or over plain GET. No schema validation beyond deserialization; a
//! failed load surfaces as `LoadState::Failed` and is never retried
//! automatically.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::catalog::Catalog;
use crate::error::{CatalogError, ErrorPayload};
use crate::types::{Config, WorkOrder};

/// Where the export lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Remote(Url),
}

impl DataSource {
    /// `http(s)://` → remote, `file://` or anything that isn't a URL → file.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CatalogError::InvalidSource("empty data source".to_string()));
        }
        match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(DataSource::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(DataSource::File)
                    .map_err(|_| CatalogError::InvalidSource(raw.to_string())),
                // Drive letters ("C:\data.json") parse as one-letter schemes
                scheme if scheme.len() == 1 => Ok(DataSource::File(PathBuf::from(raw))),
                _ => Err(CatalogError::InvalidSource(raw.to_string())),
            },
            Err(_) => Ok(DataSource::File(PathBuf::from(raw))),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Outcome of the one-time load, as the view layer sees it. The pending
/// state is the unresolved `load_catalog` future itself.
#[derive(Debug, Clone)]
pub enum LoadState {
    Ready(Arc<Catalog>),
    Failed { error: ErrorPayload },
}

impl LoadState {
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            LoadState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed { .. })
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        match self {
            LoadState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Parse an export body into records. Only the top-level array shape is
/// enforced; missing or `null` fields in a row load as empty.
pub fn parse_work_orders(content: &str) -> Result<Vec<WorkOrder>, CatalogError> {
    Ok(serde_json::from_str(content)?)
}

/// Fetch and parse the export.
pub async fn load_work_orders(
    source: &DataSource,
    timeout: Duration,
) -> Result<Vec<WorkOrder>, CatalogError> {
    match source {
        DataSource::File(path) => {
            let content = match tokio::fs::read_to_string(path).await {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(CatalogError::NotFound(path.clone()))
                }
                Err(e) => return Err(e.into()),
            };
            parse_work_orders(&content)
        }
        DataSource::Remote(url) => fetch_remote(url, timeout).await,
    }
}

async fn fetch_remote(url: &Url, timeout: Duration) -> Result<Vec<WorkOrder>, CatalogError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CatalogError::Network(e.to_string()))?;

    let resp = client.get(url.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            CatalogError::Timeout(timeout.as_secs())
        } else {
            CatalogError::from(e)
        }
    })?;

    if !resp.status().is_success() {
        return Err(CatalogError::HttpStatus {
            status: resp.status().as_u16(),
            url: url.to_string(),
        });
    }

    let body = resp.text().await?;
    parse_work_orders(&body)
}

/// Load the configured export into a ready catalog, or a failed state.
///
/// Never returns an error: failures are logged and become `LoadState::Failed`.
pub async fn load_catalog(config: &Config) -> LoadState {
    let source = match DataSource::parse(&config.data_source) {
        Ok(source) => source,
        Err(e) => {
            log::error!("Error loading work orders: {}", e);
            return LoadState::Failed {
                error: ErrorPayload::from(&e),
            };
        }
    };

    let timeout = Duration::from_secs(config.request_timeout_secs.max(1));
    match load_work_orders(&source, timeout).await {
        Ok(records) => {
            log::info!("Loaded {} work orders from {}", records.len(), source);
            LoadState::Ready(Arc::new(Catalog::new(records)))
        }
        Err(e) => {
            log::error!("Error loading work orders from {}: {}", source, e);
            LoadState::Failed {
                error: ErrorPayload::from(&e),
            }
        }
    }
}
