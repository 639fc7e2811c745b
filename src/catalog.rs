//! Error catalog loading.
//!
//! The catalog is a JSON document of known error codes fetched once per report
//! through a `ContentLoader`. Loading never fails the report: the outcome is a
//! `CatalogLoad` value the caller logs and degrades on.

use crate::error::{ReportError, Result};
use crate::models::catalog::{ErrorCatalog, ErrorDefinitionDoc};
use async_trait::async_trait;
use std::sync::Arc;

/// Upstream location of the error definitions document.
pub const DEFAULT_ERROR_CATALOG: &str =
    "https://github.com/Azure/oav/blob/develop/documentation/error-definitions.json";

const GITHUB_HOST: &str = "https://github.com/";
const GITHUB_RAW_HOST: &str = "https://raw.githubusercontent.com/";

#[async_trait]
/// Fetches the text content behind a URL or file path.
pub trait ContentLoader: Send + Sync {
    async fn load(&self, location: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Loads `http(s)` locations over the network and everything else from disk.
pub struct FileLoader;

#[async_trait]
impl ContentLoader for FileLoader {
    async fn load(&self, location: &str) -> Result<String> {
        if is_remote(location) {
            let url = location.to_string();
            tokio::task::spawn_blocking(move || fetch_remote(&url))
                .await
                .map_err(|e| ReportError::Http {
                    location: location.to_string(),
                    reason: e.to_string(),
                })?
        } else {
            tokio::fs::read_to_string(location)
                .await
                .map_err(|e| ReportError::io(location, e))
        }
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn fetch_remote(url: &str) -> Result<String> {
    let http_err = |e: ureq::Error| ReportError::Http {
        location: url.to_string(),
        reason: e.to_string(),
    };
    let mut response = ureq::get(url).call().map_err(http_err)?;
    response.body_mut().read_to_string().map_err(http_err)
}

/// Map a GitHub `blob` page URL to its raw-content URL; other inputs pass through.
pub fn resolve_github_url(url: &str) -> String {
    match url.strip_prefix(GITHUB_HOST) {
        Some(rest) if rest.contains("/blob/") => {
            format!("{}{}", GITHUB_RAW_HOST, rest.replacen("/blob/", "/", 1))
        }
        _ => url.to_string(),
    }
}

/// Parse a catalog document.
pub fn parse_catalog(content: &str) -> Result<ErrorCatalog> {
    let doc: ErrorDefinitionDoc =
        serde_json::from_str(content).map_err(|source| ReportError::Json {
            context: "error catalog".to_string(),
            source,
        })?;
    Ok(doc.into())
}

#[derive(Debug)]
/// Outcome of a catalog fetch.
pub enum CatalogLoad {
    Loaded(ErrorCatalog),
    Failed { reason: String },
}

#[derive(Clone)]
pub struct ErrorCatalogLoader {
    loader: Arc<dyn ContentLoader>,
    location: String,
}

impl ErrorCatalogLoader {
    pub fn new(loader: Arc<dyn ContentLoader>, location: impl Into<String>) -> Self {
        Self {
            loader,
            location: location.into(),
        }
    }

    /// Loader for `location` using the default `FileLoader`.
    pub fn from_location(location: impl Into<String>) -> Self {
        Self::new(Arc::new(FileLoader), location)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub async fn load(&self) -> CatalogLoad {
        let resolved = resolve_github_url(&self.location);
        let loaded = match self.loader.load(&resolved).await {
            Ok(content) => parse_catalog(&content),
            Err(e) => Err(e),
        };
        match loaded {
            Ok(catalog) => {
                tracing::debug!(location = %resolved, codes = catalog.len(), "error catalog loaded");
                CatalogLoad::Loaded(catalog)
            }
            Err(e) => CatalogLoad::Failed {
                reason: e.to_string(),
            },
        }
    }
}
