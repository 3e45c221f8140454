use std::fmt;
use std::path::{Path, PathBuf};

use puzzle_core::model::{Catalog, Puzzle};
use reqwest::Client;
use url::Url;

use crate::error::CatalogError;

/// Where the puzzle catalog document lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Http(Url),
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret `raw` as an `http(s)` URL or, failing that, a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidSource` for blank input or a malformed URL.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CatalogError::InvalidSource("empty catalog location".into()));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).map_err(|e| CatalogError::InvalidSource(e.to_string()))?;
            return Ok(Self::Http(url));
        }
        Ok(Self::File(PathBuf::from(raw)))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A parsed catalog plus the location its image paths are relative to.
#[derive(Clone, Debug)]
pub struct LoadedCatalog {
    catalog: Catalog,
    source: CatalogSource,
}

impl LoadedCatalog {
    #[must_use]
    pub fn new(catalog: Catalog, source: CatalogSource) -> Self {
        Self { catalog, source }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Resolve a puzzle's image path against the catalog location.
    ///
    /// Absolute URLs in the catalog are returned untouched.
    #[must_use]
    pub fn image_src(&self, puzzle: &Puzzle) -> String {
        let path = puzzle.image_path();
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        match &self.source {
            CatalogSource::Http(base) => base
                .join(path)
                .map_or_else(|_| path.to_string(), |url| url.to_string()),
            CatalogSource::File(file) => file
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(path)
                .display()
                .to_string(),
        }
    }
}

/// Fetches the puzzle catalog once per launch.
#[derive(Clone)]
pub struct CatalogService {
    client: Client,
    source: CatalogSource,
}

impl CatalogService {
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self {
            client: Client::new(),
            source,
        }
    }

    #[must_use]
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Retrieve and parse the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the request fails, the server answers with a
    /// non-success status, the file cannot be read, or the document is invalid.
    pub async fn fetch(&self) -> Result<LoadedCatalog, CatalogError> {
        let body = match &self.source {
            CatalogSource::Http(url) => {
                let response = self.client.get(url.clone()).send().await?;
                if !response.status().is_success() {
                    return Err(CatalogError::HttpStatus(response.status()));
                }
                response.text().await?
            }
            CatalogSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogError::Io {
                    path: path.clone(),
                    source,
                })?,
        };

        let catalog = Catalog::from_json(&body)?;
        tracing::debug!(source = %self.source, puzzles = catalog.len(), "catalog loaded");
        Ok(LoadedCatalog::new(catalog, self.source.clone()))
    }
}
