//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use puzzle_core::model::{CatalogParseError, PuzzleId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("invalid catalog source: {0}")]
    InvalidSource(String),
    #[error("catalog request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("cannot read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] CatalogParseError),
}

/// Errors emitted by the puzzle session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no puzzle is loaded")]
    NoPuzzleLoaded,
    #[error("puzzle already solved")]
    Completed,
    #[error("puzzle {0} is not in the catalog")]
    UnknownPuzzle(PuzzleId),
    #[error("puzzle catalog is unavailable")]
    CatalogUnavailable,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService` and `PuzzleListService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
