use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::{CatalogService, CatalogSource, LoadedCatalog};
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::puzzle_list::PuzzleListService;
use crate::sessions::PuzzleController;

/// Assembles app-facing services and holds the catalog fetched at launch.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    storage: Storage,
    catalog: Option<LoadedCatalog>,
    progress: Arc<ProgressService>,
    puzzle_list: Arc<PuzzleListService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and fetch the catalog.
    ///
    /// A catalog failure is logged and leaves the services without a catalog;
    /// the play view then shows its static error.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        source: CatalogSource,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let catalog = load_catalog(&CatalogService::new(source)).await;
        Ok(Self::from_parts(storage, catalog, clock))
    }

    /// Build services over existing storage and an already loaded catalog.
    #[must_use]
    pub fn from_parts(storage: Storage, catalog: Option<LoadedCatalog>, clock: Clock) -> Self {
        let progress = Arc::new(ProgressService::new(Arc::clone(&storage.progress)));
        let puzzle_list = Arc::new(PuzzleListService::new(Arc::clone(&storage.progress)));
        Self {
            clock,
            storage,
            catalog,
            progress,
            puzzle_list,
        }
    }

    /// In-memory services, mainly for tests and previews.
    #[must_use]
    pub fn in_memory(catalog: Option<LoadedCatalog>, clock: Clock) -> Self {
        Self::from_parts(Storage::in_memory(), catalog, clock)
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&LoadedCatalog> {
        self.catalog.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn puzzle_list(&self) -> Arc<PuzzleListService> {
        Arc::clone(&self.puzzle_list)
    }

    /// A fresh controller bound to the launch catalog and shared progress.
    #[must_use]
    pub fn start_controller(&self) -> PuzzleController {
        let mut controller =
            PuzzleController::new(self.clock, Arc::clone(&self.storage.progress));
        controller.attach_catalog(self.catalog.clone());
        controller
    }
}

/// Fetch the catalog, logging a failure once.
pub async fn load_catalog(service: &CatalogService) -> Option<LoadedCatalog> {
    match service.fetch().await {
        Ok(loaded) => {
            tracing::info!(source = %service.source(), puzzles = loaded.catalog().len(), "catalog ready");
            Some(loaded)
        }
        Err(err) => {
            tracing::error!(source = %service.source(), error = %err, "failed to load puzzle catalog");
            None
        }
    }
}
