use std::sync::Arc;

use puzzle_core::model::{CompletionRecord, PuzzleId};
use storage::repository::ProgressRepository;

use crate::catalog_service::LoadedCatalog;
use crate::error::ProgressServiceError;

/// One card on the puzzle list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleListItem {
    pub id: PuzzleId,
    pub title: String,
    pub image_src: String,
    pub completed: bool,
    /// Zero when the puzzle has not been solved.
    pub score: u32,
}

/// Project the catalog and completion record into list cards, in id order.
#[must_use]
pub fn project_puzzle_list(loaded: &LoadedCatalog, record: &CompletionRecord) -> Vec<PuzzleListItem> {
    loaded
        .catalog()
        .iter()
        .map(|puzzle| {
            let completed = record.is_completed(puzzle.id());
            PuzzleListItem {
                id: puzzle.id().clone(),
                title: puzzle.title(),
                image_src: loaded.image_src(puzzle),
                completed,
                score: if completed { record.score_for(puzzle.id()) } else { 0 },
            }
        })
        .collect()
}

/// Builds the read-only puzzle list from persisted progress.
#[derive(Clone)]
pub struct PuzzleListService {
    progress: Arc<dyn ProgressRepository>,
}

impl PuzzleListService {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self { progress }
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if progress cannot be read.
    pub async fn list(
        &self,
        loaded: &LoadedCatalog,
    ) -> Result<Vec<PuzzleListItem>, ProgressServiceError> {
        let record = self.progress.load_completion().await?;
        Ok(project_puzzle_list(loaded, &record))
    }
}
