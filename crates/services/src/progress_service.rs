use std::sync::Arc;

use puzzle_core::model::{ACHIEVEMENTS, AchievementDef, CompletionRecord};
use storage::repository::ProgressRepository;

use crate::error::ProgressServiceError;

/// One built-in achievement and whether the player holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementStatus {
    pub def: &'static AchievementDef,
    pub unlocked: bool,
}

/// Read-mostly access to persisted progress for list and tutorial screens.
#[derive(Clone)]
pub struct ProgressService {
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self { progress }
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if progress cannot be read.
    pub async fn completion(&self) -> Result<CompletionRecord, ProgressServiceError> {
        Ok(self.progress.load_completion().await?)
    }

    /// Every built-in achievement in definition order.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if achievements cannot be read.
    pub async fn achievements(&self) -> Result<Vec<AchievementStatus>, ProgressServiceError> {
        let record = self.progress.load_achievements().await?;
        Ok(ACHIEVEMENTS
            .iter()
            .map(|def| AchievementStatus {
                def,
                unlocked: record.is_unlocked(def.id),
            })
            .collect())
    }

    /// Sum of all persisted puzzle scores.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if progress cannot be read.
    pub async fn total_score(&self) -> Result<u64, ProgressServiceError> {
        Ok(self.progress.load_completion().await?.total_score())
    }

    /// True until the player dismisses the "How to play" banner once.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the marker cannot be read.
    pub async fn should_show_tutorial(&self) -> Result<bool, ProgressServiceError> {
        Ok(!self.progress.has_visited().await?)
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the marker cannot be written.
    pub async fn mark_tutorial_seen(&self) -> Result<(), ProgressServiceError> {
        self.progress.mark_visited().await?;
        tracing::debug!("tutorial dismissed");
        Ok(())
    }

    /// Forget completions, scores, achievements and the tutorial marker.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if any value cannot be removed.
    pub async fn reset(&self) -> Result<(), ProgressServiceError> {
        self.progress.reset().await?;
        tracing::info!("progress reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::model::{AchievementRecord, PuzzleId};
    use storage::repository::Storage;

    #[tokio::test]
    async fn tutorial_shows_until_dismissed() {
        let storage = Storage::in_memory();
        let service = ProgressService::new(Arc::clone(&storage.progress));
        assert!(service.should_show_tutorial().await.unwrap());
        service.mark_tutorial_seen().await.unwrap();
        assert!(!service.should_show_tutorial().await.unwrap());
    }

    #[tokio::test]
    async fn lists_every_achievement_with_unlock_state() {
        let storage = Storage::in_memory();
        let mut record = AchievementRecord::default();
        record.unlock(&ACHIEVEMENTS[3]);
        storage.progress.save_achievements(&record).await.unwrap();

        let service = ProgressService::new(Arc::clone(&storage.progress));
        let list = service.achievements().await.unwrap();
        assert_eq!(list.len(), ACHIEVEMENTS.len());
        let unlocked: Vec<_> = list
            .iter()
            .filter(|status| status.unlocked)
            .map(|status| status.def.id)
            .collect();
        assert_eq!(unlocked, [ACHIEVEMENTS[3].id]);
    }

    #[tokio::test]
    async fn total_score_and_reset() {
        let storage = Storage::in_memory();
        let mut record = CompletionRecord::default();
        record.record(PuzzleId::new("1"), 900);
        record.record(PuzzleId::new("2"), 350);
        storage.progress.save_completion(&record).await.unwrap();
        storage.progress.mark_visited().await.unwrap();

        let service = ProgressService::new(Arc::clone(&storage.progress));
        assert_eq!(service.total_score().await.unwrap(), 1250);

        service.reset().await.unwrap();
        assert_eq!(service.total_score().await.unwrap(), 0);
        assert!(service.should_show_tutorial().await.unwrap());
    }
}
