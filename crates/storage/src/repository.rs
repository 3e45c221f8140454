use async_trait::async_trait;
use puzzle_core::model::{AchievementRecord, CompletionRecord, PuzzleId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Keys shared by every puzzle and session.
pub mod keys {
    pub const COMPLETED_PUZZLES: &str = "completedPuzzles";
    pub const PUZZLE_SCORES: &str = "puzzleScores";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const HAS_VISITED: &str = "hasVisitedBefore";

    /// Every key the game writes.
    pub const ALL: [&str; 4] = [COMPLETED_PUZZLES, PUZZLE_SCORES, ACHIEVEMENTS, HAS_VISITED];
}

/// String key/value substrate. Values are JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed access to the player's persisted progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load completed puzzles and scores. Malformed values read as empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_completion(&self) -> Result<CompletionRecord, StorageError>;

    /// Persist completed puzzles and scores.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_completion(&self, record: &CompletionRecord) -> Result<(), StorageError>;

    /// Load unlocked achievements. Malformed values read as empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_achievements(&self) -> Result<AchievementRecord, StorageError>;

    /// Persist unlocked achievements.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_achievements(&self, record: &AchievementRecord) -> Result<(), StorageError>;

    /// Whether the first-visit marker is set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn has_visited(&self) -> Result<bool, StorageError>;

    /// Set the first-visit marker.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the marker cannot be stored.
    async fn mark_visited(&self) -> Result<(), StorageError>;

    /// Forget all progress, achievements and the first-visit marker.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any key cannot be removed.
    async fn reset(&self) -> Result<(), StorageError>;
}

/// `ProgressRepository` that stores each concern as a JSON value in a `KeyValueStore`.
#[derive(Clone)]
pub struct JsonProgressRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl JsonProgressRepository {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn read_json<T>(&self, key: &str) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring malformed stored value");
                Ok(T::default())
            }
        }
    }

    async fn write_json<T>(&self, key: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let raw =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(key, &raw).await
    }
}

#[async_trait]
impl ProgressRepository for JsonProgressRepository {
    async fn load_completion(&self) -> Result<CompletionRecord, StorageError> {
        let completed: Vec<PuzzleId> = self.read_json(keys::COMPLETED_PUZZLES).await?;
        let scores: BTreeMap<PuzzleId, u32> = self.read_json(keys::PUZZLE_SCORES).await?;
        Ok(CompletionRecord::from_parts(completed, scores))
    }

    async fn save_completion(&self, record: &CompletionRecord) -> Result<(), StorageError> {
        self.write_json(keys::COMPLETED_PUZZLES, record.completed())
            .await?;
        self.write_json(keys::PUZZLE_SCORES, record.scores()).await
    }

    async fn load_achievements(&self) -> Result<AchievementRecord, StorageError> {
        self.read_json(keys::ACHIEVEMENTS).await
    }

    async fn save_achievements(&self, record: &AchievementRecord) -> Result<(), StorageError> {
        self.write_json(keys::ACHIEVEMENTS, record).await
    }

    async fn has_visited(&self) -> Result<bool, StorageError> {
        let value = self.kv.get(keys::HAS_VISITED).await?;
        Ok(value.is_some_and(|raw| !matches!(raw.trim(), "" | "false" | "0" | "null")))
    }

    async fn mark_visited(&self) -> Result<(), StorageError> {
        self.kv.set(keys::HAS_VISITED, "true").await
    }

    async fn reset(&self) -> Result<(), StorageError> {
        for key in keys::ALL {
            self.kv.remove(key).await?;
        }
        Ok(())
    }
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the raw store and the typed progress view behind trait objects.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn from_kv(kv: Arc<dyn KeyValueStore>) -> Self {
        let progress: Arc<dyn ProgressRepository> =
            Arc::new(JsonProgressRepository::new(Arc::clone(&kv)));
        Self { kv, progress }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_kv(Arc::new(InMemoryRepository::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::model::ACHIEVEMENTS;

    #[tokio::test]
    async fn empty_store_reads_as_empty_progress() {
        let storage = Storage::in_memory();
        let record = storage.progress.load_completion().await.unwrap();
        assert_eq!(record.completed_count(), 0);
        assert!(storage.progress.load_achievements().await.unwrap().is_empty());
        assert!(!storage.progress.has_visited().await.unwrap());
    }

    #[tokio::test]
    async fn completion_round_trips_through_json_keys() {
        let storage = Storage::in_memory();
        let mut record = CompletionRecord::default();
        record.record(PuzzleId::new("3"), 850);
        record.record(PuzzleId::new("1"), 400);
        storage.progress.save_completion(&record).await.unwrap();

        let completed = storage.kv.get(keys::COMPLETED_PUZZLES).await.unwrap();
        assert_eq!(completed.as_deref(), Some(r#"["3","1"]"#));
        let scores = storage.kv.get(keys::PUZZLE_SCORES).await.unwrap();
        assert_eq!(scores.as_deref(), Some(r#"{"1":400,"3":850}"#));

        let loaded = storage.progress.load_completion().await.unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn malformed_values_default_to_empty() {
        let storage = Storage::in_memory();
        storage
            .kv
            .set(keys::COMPLETED_PUZZLES, "not json")
            .await
            .unwrap();
        storage.kv.set(keys::PUZZLE_SCORES, "[1, 2]").await.unwrap();
        storage.kv.set(keys::ACHIEVEMENTS, "{").await.unwrap();

        let record = storage.progress.load_completion().await.unwrap();
        assert_eq!(record, CompletionRecord::default());
        assert!(storage.progress.load_achievements().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn achievements_persist() {
        let storage = Storage::in_memory();
        let mut record = AchievementRecord::default();
        record.unlock(&ACHIEVEMENTS[1]);
        storage.progress.save_achievements(&record).await.unwrap();
        let loaded = storage.progress.load_achievements().await.unwrap();
        assert!(loaded.is_unlocked("pure_genius"));
    }

    #[tokio::test]
    async fn visited_marker_and_reset() {
        let storage = Storage::in_memory();
        storage.progress.mark_visited().await.unwrap();
        assert!(storage.progress.has_visited().await.unwrap());

        let mut record = CompletionRecord::default();
        record.record(PuzzleId::new("1"), 100);
        storage.progress.save_completion(&record).await.unwrap();

        storage.progress.reset().await.unwrap();
        assert!(!storage.progress.has_visited().await.unwrap());
        assert_eq!(
            storage.progress.load_completion().await.unwrap().completed_count(),
            0
        );
    }
}
