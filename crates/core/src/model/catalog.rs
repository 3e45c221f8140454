use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{CompletionRecord, Puzzle, PuzzleError, PuzzleId};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogParseError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidPuzzle(#[from] PuzzleError),
}

#[derive(Debug, Deserialize)]
struct RawPuzzle {
    #[serde(rename = "imgPath")]
    img_path: String,
    answer: String,
}

/// Every puzzle available to the game, kept in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    puzzles: Vec<Puzzle>,
}

impl Catalog {
    #[must_use]
    pub fn new(mut puzzles: Vec<Puzzle>) -> Self {
        puzzles.sort_by(|left, right| left.id().cmp(right.id()));
        puzzles.dedup_by(|left, right| left.id() == right.id());
        Self { puzzles }
    }

    /// Parse the catalog document: an object mapping id to `{ imgPath, answer }`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogParseError` for malformed JSON or an invalid entry.
    pub fn from_json(json: &str) -> Result<Self, CatalogParseError> {
        let raw: BTreeMap<String, RawPuzzle> = serde_json::from_str(json)?;
        let puzzles = raw
            .into_iter()
            .map(|(id, entry)| Puzzle::new(PuzzleId::new(id), entry.img_path, &entry.answer))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(puzzles))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &PuzzleId) -> Option<&Puzzle> {
        self.puzzles
            .binary_search_by(|puzzle| puzzle.id().cmp(id))
            .ok()
            .map(|idx| &self.puzzles[idx])
    }

    #[must_use]
    pub fn contains(&self, id: &PuzzleId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter()
    }

    /// Puzzles not present in `record`, in id order.
    #[must_use]
    pub fn uncompleted<'a>(&'a self, record: &CompletionRecord) -> Vec<&'a Puzzle> {
        self.puzzles
            .iter()
            .filter(|puzzle| !record.is_completed(puzzle.id()))
            .collect()
    }

    /// First uncompleted puzzle after `current` in id order, wrapping around.
    ///
    /// `current` itself is checked last, so a still-uncompleted current puzzle is
    /// only returned when it is the sole candidate.
    #[must_use]
    pub fn next_uncompleted_after(
        &self,
        current: &PuzzleId,
        record: &CompletionRecord,
    ) -> Option<&Puzzle> {
        let start = self.puzzles.partition_point(|puzzle| puzzle.id() <= current);
        let len = self.puzzles.len();
        (0..len)
            .map(|offset| &self.puzzles[(start + offset) % len])
            .find(|puzzle| !record.is_completed(puzzle.id()))
    }
}
