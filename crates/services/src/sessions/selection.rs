use puzzle_core::model::{Catalog, CompletionRecord, PuzzleId};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Navigation input for the play view: an optional explicit puzzle id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    pub puzzle_id: Option<PuzzleId>,
}

impl NavState {
    #[must_use]
    pub fn new(puzzle_id: Option<PuzzleId>) -> Self {
        Self { puzzle_id }
    }

    /// Read an `id` query value. Blank values mean "no explicit puzzle".
    #[must_use]
    pub fn from_query(id: Option<&str>) -> Self {
        Self {
            puzzle_id: id.and_then(|raw| raw.parse().ok()),
        }
    }
}

/// Result of picking the puzzle to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Loaded(PuzzleId),
    AllCompleted,
}

/// Uniformly random uncompleted puzzle, if any remains.
pub(crate) fn pick_random_uncompleted<R>(
    catalog: &Catalog,
    record: &CompletionRecord,
    rng: &mut R,
) -> Option<PuzzleId>
where
    R: Rng + ?Sized,
{
    catalog
        .uncompleted(record)
        .choose(rng)
        .map(|puzzle| puzzle.id().clone())
}
