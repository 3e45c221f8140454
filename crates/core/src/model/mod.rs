mod achievement;
mod catalog;
mod completion;
mod grid;
mod ids;
mod puzzle;
mod scoring;

pub use achievement::{
    ACHIEVEMENTS, Achievement, AchievementDef, AchievementRecord, AchievementTier,
    CompletionContext, NEVER_GIVE_UP_ATTEMPTS, PUZZLE_MASTER_THRESHOLD, SPEED_DEMON_MAX_SECS,
    evaluate_achievements,
};
pub use catalog::{Catalog, CatalogParseError};
pub use completion::CompletionRecord;
pub use grid::{CellPos, LetterCell, LetterGrid, PLACEHOLDER};
pub use ids::{ParseIdError, PuzzleId};
pub use puzzle::{Answer, AnswerError, Puzzle, PuzzleError};
pub use scoring::{BASE_SCORE, HINT_PENALTY, MIN_SCORE, ScoreInputs, compute_score};
