#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod progress_service;
pub mod puzzle_list;
pub mod sessions;

pub use puzzle_core::Clock;
pub use sessions as session;

pub use app_services::{AppServices, load_catalog};
pub use catalog_service::{CatalogService, CatalogSource, LoadedCatalog};
pub use error::{AppServicesError, CatalogError, ProgressServiceError, SessionError};
pub use progress_service::{AchievementStatus, ProgressService};
pub use puzzle_list::{PuzzleListItem, PuzzleListService, project_puzzle_list};
pub use sessions::{
    CompletionSummary, ControllerPhase, Feedback, FeedbackKind, HintOutcome, InputOutcome,
    NavState, PuzzleController, PuzzleInput, PuzzleSession, SelectionOutcome, SubmitOutcome,
    TickerGeneration,
};
