mod progress;
mod selection;
mod service;
mod ticker;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use selection::{NavState, SelectionOutcome};
pub use service::{HintOutcome, PuzzleSession};
pub use ticker::{ElapsedTicker, TickerGeneration, format_elapsed};
pub use workflow::{
    CompletionSummary, ControllerPhase, Feedback, FeedbackKind, InputOutcome, PuzzleController,
    PuzzleInput, SubmitOutcome, messages,
};
