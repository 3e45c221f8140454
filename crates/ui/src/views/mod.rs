mod play;
mod puzzles;
mod state;
mod tutorial;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use play::PlayView;
pub use puzzles::PuzzlesView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use tutorial::TutorialBanner;
