use std::sync::Arc;

use services::{LoadedCatalog, ProgressService, PuzzleController, PuzzleListService};

pub trait UiApp: Send + Sync {
    /// A fresh controller for one play view.
    fn start_controller(&self) -> PuzzleController;
    fn catalog(&self) -> Option<LoadedCatalog>;

    fn progress(&self) -> Arc<ProgressService>;
    fn puzzle_list(&self) -> Arc<PuzzleListService>;

    /// Puzzle requested on the command line, opened once at launch.
    fn launch_puzzle(&self) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    catalog: Option<LoadedCatalog>,
    launch_puzzle: Option<String>,

    progress: Arc<ProgressService>,
    puzzle_list: Arc<PuzzleListService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app: Arc::clone(app),
            catalog: app.catalog(),
            launch_puzzle: app.launch_puzzle(),
            progress: app.progress(),
            puzzle_list: app.puzzle_list(),
        }
    }

    #[must_use]
    pub fn start_controller(&self) -> PuzzleController {
        self.app.start_controller()
    }

    /// The catalog fetched at launch, if the fetch succeeded.
    #[must_use]
    pub fn catalog(&self) -> Option<LoadedCatalog> {
        self.catalog.clone()
    }

    #[must_use]
    pub fn launch_puzzle(&self) -> Option<String> {
        self.launch_puzzle.clone()
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn puzzle_list(&self) -> Arc<PuzzleListService> {
        Arc::clone(&self.puzzle_list)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
