use std::path::PathBuf;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use puzzle_core::model::Catalog;
use puzzle_core::time::fixed_now;
use services::{
    AppServices, CatalogSource, Clock, LoadedCatalog, ProgressService, PuzzleController,
    PuzzleListService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::play::PlayTestHandles;
use crate::views::{PlayView, PuzzlesView};

pub const CATALOG_JSON: &str = r#"{
    "1": { "imgPath": "img/paris.jpg", "answer": "PARIS" },
    "2": { "imgPath": "img/new-york.jpg", "answer": "NEW YORK" },
    "10": { "imgPath": "img/rome.jpg", "answer": "ROME" }
}"#;

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn start_controller(&self) -> PuzzleController {
        self.services.start_controller()
    }

    fn catalog(&self) -> Option<LoadedCatalog> {
        self.services.catalog().cloned()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn puzzle_list(&self) -> Arc<PuzzleListService> {
        self.services.puzzle_list()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Play(String),
    Puzzles,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    play_handles: PlayTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    use_context_provider(|| props.play_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Play(id) => rsx! { PlayView { id } },
        ViewKind::Puzzles => rsx! { PuzzlesView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub play_handles: PlayTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and let resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn test_catalog() -> LoadedCatalog {
    LoadedCatalog::new(
        Catalog::from_json(CATALOG_JSON).expect("valid catalog"),
        CatalogSource::File(PathBuf::from("puzzles.json")),
    )
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with(view, Storage::in_memory(), Some(test_catalog()))
}

pub fn setup_view_harness_with(
    view: ViewKind,
    storage: Storage,
    catalog: Option<LoadedCatalog>,
) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let services = AppServices::from_parts(storage.clone(), catalog, clock);
    let app = Arc::new(TestApp { services });
    let play_handles = PlayTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            play_handles: play_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        play_handles,
    }
}
