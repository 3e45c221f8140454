use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::AppContext;
use crate::views::{PlayView, PuzzlesView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/?:id", PlayView)] Play { id: String },
        #[route("/puzzles", PuzzlesView)] Puzzles {},
}

impl Route {
    /// Play view for a specific puzzle.
    #[must_use]
    pub fn play(id: impl Into<String>) -> Self {
        Self::Play { id: id.into() }
    }

    /// Play view that picks a random unsolved puzzle.
    #[must_use]
    pub fn play_random() -> Self {
        Self::Play { id: String::new() }
    }
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let nav = use_navigator();
    use_hook(move || {
        if let Some(id) = ctx.launch_puzzle() {
            nav.replace(Route::play(id));
        }
    });

    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Picture Puzzle" }
            ul {
                li { Link { to: Route::play_random(), "Play" } }
                li { Link { to: Route::Puzzles {}, "All Puzzles" } }
            }
        }
    }
}
