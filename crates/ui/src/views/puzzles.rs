use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AchievementVm, PuzzleCardVm, map_achievements, map_puzzle_cards};

#[derive(Clone, Debug, PartialEq)]
struct PuzzlesData {
    cards: Vec<PuzzleCardVm>,
    achievements: Vec<AchievementVm>,
    total_score: u64,
    completed: usize,
}

#[component]
pub fn PuzzlesView() -> Element {
    let ctx = use_context::<AppContext>();
    let puzzle_list = ctx.puzzle_list();
    let progress = ctx.progress();
    let catalog = ctx.catalog();

    let resource = use_resource(move || {
        let puzzle_list = puzzle_list.clone();
        let progress = progress.clone();
        let catalog = catalog.clone();
        async move {
            let catalog = catalog.ok_or(ViewError::CatalogUnavailable)?;
            let items = puzzle_list
                .list(&catalog)
                .await
                .map_err(|_| ViewError::Unknown)?;
            let statuses = progress
                .achievements()
                .await
                .map_err(|_| ViewError::Unknown)?;
            let total_score = progress
                .total_score()
                .await
                .map_err(|_| ViewError::Unknown)?;
            let cards = map_puzzle_cards(&items);
            Ok(PuzzlesData {
                completed: cards.iter().filter(|card| card.completed).count(),
                cards,
                achievements: map_achievements(&statuses),
                total_score,
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page puzzles-page",
            h2 { "All Puzzles" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    p { class: "puzzles-summary",
                        "Solved {data.completed} of {data.cards.len()} | Total score: {data.total_score}"
                    }
                    if data.cards.is_empty() {
                        p { "No puzzles yet." }
                    } else {
                        ul { class: "puzzle-cards",
                            for card in data.cards {
                                PuzzleCard { key: "{card.id}", card }
                            }
                        }
                    }
                    h3 { "Achievements" }
                    ul { class: "achievements",
                        for achievement in data.achievements {
                            AchievementItem { key: "{achievement.id}", achievement }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn PuzzleCard(card: PuzzleCardVm) -> Element {
    let class = if card.completed {
        "puzzle-card puzzle-card--completed"
    } else {
        "puzzle-card"
    };
    rsx! {
        li { class: "{class}",
            Link { class: "puzzle-card__link", to: Route::play(card.id.clone()),
                img { class: "puzzle-card__image", src: "{card.image_src}", alt: "{card.title}" }
                span { class: "puzzle-card__title", "{card.title}" }
            }
            if card.completed {
                span { class: "badge badge-success", "Completed" }
                span { class: "puzzle-card__score", "{card.score_label}" }
            } else {
                span { class: "badge badge-muted", "Not solved yet" }
            }
        }
    }
}

#[component]
fn AchievementItem(achievement: AchievementVm) -> Element {
    let class = if achievement.unlocked {
        "achievement"
    } else {
        "achievement achievement--locked"
    };
    rsx! {
        li { class: "{class}",
            span { class: "achievement-badge {achievement.tier_class}", "{achievement.tier_label}" }
            strong { "{achievement.name}" }
            span { class: "achievement__description", "{achievement.description}" }
        }
    }
}
