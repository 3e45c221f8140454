use std::collections::VecDeque;
use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::Link;
use services::{NavState, PuzzleInput, TickerGeneration};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{TutorialBanner, ViewError, ViewState, view_state_from_resource};
use crate::vm::{CellVm, PlayAction, PlaySnapshot, PlayVm, input_for_key, start_play};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Route entry. Keyed by `id` so switching puzzles through the router starts
/// a fresh play page.
#[component]
pub fn PlayView(id: String) -> Element {
    rsx! {
        PlayPage { key: "{id}", id: id.clone() }
    }
}

#[component]
fn PlayPage(id: String) -> Element {
    let ctx = use_context::<AppContext>();

    let vm = use_signal(|| None::<PlayVm>);
    let error = use_signal(|| None::<ViewError>);
    let ticker = use_signal(|| None::<TickerGeneration>);
    let time_label = use_signal(|| None::<String>);
    let queue = use_signal(VecDeque::<PlayAction>::new);
    let busy = use_signal(|| false);
    let frozen = use_signal(|| None::<PlaySnapshot>);

    let resource = use_resource(move || {
        let ctx = ctx.clone();
        let id = id.clone();
        let mut vm = vm;
        let mut ticker = ticker;
        async move {
            let nav = NavState::from_query(Some(id.as_str()));
            let started = start_play(ctx.start_controller(), nav).await?;
            ticker.set(started.live_ticker());
            vm.set(Some(started));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    // One-second display tick; a task exits once its generation goes stale.
    use_effect(move || {
        let Some(generation) = ticker() else {
            return;
        };
        let mut time_label = time_label;
        spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let label = match vm.peek().as_ref() {
                    Some(vm) => vm.tick(generation),
                    // Taken out for an async call; try again next tick.
                    None => continue,
                };
                match label {
                    Some(label) => time_label.set(Some(label)),
                    None => break,
                }
            }
        });
    });

    use_effect(move || {
        let _ = eval("document.getElementById(\"play-root\")?.focus();");
    });

    // Actions run one at a time, in order. While an action awaits storage the
    // vm is out of its signal, so the page keeps showing the last snapshot and
    // new actions wait in the queue.
    let run = use_callback(move |action: PlayAction| {
        let mut queue = queue;
        let mut busy = busy;
        queue.write().push_back(action);
        if *busy.peek() {
            return;
        }
        busy.set(true);

        spawn(async move {
            let mut vm = vm;
            let mut error = error;
            let mut ticker = ticker;
            let mut time_label = time_label;
            let mut frozen = frozen;

            let Some(mut local_vm) = vm.write().take() else {
                queue.write().clear();
                busy.set(false);
                return;
            };

            loop {
                let Some(action) = queue.write().pop_front() else {
                    break;
                };
                frozen.set(Some(local_vm.snapshot()));
                match local_vm.perform(action).await {
                    Ok(()) => error.set(None),
                    Err(err) => error.set(Some(err)),
                }
            }

            let generation = local_vm.live_ticker();
            if generation != *ticker.peek() {
                time_label.set(None);
                ticker.set(generation);
            }
            vm.set(Some(local_vm));
            busy.set(false);
        });
    });

    let dispatch = use_callback(move |input: PuzzleInput| run.call(PlayAction::Input(input)));

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<PlayTestHandles>() {
                handles.register(dispatch, vm);
            }
        }
    }

    let on_next = use_callback(move |()| run.call(PlayAction::Next));
    let on_select = use_callback(move |(word, letter): (usize, usize)| {
        run.call(PlayAction::Select { word, letter });
    });

    let on_key = move |evt: KeyboardEvent| {
        let modifiers = evt.data.modifiers();
        if modifiers.intersects(Modifiers::CONTROL | Modifiers::META | Modifiers::ALT) {
            return;
        }
        if let Some(input) = input_for_key(&evt.data.key()) {
            evt.prevent_default();
            dispatch.call(input);
        }
    };

    let snapshot = vm
        .read()
        .as_ref()
        .map(PlayVm::snapshot)
        .or_else(|| frozen.read().clone());
    let time_text = snapshot.as_ref().map_or_else(String::new, |snap| {
        match time_label() {
            Some(live) if snap.accepts_input => live,
            _ => snap.time_label.clone(),
        }
    });

    rsx! {
        div { class: "page play-page", id: "play-root", tabindex: "0", onkeydown: on_key,
            TutorialBanner {}

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    Link { class: "btn btn-secondary", to: Route::Puzzles {}, "Browse puzzles" }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(snap) = snapshot {
                        h2 { class: "puzzle-title", "{snap.title}" }
                        if let Some(src) = snap.image_src.clone() {
                            img { class: "puzzle-image", src: "{src}", alt: "{snap.title}" }
                        }
                        if snap.accepts_input || snap.celebration.is_some() {
                            div { class: "puzzle-stats",
                                span { class: "puzzle-stats__item", "{snap.attempts_label}" }
                                span { class: "puzzle-stats__item", "{time_text}" }
                                span { class: "puzzle-stats__item", "{snap.points_label}" }
                            }
                        }
                        div { class: "letter-grid",
                            for (index, word) in snap.words.iter().enumerate() {
                                div { key: "{index}", class: "letter-grid__word",
                                    for cell in word.cells.iter().copied() {
                                        LetterCellButton {
                                            key: "{cell.word}-{cell.letter}",
                                            cell,
                                            disabled: !snap.accepts_input,
                                            on_select,
                                        }
                                    }
                                }
                            }
                        }
                        if let Some(feedback) = snap.feedback.clone() {
                            div { class: "{feedback.class}", role: "status", "{feedback.message}" }
                        }
                        if let Some(err) = error() {
                            p { class: "error", "{err.message()}" }
                        }
                        if let Some(celebration) = snap.celebration.clone() {
                            div { class: "celebration",
                                p { class: "celebration__score", "🎉 {celebration.score} points" }
                                for (name, tier_class) in celebration.unlocked {
                                    span { class: "achievement-badge {tier_class}", "Unlocked: {name}" }
                                }
                            }
                        }
                        div { class: "play-actions",
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                disabled: !snap.accepts_input,
                                onclick: move |_| dispatch.call(PuzzleInput::Hint),
                                "Hint"
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                disabled: !snap.accepts_input,
                                onclick: move |_| dispatch.call(PuzzleInput::Submit),
                                "Submit"
                            }
                            if snap.has_next {
                                button {
                                    class: "btn btn-success",
                                    r#type: "button",
                                    onclick: move |_| on_next.call(()),
                                    "Next Puzzle"
                                }
                            }
                            Link { class: "btn btn-link", to: Route::Puzzles {}, "All Puzzles" }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn LetterCellButton(cell: CellVm, disabled: bool, on_select: Callback<(usize, usize)>) -> Element {
    let class = cell.class();
    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            tabindex: "-1",
            disabled: disabled || cell.revealed,
            onclick: move |_| on_select.call((cell.word, cell.letter)),
            "{cell.display}"
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct PlayTestHandles {
    dispatch: Rc<RefCell<Option<Callback<PuzzleInput>>>>,
    vm: Rc<RefCell<Option<Signal<Option<PlayVm>>>>>,
}

#[cfg(test)]
impl PlayTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<PuzzleInput>, vm: Signal<Option<PlayVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<PuzzleInput> {
        (*self.dispatch.borrow()).expect("play dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<PlayVm>> {
        (*self.vm.borrow()).expect("play vm registered")
    }
}
