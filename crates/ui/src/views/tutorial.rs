use dioxus::prelude::*;

use crate::context::AppContext;

/// One-time "How to play" banner, hidden for good once dismissed.
#[component]
pub fn TutorialBanner() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();
    let mut dismissed = use_signal(|| false);

    let resource = {
        let progress = progress.clone();
        use_resource(move || {
            let progress = progress.clone();
            async move { progress.should_show_tutorial().await.unwrap_or(false) }
        })
    };
    let show = resource.value().read().unwrap_or(false) && !dismissed();

    let on_dismiss = move |_| {
        dismissed.set(true);
        let progress = progress.clone();
        spawn(async move {
            if let Err(err) = progress.mark_tutorial_seen().await {
                tracing::warn!(error = %err, "cannot store tutorial marker");
            }
        });
    };

    rsx! {
        if show {
            div { class: "tutorial", role: "dialog",
                h3 { "How to play" }
                ul {
                    li { "Look at the picture and guess what it shows." }
                    li { "Type letters to fill the grid. Backspace deletes, Space or Tab jumps to the next word." }
                    li { "Press Enter to check your answer." }
                    li { "Stuck? A hint reveals the first letter of a word, then single letters. Each hint costs 50 points." }
                    li { "Solve quickly and with few attempts for a higher score." }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: on_dismiss,
                    "Got it"
                }
            }
        }
    }
}
