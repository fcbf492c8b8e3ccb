use std::time::Duration;

use leptos::prelude::*;

use crate::app::AnalyzerContext;
use crate::session::notice::Notice;

/// Stack of transient notices. Each one dismisses itself after the configured timeout.
#[component]
pub fn ToastStack() -> impl IntoView {
    let controller = expect_context::<AnalyzerContext>().controller;
    let timeout = controller.with_untracked(|c| u64::from(c.config().notice_timeout_ms));
    let last_scheduled = StoredValue::new(0u64);

    Effect::new(move |_| {
        let fresh: Vec<u64> = controller.with(|c| {
            c.notices()
                .iter()
                .map(|n| n.id)
                .filter(|&id| id > last_scheduled.get_value())
                .collect()
        });
        for id in fresh {
            last_scheduled.set_value(id);
            set_timeout(
                move || {
                    let _ = controller.try_update(|c| c.dismiss_notice(id));
                },
                Duration::from_millis(timeout),
            );
        }
    });

    view! {
        <div class="toast-stack" aria-live="polite">
            <For
                each=move || controller.with(|c| c.notices().iter().cloned().collect::<Vec<_>>())
                key=|notice| notice.id
                children=move |notice: Notice| {
                    let id = notice.id;
                    view! {
                        <div class=notice.level.css_class() role="status">
                            <span class="notice-message">{notice.message}</span>
                            <button
                                class="notice-close"
                                title="Dismiss"
                                on:click=move |_| controller.update(|c| c.dismiss_notice(id))
                            >
                                "\u{d7}"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
