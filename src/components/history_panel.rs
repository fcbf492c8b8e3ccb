//! History panel showing the most recent analyses.
//!
//! Clicking an entry reloads its results into the session exactly as if the
//! analysis had just come back from the service.

use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::app::AnalyzerContext;
use crate::session::driver;
use crate::session::history::HistoryEntry;

#[component]
pub fn HistoryPanel() -> impl IntoView {
    let ctx = expect_context::<AnalyzerContext>();
    let controller = ctx.controller;
    let preview_chars = controller.with_untracked(|c| c.config().history_preview_chars);

    let recent = move || {
        controller.with(|c| {
            c.history()
                .recent()
                .into_iter()
                .cloned()
                .collect::<Vec<HistoryEntry>>()
        })
    };

    let load = move |id: String| {
        controller.update(|c| {
            if let Err(e) = c.load_from_history(&id) {
                warn!("{}", e);
            }
        });
    };

    let refresh = move |_| {
        let service = ctx.service();
        spawn_local(async move {
            driver::refresh_history(&controller, &service).await;
        });
    };

    view! {
        <div class="history-panel">
            <div class="history-header">
                <h4 class="history-title">"Recent Analyses"</h4>
                <button class="btn btn-small btn-secondary" on:click=refresh>"Refresh"</button>
            </div>

            {move || {
                let entries = recent();
                if entries.is_empty() {
                    view! { <p class="history-empty">"No analyses yet."</p> }.into_any()
                } else {
                    view! {
                        <div class="history-list">
                            {entries.into_iter().map(|entry| {
                                let id = entry.id.clone();
                                let preview = entry.input_preview(preview_chars);
                                let when = entry.display_time();
                                let count = format!("{} CTAs", entry.results.len());
                                view! {
                                    <button class="history-item" on:click=move |_| load(id.clone())>
                                        <div class="history-item-info">
                                            <span class="history-type">{entry.kind.label()}</span>
                                            <span class="history-date">{when}</span>
                                        </div>
                                        <span class="history-input" title=entry.input.clone()>{preview}</span>
                                        <span class="history-count">{count}</span>
                                    </button>
                                }
                            }).collect::<Vec<_>>()}
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}
