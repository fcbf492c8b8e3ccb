//! Editable results table.
//!
//! Rows are keyed by entry handle, so editing one suggestion never re-renders
//! its neighbours. Each cell reads its own row back out of the controller.

use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::app::AnalyzerContext;
use crate::browser;
use crate::components::confidence_badge::ConfidenceBadge;
use crate::error::SessionError;
use crate::session::driver;
use crate::session::entry::{Confidence, EntryId};
use crate::session::notice::NoticeLevel;
use crate::session::regenerate::NoopRegenerator;
use crate::session::table::TableRow;
use crate::session::SessionController;

#[component]
pub fn ResultsTable() -> impl IntoView {
    let controller = expect_context::<AnalyzerContext>().controller;

    view! {
        <table class="results-table">
            <thead>
                <tr>
                    <th class="select-cell">
                        <input
                            type="checkbox"
                            title="Select all"
                            prop:checked=move || controller.with(|c| c.table().select_all())
                            on:change=move |ev| {
                                let checked = browser::input_checked(&ev);
                                controller.update(|c| c.set_select_all(checked));
                            }
                        />
                    </th>
                    <th>"Original CTA"</th>
                    <th>"Suggested Improvement"</th>
                    <th>"Confidence"</th>
                    <th>"Source"</th>
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || controller.with(|c| c.table().rows().to_vec())
                    key=|row| row.id
                    children=move |row: TableRow| view! {
                        <ResultRow id=row.id confidence=row.confidence source=row.source />
                    }
                />
            </tbody>
        </table>
    }
}

#[component]
fn ResultRow(id: EntryId, confidence: Confidence, source: String) -> impl IntoView {
    let controller = expect_context::<AnalyzerContext>().controller;

    let field = move |read: fn(&TableRow) -> String| {
        controller.with(|c| c.table().row_by_id(id).map(read).unwrap_or_default())
    };
    let selected = move || {
        controller.with(|c| c.table().row_by_id(id).map(|r| r.selected).unwrap_or(false))
    };

    // Resolve the handle to its current position at the moment of the click.
    let run = move |action: fn(&mut SessionController, usize) -> Result<(), SessionError>| {
        controller.update(|c| {
            if let Err(e) = c.index_of(id).and_then(|index| action(c, index)) {
                warn!("Row action on {} failed: {}", id, e);
            }
        });
    };

    let on_select = move |ev: web_sys::Event| {
        let checked = browser::input_checked(&ev);
        controller.update(|c| {
            if let Err(e) = c.index_of(id).and_then(|index| c.set_selected(index, checked)) {
                warn!("Selection on {} failed: {}", id, e);
            }
        });
    };

    let on_edit = move |ev: web_sys::Event| {
        let text = event_target_value(&ev);
        controller.update(|c| {
            if let Err(e) = c.index_of(id).and_then(|index| c.edit_suggestion(index, text)) {
                warn!("Edit on {} failed: {}", id, e);
            }
        });
    };

    let on_copy = move |_| {
        let text = controller.with_untracked(|c| c.index_of(id).and_then(|i| c.copy_suggestion(i)));
        let Ok(text) = text else {
            return;
        };
        spawn_local(async move {
            let (level, message) = match browser::write_clipboard(&text).await {
                Ok(()) => (NoticeLevel::Success, "Copied to clipboard".to_string()),
                Err(e) => {
                    warn!("{}", e);
                    (NoticeLevel::Error, e)
                }
            };
            controller.update(|c| {
                c.notify(level, message);
            });
        });
    };

    let on_regenerate = move |_| {
        let Ok(index) = controller.with_untracked(|c| c.index_of(id)) else {
            return;
        };
        spawn_local(async move {
            driver::regenerate(&controller, &NoopRegenerator, index).await;
        });
    };

    view! {
        <tr class:row-selected=selected>
            <td class="select-cell">
                <input type="checkbox" prop:checked=selected on:change=on_select />
            </td>
            <td class="cta-cell">{move || field(|r| r.display_cta.clone())}</td>
            <td class="suggestion-cell">
                <textarea
                    class="input suggestion-input"
                    rows="2"
                    prop:value=move || field(|r| r.suggestion.clone())
                    on:input=on_edit
                ></textarea>
            </td>
            <td><ConfidenceBadge confidence /></td>
            <td class="source-cell">{source}</td>
            <td class="actions-cell">
                <button
                    class="btn btn-small btn-primary"
                    title="Use this suggestion"
                    on:click=move |_| run(SessionController::accept)
                >
                    "Accept"
                </button>
                <button
                    class="btn btn-small btn-secondary"
                    title="Restore the original text"
                    on:click=move |_| run(SessionController::revert)
                >
                    "Revert"
                </button>
                <button class="btn btn-small btn-secondary" on:click=on_copy>"Copy"</button>
                <button class="btn btn-small btn-secondary" on:click=on_regenerate>"Regenerate"</button>
            </td>
        </tr>
    }
}
