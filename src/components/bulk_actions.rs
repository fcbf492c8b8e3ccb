use leptos::prelude::*;
use tracing::warn;

use crate::app::AnalyzerContext;
use crate::session::bulk::BulkAction;

/// Selector plus apply button for acting on every checked row.
#[component]
pub fn BulkActions() -> impl IntoView {
    let controller = expect_context::<AnalyzerContext>().controller;

    let selected_count = move || controller.with(|c| c.table().selected_indices().len());

    let on_apply = move |_| {
        controller.update(|c| {
            if let Err(e) = c.apply_selected_bulk() {
                warn!("Bulk action failed: {}", e);
            }
        });
    };

    view! {
        <div class="bulk-actions">
            <select
                class="input"
                prop:value=move || {
                    controller.with(|c| c.bulk_choice().map(BulkAction::value).unwrap_or(""))
                }
                on:change=move |ev| {
                    let choice = BulkAction::from_value(&event_target_value(&ev));
                    controller.update(|c| c.set_bulk_choice(choice));
                }
            >
                <option value="">"Bulk actions..."</option>
                {BulkAction::ALL.into_iter().map(|action| view! {
                    <option value=action.value()>{action.label()}</option>
                }).collect::<Vec<_>>()}
            </select>
            <button class="btn btn-secondary" on:click=on_apply>"Apply"</button>
            <span class="selection-count">{move || format!("{} selected", selected_count())}</span>
        </div>
    }
}
