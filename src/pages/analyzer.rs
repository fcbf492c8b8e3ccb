use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AnalyzerContext;
use crate::components::bulk_actions::BulkActions;
use crate::components::history_panel::HistoryPanel;
use crate::components::input_panel::InputPanel;
use crate::components::results_table::ResultsTable;
use crate::components::stats_bar::StatsBar;
use crate::session::driver;
use crate::session::ActiveView;

#[component]
pub fn AnalyzerPage() -> impl IntoView {
    let ctx = expect_context::<AnalyzerContext>();
    let controller = ctx.controller;

    // Load history on mount
    Effect::new(move |_| {
        let service = ctx.service();
        spawn_local(async move {
            driver::refresh_history(&controller, &service).await;
        });
    });

    let view_is = move |v: ActiveView| controller.with(|c| c.view() == v);
    let results_enabled = move || controller.with(|c| c.results_enabled());
    let show = move |v: ActiveView| {
        controller.update(|c| {
            c.show_view(v);
        });
    };

    view! {
        <div class="page analyzer-page">
            <nav class="view-tabs">
                <button
                    class="tab"
                    class:active=move || view_is(ActiveView::Input)
                    on:click=move |_| show(ActiveView::Input)
                >
                    "Analyze"
                </button>
                <button
                    class="tab"
                    class:active=move || view_is(ActiveView::Results)
                    disabled=move || !results_enabled()
                    on:click=move |_| show(ActiveView::Results)
                >
                    "Results"
                </button>
            </nav>

            <div class="analyzer-layout">
                <section class="analyzer-main">
                    <Show
                        when=move || view_is(ActiveView::Input)
                        fallback=|| view! { <ResultsSection /> }
                    >
                        <InputPanel />
                    </Show>
                </section>
                <aside class="analyzer-sidebar">
                    <HistoryPanel />
                </aside>
            </div>

            <Show when=move || controller.with(|c| c.is_loading())>
                <div class="loading-overlay">
                    <div class="spinner"></div>
                    <p>"Analyzing your content..."</p>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ResultsSection() -> impl IntoView {
    let controller = expect_context::<AnalyzerContext>().controller;

    view! {
        <div class="results-section">
            <StatsBar />
            <div class="results-toolbar">
                <BulkActions />
                <button class="btn btn-secondary" on:click=move |_| controller.update(|c| c.start_new())>
                    "New Analysis"
                </button>
            </div>
            <ResultsTable />
        </div>
    }
}
