//! Summary counters and export buttons.

use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::app::AnalyzerContext;
use crate::browser;
use crate::export::{ExportFile, ExportFormat};
use crate::session::driver;
use crate::session::notice::NoticeLevel;
use crate::session::SessionController;

fn offer(controller: RwSignal<SessionController>, file: ExportFile) {
    if let Err(e) = browser::download(&file) {
        warn!("Download failed: {}", e);
        controller.update(|c| {
            c.notify(NoticeLevel::Error, e);
        });
    }
}

#[component]
pub fn StatsBar() -> impl IntoView {
    let ctx = expect_context::<AnalyzerContext>();
    let controller = ctx.controller;

    let export_local = move |format: ExportFormat| {
        let file = controller
            .try_update(|c| c.export_local(format, browser::now()))
            .flatten();
        if let Some(file) = file {
            offer(controller, file);
        }
    };

    let export_remote = move |format: ExportFormat| {
        let service = ctx.service();
        spawn_local(async move {
            if let Some(file) =
                driver::export_remote(&controller, &service, format, browser::now()).await
            {
                offer(controller, file);
            }
        });
    };

    view! {
        <div class="stats-bar">
            <span class="stats-summary">{move || controller.with(|c| c.stats().summary())}</span>
            <div class="export-buttons">
                <button class="btn btn-primary" on:click=move |_| export_local(ExportFormat::Csv)>
                    "Download optimized CTAs"
                </button>
                <button class="btn btn-secondary" on:click=move |_| export_local(ExportFormat::Json)>
                    "Download JSON"
                </button>
                <button class="btn btn-secondary" on:click=move |_| export_remote(ExportFormat::Csv)>
                    "Server CSV"
                </button>
                <button class="btn btn-secondary" on:click=move |_| export_remote(ExportFormat::Json)>
                    "Server JSON"
                </button>
            </div>
        </div>
    }
}
