use leptos::prelude::*;
use tracing::error;

use crate::api::HttpAnalysisService;
use crate::components::toast::ToastStack;
use crate::config::ClientConfig;
use crate::pages::analyzer::AnalyzerPage;
use crate::session::{ControllerCell, SessionController};

/// Shared handles for every component under [`App`].
#[derive(Clone, Copy)]
pub struct AnalyzerContext {
    pub controller: RwSignal<SessionController>,
    pub service: StoredValue<HttpAnalysisService, LocalStorage>,
}

impl AnalyzerContext {
    /// Owned service handle for moving into a spawned task.
    pub fn service(&self) -> HttpAnalysisService {
        self.service.get_value()
    }
}

impl ControllerCell for RwSignal<SessionController> {
    fn update_with<R>(&self, f: impl FnOnce(&mut SessionController) -> R) -> Option<R> {
        self.try_update(f)
    }
}

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    let service = match HttpAnalysisService::new(&config.api_base_url) {
        Ok(service) => service,
        Err(e) => {
            error!("Cannot start client: {}", e);
            return view! {
                <div class="app-error">
                    <h2>"CTA Optimizer is misconfigured"</h2>
                    <p>{e.to_string()}</p>
                </div>
            }
            .into_any();
        }
    };

    provide_context(AnalyzerContext {
        controller: RwSignal::new(SessionController::new(config)),
        service: StoredValue::new_local(service),
    });

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"CTA Optimizer"</h1>
                <p class="app-tagline">"Find your calls to action and make them convert."</p>
            </header>
            <main class="content">
                <AnalyzerPage />
            </main>
            <ToastStack />
        </div>
    }
    .into_any()
}
