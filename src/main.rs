use cta_optimizer::app::App;
use cta_optimizer::{browser, telemetry};
use leptos::prelude::*;

fn main() {
    let config = browser::load_config();
    telemetry::init(&config.log_filter);
    tracing::info!("Starting CTA optimizer against {}", config.api_base_url);

    leptos::mount::mount_to_body(move || view! { <App config /> });
}
