use leptos::prelude::*;

use crate::session::entry::Confidence;

#[component]
pub fn ConfidenceBadge(
    /// Tier reported by the analysis
    confidence: Confidence,
) -> impl IntoView {
    let class = match confidence {
        Confidence::High => "confidence-badge confidence-high",
        Confidence::Medium => "confidence-badge confidence-medium",
        Confidence::Low => "confidence-badge confidence-low",
        Confidence::Unknown => "confidence-badge confidence-unknown",
    };

    view! { <span class=class>{confidence.as_str()}</span> }
}
