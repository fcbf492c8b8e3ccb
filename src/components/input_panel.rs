//! Input section: URL, pasted text, or an uploaded image.

use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::app::AnalyzerContext;
use crate::browser;
use crate::session::driver;
use crate::session::input::SubmissionKind;
use crate::session::notice::NoticeLevel;

const KINDS: [SubmissionKind; 3] = [SubmissionKind::Url, SubmissionKind::Text, SubmissionKind::Image];

#[component]
pub fn InputPanel() -> impl IntoView {
    let ctx = expect_context::<AnalyzerContext>();
    let controller = ctx.controller;

    let kind = move || controller.with(|c| c.form().kind);
    let loading = move || controller.with(|c| c.is_loading());

    let do_submit = move |_| {
        let kind = controller.with_untracked(|c| c.form().kind);
        let service = ctx.service();
        spawn_local(async move {
            driver::submit(&controller, &service, kind).await;
        });
    };

    view! {
        <div class="input-panel">
            <div class="input-tabs" role="tablist">
                {KINDS.into_iter().map(|k| view! {
                    <button
                        class="tab"
                        class:active=move || kind() == k
                        on:click=move |_| controller.update(|c| c.form_mut().kind = k)
                    >
                        {k.label()}
                    </button>
                }).collect::<Vec<_>>()}
            </div>

            {move || match kind() {
                SubmissionKind::Url => view! { <UrlFields /> }.into_any(),
                SubmissionKind::Text => view! { <TextFields /> }.into_any(),
                SubmissionKind::Image => view! { <ImageDropZone /> }.into_any(),
            }}

            <button class="btn btn-primary" on:click=do_submit disabled=loading>
                {move || if loading() { "Analyzing..." } else { "Analyze CTAs" }}
            </button>
        </div>
    }
}

#[component]
fn UrlFields() -> impl IntoView {
    let controller = expect_context::<AnalyzerContext>().controller;
    let (max_pages_limit, max_scan_depth) =
        controller.with_untracked(|c| (c.config().max_pages_limit, c.config().max_scan_depth));

    view! {
        <div class="form-group">
            <label for="url-input">"Website URL"</label>
            <input
                id="url-input"
                type="url"
                class="input"
                placeholder="https://example.com"
                prop:value=move || controller.with(|c| c.form().url.clone())
                on:input=move |ev| {
                    let url = event_target_value(&ev);
                    controller.update(|c| c.form_mut().url = url);
                }
            />
        </div>
        <div class="form-row">
            <div class="form-group">
                <label for="max-pages">"Max pages"</label>
                <input
                    id="max-pages"
                    type="number"
                    class="input"
                    min="1"
                    max=max_pages_limit.to_string()
                    prop:value=move || controller.with(|c| c.form().max_pages.to_string())
                    on:input=move |ev| {
                        if let Ok(pages) = event_target_value(&ev).parse::<u32>() {
                            controller.update(|c| c.form_mut().max_pages = pages);
                        }
                    }
                />
            </div>
            <div class="form-group">
                <label for="scan-depth">"Scan depth"</label>
                <select
                    id="scan-depth"
                    class="input"
                    prop:value=move || controller.with(|c| c.form().scan_depth.to_string())
                    on:change=move |ev| {
                        if let Ok(depth) = event_target_value(&ev).parse::<u32>() {
                            controller.update(|c| c.form_mut().scan_depth = depth);
                        }
                    }
                >
                    {(1..=max_scan_depth).map(|d| view! {
                        <option value=d.to_string()>{d.to_string()}</option>
                    }).collect::<Vec<_>>()}
                </select>
            </div>
        </div>
    }
}

#[component]
fn TextFields() -> impl IntoView {
    let controller = expect_context::<AnalyzerContext>().controller;
    let max_chars = controller.with_untracked(|c| c.config().max_text_chars);

    view! {
        <div class="form-group">
            <label for="text-input">"Page copy"</label>
            <textarea
                id="text-input"
                class="input"
                rows="10"
                placeholder="Paste the text that contains your calls to action"
                prop:value=move || controller.with(|c| c.form().text.clone())
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    controller.update(|c| c.form_mut().text = text);
                }
            ></textarea>
            <span class="char-count">
                {move || format!(
                    "{} / {}",
                    controller.with(|c| c.form().text.chars().count()),
                    max_chars,
                )}
            </span>
        </div>
    }
}

/// Drag-and-drop or browse for a single image.
#[component]
fn ImageDropZone() -> impl IntoView {
    let controller = expect_context::<AnalyzerContext>().controller;
    let (is_over, set_is_over) = signal(false);
    let (is_reading, set_is_reading) = signal(false);
    let file_input_id = "image-file-input";

    let load_file = move |file: web_sys::File| {
        set_is_reading.set(true);
        spawn_local(async move {
            match browser::read_file(file).await {
                Ok(upload) => controller.update(|c| c.form_mut().image = Some(upload)),
                Err(e) => {
                    warn!("{}", e);
                    controller.update(|c| {
                        c.notify(NoticeLevel::Error, e);
                    });
                }
            }
            set_is_reading.set(false);
        });
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_is_over.set(false);
        if let Some(file) = browser::dropped_file(&ev) {
            load_file(file);
        }
    };

    let on_input_change = move |ev: web_sys::Event| {
        if let Some(file) = browser::input_file(&ev) {
            load_file(file);
        }
    };

    let picked = move || {
        controller.with(|c| {
            c.form()
                .image
                .as_ref()
                .map(|img| format!("{} ({} KB)", img.file_name, img.bytes.len().div_ceil(1024)))
        })
    };

    view! {
        <div
            class="drop-zone"
            class:drop-zone-active=move || is_over.get()
            class:drop-zone-loading=move || is_reading.get()
            on:dragover=move |ev: web_sys::DragEvent| {
                ev.prevent_default();
                set_is_over.set(true);
            }
            on:dragleave=move |_| set_is_over.set(false)
            on:drop=on_drop
        >
            <Show
                when=move || is_reading.get()
                fallback=move || view! {
                    <div class="drop-zone-content">
                        <p class="drop-main">"Drop a screenshot of your page here"</p>
                        <p class="drop-hint">"or"</p>
                        <label for=file_input_id class="btn btn-secondary">
                            "Browse Files"
                        </label>
                        <input
                            type="file"
                            id=file_input_id
                            accept="image/*"
                            style="display: none"
                            on:change=on_input_change
                        />
                        {move || picked().map(|label| view! {
                            <p class="drop-selected">{label}</p>
                        })}
                        <p class="drop-formats">"Supports PNG, JPEG, GIF, WebP"</p>
                    </div>
                }
            >
                <div class="drop-zone-loading-content">
                    <div class="spinner"></div>
                    <p>"Reading image..."</p>
                </div>
            </Show>
        </div>
    }
}
