//! Thin wrappers over the browser APIs the UI needs.

use js_sys::{Array, ArrayBuffer, Uint8Array};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::config::{ClientConfig, STORAGE_KEY};
use crate::export::ExportFile;
use crate::session::input::ImageUpload;

fn js_error(context: &str, err: JsValue) -> String {
    format!("{}: {}", context, err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "No window available".to_string())
}

/// Defaults, pointed at the page's own origin, then any stored override.
pub fn load_config() -> ClientConfig {
    let mut base = ClientConfig::default();
    let Ok(window) = window() else {
        return base;
    };
    if let Ok(origin) = window.location().origin() {
        if origin.starts_with("http://") || origin.starts_with("https://") {
            base.api_base_url = origin;
        }
    }
    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten());
    ClientConfig::from_json_or(stored.as_deref(), base)
}

/// Offer `file` to the user as a download.
pub fn download(file: &ExportFile) -> Result<(), String> {
    let window = window()?;
    let document = window.document().ok_or("No document available")?;

    let parts = Array::of1(&JsValue::from_str(&file.contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(file.mime_type);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| js_error("Failed to create blob", e))?;
    let href = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| js_error("Failed to create object URL", e))?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| js_error("Failed to create link", e))?
        .dyn_into()
        .map_err(|_| "Created element is not an anchor")?;
    anchor.set_href(&href);
    anchor.set_download(&file.file_name);
    anchor.click();

    if let Err(e) = web_sys::Url::revoke_object_url(&href) {
        warn!("{}", js_error("Failed to revoke object URL", e));
    }
    debug!("Downloaded {} ({} bytes)", file.file_name, file.contents.len());
    Ok(())
}

pub async fn write_clipboard(text: &str) -> Result<(), String> {
    let clipboard = window()?.navigator().clipboard();
    JsFuture::from(clipboard.write_text(text))
        .await
        .map(|_| ())
        .map_err(|e| js_error("Clipboard write failed", e))
}

/// Read a picked or dropped file into memory.
pub async fn read_file(file: web_sys::File) -> Result<ImageUpload, String> {
    let buffer: ArrayBuffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| js_error("Failed to read file", e))?
        .dyn_into()
        .map_err(|_| "Failed to convert to ArrayBuffer")?;

    Ok(ImageUpload {
        file_name: file.name(),
        mime_type: file.type_(),
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}

/// Checked state of the checkbox that fired `ev`.
pub fn input_checked(ev: &web_sys::Event) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|el| el.checked())
        .unwrap_or(false)
}

/// First file carried by a file input change event.
pub fn input_file(ev: &web_sys::Event) -> Option<web_sys::File> {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .and_then(|el| el.files())
        .and_then(|files| files.get(0))
}

/// First file carried by a drop event.
pub fn dropped_file(ev: &web_sys::DragEvent) -> Option<web_sys::File> {
    ev.data_transfer()
        .and_then(|dt| dt.files())
        .and_then(|files| files.get(0))
}

pub fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
