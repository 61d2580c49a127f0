//! Browser helpers shared by the components and pages.
//!
//! - **Toasts**: non-blocking feedback at the bottom of the screen.
//! - **Object URLs**: turning PDF bytes into a `blob:` URL for the built-in
//!   viewer or a download link. Every URL created here must be released with
//!   [`revoke_object_url`] once it is no longer displayed.
//! - **Dirty tracking**: MD5 of the serialized mappings, mirrored to
//!   `window.app_dirty` so `index.html` can warn before leaving the page.

use js_sys::{Array, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlElement, Url};

pub const PDF_MIME: &str = "application/pdf";

/// Displays a temporary notification message at the bottom of the screen.
/// The toast removes itself after three seconds.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Formats a JS exception for display.
pub fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Wraps `bytes` in a `Blob` of type `mime` and returns an object URL for it.
pub fn object_url(bytes: &[u8], mime: &str) -> Result<String, String> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
    Url::create_object_url_with_blob(&blob).map_err(js_error)
}

pub fn revoke_object_url(url: &str) {
    if let Err(e) = Url::revoke_object_url(url) {
        gloo_console::warn!(format!("failed to revoke {}: {}", url, js_error(e)));
    }
}

/// Replaces the object URL held in `slot`, revoking the previous one first.
pub fn replace_object_url(slot: &mut Option<String>, next: Option<String>) {
    if let Some(previous) = slot.take() {
        revoke_object_url(&previous);
    }
    *slot = next;
}

/// Saves `bytes` as `file_name` through a temporary anchor element.
pub fn save_bytes(file_name: &str, bytes: &[u8], mime: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document available")?;
    let url = object_url(bytes, mime)?;
    let result = document
        .create_element("a")
        .map_err(js_error)
        .and_then(|el| {
            el.dyn_into::<HtmlAnchorElement>()
                .map_err(|_| "anchor element expected".to_string())
        })
        .map(|anchor| {
            anchor.set_href(&url);
            anchor.set_download(file_name);
            anchor.click();
        });
    revoke_object_url(&url);
    result
}

/// Name offered for a filled copy of `file_name`: `invoice.pdf` → `invoice-filled.pdf`.
pub fn filled_file_name(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(".pdf")
        .or_else(|| file_name.strip_suffix(".PDF"))
        .unwrap_or(file_name);
    let stem = if stem.trim().is_empty() { "document" } else { stem };
    format!("{}-filled.pdf", stem)
}

/// Computes the MD5 hash of a string and returns it as a hex digest.
pub fn compute_md5(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}

/// Sets the global `app_dirty` flag read by the `beforeunload` handler.
pub fn set_window_dirty_flag(dirty: bool) {
    if let Some(window) = web_sys::window() {
        let _ = Reflect::set(
            &window,
            &JsValue::from_str("app_dirty"),
            &JsValue::from_bool(dirty),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_names_keep_the_stem() {
        assert_eq!(filled_file_name("invoice.pdf"), "invoice-filled.pdf");
        assert_eq!(filled_file_name("SCAN.PDF"), "SCAN-filled.pdf");
        assert_eq!(filled_file_name("notes"), "notes-filled.pdf");
        assert_eq!(filled_file_name(""), "document-filled.pdf");
    }

    #[test]
    fn md5_is_hex() {
        assert_eq!(compute_md5(""), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
