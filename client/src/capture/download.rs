use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, Document, HtmlAnchorElement};

/// Hidden anchor used to trigger one download.
///
/// Dropping it detaches the anchor and revokes the object URL it owns.
pub struct DownloadLink {
    anchor: HtmlAnchorElement,
    object_url: Option<String>,
}

impl DownloadLink {
    /// Link to a blob through a transient object URL
    pub fn for_blob(document: &Document, blob: &Blob, filename: &str) -> Result<Self, JsValue> {
        let url = web_sys::Url::create_object_url_with_blob(blob)?;
        let mut link = Self::create(document, &url, filename)?;
        link.object_url = Some(url);
        Ok(link)
    }

    pub fn for_data_url(document: &Document, url: &str, filename: &str) -> Result<Self, JsValue> {
        Self::create(document, url, filename)
    }

    fn create(document: &Document, href: &str, filename: &str) -> Result<Self, JsValue> {
        let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        anchor.style().set_property("display", "none")?;
        anchor.set_href(href);
        anchor.set_download(filename);
        document.body().ok_or("No document body")?.append_child(&anchor)?;

        Ok(Self {
            anchor,
            object_url: None,
        })
    }

    pub fn click(&self) {
        self.anchor.click();
    }

    /// Keep the link alive for `delay_ms` so the browser can dispatch the download
    pub fn release_after(self, delay_ms: u32) {
        gloo_timers::callback::Timeout::new(delay_ms, move || drop(self)).forget();
    }
}

impl Drop for DownloadLink {
    fn drop(&mut self) {
        self.anchor.remove();
        if let Some(url) = self.object_url.take() {
            if let Err(e) = web_sys::Url::revoke_object_url(&url) {
                log::warn!("[Capture] Failed to revoke {}: {:?}", url, e);
            }
        }
    }
}
