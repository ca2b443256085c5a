use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlButtonElement, HtmlCanvasElement, HtmlVideoElement, MediaStream};

use common::{
    CaptureError, CapturePlatform, CodecCandidate, ControlsView, ElementIds, Frame, SessionId,
};

use super::download::DownloadLink;
use super::framebuffer;
use super::media_recorder::{RecordedChunk, Recorder};
use super::media_streams::{capture_canvas_stream, stop_stream};
use super::ui;

pub(crate) fn js_error(e: JsValue) -> CaptureError {
    CaptureError::Platform(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Browser implementation of the capture platform for one canvas
pub struct WebPlatform {
    document: Document,
    canvas: HtmlCanvasElement,
    elements: ElementIds,
    preview_url: Option<String>,
}

impl WebPlatform {
    pub fn new(canvas: HtmlCanvasElement, elements: ElementIds) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;

        Ok(Self {
            document,
            canvas,
            elements,
            preview_url: None,
        })
    }

    pub fn elements(&self) -> &ElementIds {
        &self.elements
    }

    fn preview_video(&self) -> Option<HtmlVideoElement> {
        self.document
            .get_element_by_id(&self.elements.preview_video)
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
    }

    fn button(&self, id: &str) -> Option<HtmlButtonElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    }
}

impl CapturePlatform for WebPlatform {
    type Stream = MediaStream;
    type Recorder = Recorder;
    type Chunk = RecordedChunk;
    type Video = Blob;
    type Image = String;

    fn capture_stream(&mut self) -> common::error::Result<MediaStream> {
        capture_canvas_stream(&self.canvas).map_err(js_error)
    }

    fn release_stream(&mut self, stream: MediaStream) {
        stop_stream(&stream);
    }

    fn create_recorder(
        &mut self,
        stream: &MediaStream,
        codec: &CodecCandidate,
        session: SessionId,
    ) -> common::error::Result<Recorder> {
        Recorder::new(
            stream,
            &codec.mime_type,
            move |blob| ui::dispatch_chunk(session, RecordedChunk(blob)),
            move || ui::dispatch_recorder_stopped(session),
        )
        .map_err(js_error)
    }

    fn start_recorder(&mut self, recorder: &Recorder, timeslice_ms: u32) -> common::error::Result<()> {
        recorder.start(timeslice_ms).map_err(js_error)
    }

    fn stop_recorder(&mut self, recorder: Recorder) -> common::error::Result<()> {
        log::debug!("[Capture] Stopping {} recorder", recorder.mime_type());
        recorder.stop().map_err(js_error)
    }

    fn assemble_video(&mut self, chunks: &[RecordedChunk], mime_type: &str) -> common::error::Result<Blob> {
        let parts = js_sys::Array::new();
        for chunk in chunks {
            parts.push(&chunk.0);
        }
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);
        Blob::new_with_blob_sequence_and_options(&parts, &options).map_err(js_error)
    }

    fn present_video(&mut self, video: &Blob) -> common::error::Result<()> {
        let Some(element) = self.preview_video() else {
            log::debug!("[Capture] No preview element #{}", self.elements.preview_video);
            return Ok(());
        };

        let url = web_sys::Url::create_object_url_with_blob(video).map_err(js_error)?;
        element.set_src(&url);
        element.set_controls(true);
        if let Some(old) = self.preview_url.replace(url) {
            let _ = web_sys::Url::revoke_object_url(&old);
        }
        Ok(())
    }

    fn read_framebuffer(&mut self, width: u32, height: u32) -> common::error::Result<Frame> {
        framebuffer::read_pixels(&self.canvas, width, height)
    }

    fn encode_image(&mut self, frame: &Frame) -> common::error::Result<String> {
        framebuffer::encode_png(&self.document, frame)
    }

    fn download_video(&mut self, video: Blob, filename: &str, release_after_ms: u32) -> common::error::Result<()> {
        let link = DownloadLink::for_blob(&self.document, &video, filename).map_err(js_error)?;
        link.click();
        link.release_after(release_after_ms);
        Ok(())
    }

    fn download_image(&mut self, image: String, filename: &str) -> common::error::Result<()> {
        let link = DownloadLink::for_data_url(&self.document, &image, filename).map_err(js_error)?;
        link.click();
        Ok(())
    }

    fn notify_user(&mut self, message: &str) {
        let shown = web_sys::window()
            .ok_or_else(|| JsValue::from_str("No window"))
            .and_then(|w| w.alert_with_message(message));
        if let Err(e) = shown {
            log::error!("[Capture] Could not show notification {:?}: {:?}", message, e);
        }
    }

    fn update_controls(&mut self, view: &ControlsView) {
        if let Some(button) = self.button(&self.elements.record_button) {
            button.set_text_content(Some(&view.record_label));
        }
        if let Some(button) = self.button(&self.elements.download_button) {
            button.set_disabled(!view.download_enabled);
        }
        if let Some(enabled) = view.preview_controls {
            if let Some(video) = self.preview_video() {
                video.set_controls(enabled);
            }
        }
    }
}
