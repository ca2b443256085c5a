use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MediaStream, MediaStreamTrack};

/// Start capturing the canvas as a live video stream
pub fn capture_canvas_stream(canvas: &HtmlCanvasElement) -> Result<MediaStream, JsValue> {
    let stream = canvas.capture_stream()?;
    log::debug!(
        "[Capture] Canvas stream {} with {} video track(s)",
        stream.id(),
        stream.get_video_tracks().length()
    );
    Ok(stream)
}

pub fn stop_stream(stream: &MediaStream) {
    let tracks = stream.get_tracks();
    for i in 0..tracks.length() {
        let track = MediaStreamTrack::from(tracks.get(i));
        track.stop();
    }
}
