use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobEvent, MediaRecorder, MediaRecorderOptions, MediaStream};

use common::Chunk;

/// Blob delivered by `dataavailable`
pub struct RecordedChunk(pub Blob);

impl Chunk for RecordedChunk {
    fn byte_len(&self) -> u64 {
        self.0.size() as u64
    }
}

pub struct Recorder {
    recorder: MediaRecorder,
    mime_type: String,
}

impl Recorder {
    /// Construct a MediaRecorder for one mime type and attach its callbacks.
    ///
    /// Fails when the browser rejects the configuration.
    pub fn new<D, S>(stream: &MediaStream, mime_type: &str, on_data: D, on_stop: S) -> Result<Self, JsValue>
    where
        D: FnMut(Blob) + 'static,
        S: FnMut() + 'static,
    {
        let options = MediaRecorderOptions::new();
        options.set_mime_type(mime_type);
        let recorder = MediaRecorder::new_with_media_stream_and_media_recorder_options(stream, &options)?;

        let mut on_data = on_data;
        let data_closure = Closure::wrap(Box::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                on_data(blob);
            }
        }) as Box<dyn FnMut(BlobEvent)>);
        recorder.set_ondataavailable(Some(data_closure.as_ref().unchecked_ref()));
        data_closure.forget();

        let mut on_stop = on_stop;
        let stop_closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            on_stop();
        }) as Box<dyn FnMut(web_sys::Event)>);
        recorder.set_onstop(Some(stop_closure.as_ref().unchecked_ref()));
        stop_closure.forget();

        Ok(Self {
            recorder,
            mime_type: mime_type.to_string(),
        })
    }

    /// Start recording, flushing a chunk every `timeslice_ms`
    pub fn start(&self, timeslice_ms: u32) -> Result<(), JsValue> {
        let timeslice = i32::try_from(timeslice_ms).map_err(|_| "timeslice out of range")?;
        self.recorder.start_with_time_slice(timeslice)
    }

    pub fn stop(&self) -> Result<(), JsValue> {
        self.recorder.stop()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}
