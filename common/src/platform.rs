//! Host platform seam used by the capture controller.
//!
//! The browser binding implements this over `HTMLCanvasElement`,
//! `MediaRecorder`, WebGL2 and anchor downloads; tests implement it in memory.

use crate::chunks::Chunk;
use crate::codec::CodecCandidate;
use crate::error::Result;
use crate::export::Frame;
use crate::state::{ControlsView, SessionId};

pub trait CapturePlatform {
    /// Live capture stream of the rendering surface
    type Stream;
    /// Platform recorder attached to a stream
    type Recorder;
    /// Recorded data segment
    type Chunk: Chunk;
    /// Assembled, playable video
    type Video;
    /// Encoded still image
    type Image;

    fn capture_stream(&mut self) -> Result<Self::Stream>;

    /// Stop the stream's tracks
    fn release_stream(&mut self, stream: Self::Stream);

    /// Construct a recorder for one codec configuration.
    ///
    /// Chunks and the stop notification must be delivered back to the
    /// controller tagged with `session`.
    fn create_recorder(
        &mut self,
        stream: &Self::Stream,
        codec: &CodecCandidate,
        session: SessionId,
    ) -> Result<Self::Recorder>;

    fn start_recorder(&mut self, recorder: &Self::Recorder, timeslice_ms: u32) -> Result<()>;

    /// Ask the recorder to stop; the stop notification follows asynchronously
    fn stop_recorder(&mut self, recorder: Self::Recorder) -> Result<()>;

    fn assemble_video(&mut self, chunks: &[Self::Chunk], mime_type: &str) -> Result<Self::Video>;

    /// Hand the finished video to the preview surface
    fn present_video(&mut self, video: &Self::Video) -> Result<()>;

    fn read_framebuffer(&mut self, width: u32, height: u32) -> Result<Frame>;

    fn encode_image(&mut self, frame: &Frame) -> Result<Self::Image>;

    /// Trigger a download; transient handles are released after `release_after_ms`
    fn download_video(&mut self, video: Self::Video, filename: &str, release_after_ms: u32) -> Result<()>;

    fn download_image(&mut self, image: Self::Image, filename: &str) -> Result<()>;

    /// Blocking user-facing notification
    fn notify_user(&mut self, message: &str);

    fn update_controls(&mut self, view: &ControlsView);
}
