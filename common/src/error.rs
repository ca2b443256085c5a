//! Error types for the capture controller.

use thiserror::Error;

use crate::state::CaptureState;

/// Errors that can occur while recording or exporting a capture
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No codec configuration was accepted by the platform recorder
    #[error("MediaRecorder rejected all {attempts} codec configurations")]
    Unsupported { attempts: usize },

    /// The requested action is not valid in the current state
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: CaptureState,
    },

    /// Video export requested but no chunks were recorded
    #[error("no recorded video to export")]
    NothingRecorded,

    /// A 2D or WebGL2 context could not be obtained
    #[error("rendering context unavailable: {0}")]
    RenderingContextUnavailable(String),

    /// Requested dimensions exceed the addressable buffer size
    #[error("frame of {width}x{height} RGBA pixels is too large")]
    FrameTooLarge { width: u32, height: u32 },

    /// Pixel buffer does not match the requested dimensions
    #[error("frame is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    FrameSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Error reported by the host platform
    #[error("platform error: {0}")]
    Platform(String),

    /// Settings JSON could not be parsed
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Result type for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;
