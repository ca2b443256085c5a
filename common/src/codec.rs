//! Recorder codec negotiation.
//!
//! Candidates are tried in order through a single attempt function; the
//! first configuration the platform accepts wins. A rejected candidate is
//! logged and never prevents the next one from being tried.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CaptureError, Result};

/// One recorder configuration offered to the platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CodecCandidate {
    pub mime_type: String,
}

impl CodecCandidate {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
        }
    }
}

impl fmt::Display for CodecCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mime_type)
    }
}

/// WebM with the browser's default codec, then WebM with H.264, then raw H.264
pub fn default_codecs() -> Vec<CodecCandidate> {
    vec![
        CodecCandidate::new("video/webm"),
        CodecCandidate::new("video/webm,codecs=h264"),
        CodecCandidate::new("video/h264"),
    ]
}

/// Try each candidate in order and return the first accepted handle.
///
/// Returns `CaptureError::Unsupported` once every candidate has been rejected.
pub fn negotiate<'a, T, F>(candidates: &'a [CodecCandidate], mut attempt: F) -> Result<(T, &'a CodecCandidate)>
where
    F: FnMut(&CodecCandidate) -> Result<T>,
{
    for candidate in candidates {
        match attempt(candidate) {
            Ok(handle) => {
                log::info!("[Capture] MediaRecorder created with mimeType {}", candidate);
                return Ok((handle, candidate));
            }
            Err(e) => {
                log::warn!("[Capture] Unable to create MediaRecorder with mimeType {}: {}", candidate, e);
            }
        }
    }

    Err(CaptureError::Unsupported {
        attempts: candidates.len(),
    })
}
