//! Capture state and the view model of the controls it drives.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ControlLabels;

/// Identifies one recording session; callbacks from older recorders carry a stale id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

/// Current state of the capture controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    /// Nothing captured yet
    #[default]
    Idle,
    /// Canvas stream acquired, no recorder attached
    Armed,
    /// Recorder running
    Recording,
    /// Recorder asked to stop, final chunks may still arrive
    Stopping,
    /// Recorder stopped and the video assembled
    Stopped,
}

impl CaptureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Armed => "armed",
            CaptureState::Recording => "recording",
            CaptureState::Stopping => "stopping",
            CaptureState::Stopped => "stopped",
        }
    }

    /// Whether a finished capture can be offered for download
    pub fn has_capture(&self) -> bool {
        matches!(self, CaptureState::Stopping | CaptureState::Stopped)
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the record/download/preview controls should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub record_label: String,
    pub download_enabled: bool,
    /// Value to set on the preview's `controls`; `None` leaves the page's setting alone
    pub preview_controls: Option<bool>,
}

impl ControlsView {
    pub fn for_state(state: CaptureState, labels: &ControlLabels) -> Self {
        let recording = state == CaptureState::Recording;
        Self {
            record_label: if recording {
                labels.stop.clone()
            } else {
                labels.record.clone()
            },
            download_enabled: state.has_capture(),
            preview_controls: state.has_capture().then_some(true),
        }
    }
}
