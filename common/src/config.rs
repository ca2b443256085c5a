use serde::{Deserialize, Serialize};

use crate::codec::{default_codecs, CodecCandidate};
use crate::error::Result;

/// Render mode of the inline (non-headset) view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum InlineView {
    #[default]
    Swizzled,
    Center,
    /// Tiled quilt of all views, required for hologram capture
    Quilt,
}

impl TryFrom<u8> for InlineView {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(InlineView::Swizzled),
            1 => Ok(InlineView::Center),
            2 => Ok(InlineView::Quilt),
            other => Err(format!("unknown inline view mode {}", other)),
        }
    }
}

impl From<InlineView> for u8 {
    fn from(view: InlineView) -> Self {
        match view {
            InlineView::Swizzled => 0,
            InlineView::Center => 1,
            InlineView::Quilt => 2,
        }
    }
}

/// Shared Looking Glass display configuration.
///
/// Owned by the renderer; the capture controller reads the quilt and
/// framebuffer dimensions and writes `capturing` and `inline_view`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LookingGlassConfig {
    #[serde(default)]
    pub capturing: bool,
    #[serde(default)]
    pub inline_view: InlineView,
    #[serde(default = "default_quilt_width")]
    pub quilt_width: u32,
    #[serde(default = "default_quilt_height")]
    pub quilt_height: u32,
    #[serde(default = "default_aspect")]
    pub aspect: f64,
    #[serde(default = "default_framebuffer_width")]
    pub framebuffer_width: u32,
    #[serde(default = "default_framebuffer_height")]
    pub framebuffer_height: u32,
}

fn default_quilt_width() -> u32 {
    8
}

fn default_quilt_height() -> u32 {
    6
}

fn default_aspect() -> f64 {
    0.75
}

fn default_framebuffer_width() -> u32 {
    3360
}

fn default_framebuffer_height() -> u32 {
    3360
}

impl Default for LookingGlassConfig {
    fn default() -> Self {
        Self {
            capturing: false,
            inline_view: InlineView::default(),
            quilt_width: default_quilt_width(),
            quilt_height: default_quilt_height(),
            aspect: default_aspect(),
            framebuffer_width: default_framebuffer_width(),
            framebuffer_height: default_framebuffer_height(),
        }
    }
}

/// Settings for the capture controller itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSettings {
    /// Recorder configurations, tried in order
    #[serde(default = "default_codecs")]
    pub codecs: Vec<CodecCandidate>,

    /// How often the recorder is asked to flush a chunk
    #[serde(default = "default_timeslice_ms")]
    pub timeslice_ms: u32,

    /// Delay before a download link and its URL are released
    #[serde(default = "default_release_delay_ms")]
    pub release_delay_ms: u32,

    /// Container type of the assembled video
    #[serde(default = "default_video_mime_type")]
    pub video_mime_type: String,

    /// Shown when no codec configuration is accepted
    #[serde(default = "default_unsupported_message")]
    pub unsupported_message: String,

    #[serde(default)]
    pub labels: ControlLabels,

    #[serde(default)]
    pub elements: ElementIds,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlLabels {
    #[serde(default = "default_record_label")]
    pub record: String,
    #[serde(default = "default_stop_label")]
    pub stop: String,
}

/// DOM ids of the controls the controller drives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementIds {
    #[serde(default = "default_record_button")]
    pub record_button: String,
    #[serde(default = "default_download_button")]
    pub download_button: String,
    #[serde(default = "default_screenshot_button")]
    pub screenshot_button: String,
    #[serde(default = "default_preview_video")]
    pub preview_video: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_timeslice_ms() -> u32 {
    100
}

fn default_release_delay_ms() -> u32 {
    100
}

fn default_video_mime_type() -> String {
    "video/webm".to_string()
}

fn default_unsupported_message() -> String {
    "MediaRecorder is not supported by this browser.\n\n\
     Try Firefox 29 or later, or Chrome 47 or later, \
     with Enable experimental Web Platform features enabled from chrome://flags."
        .to_string()
}

fn default_record_label() -> String {
    "Record".to_string()
}

fn default_stop_label() -> String {
    "Stop Recording".to_string()
}

fn default_record_button() -> String {
    "recordbutton".to_string()
}

fn default_download_button() -> String {
    "downloadbutton".to_string()
}

fn default_screenshot_button() -> String {
    "screenshotbutton".to_string()
}

fn default_preview_video() -> String {
    "looking-glass-video".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            codecs: default_codecs(),
            timeslice_ms: default_timeslice_ms(),
            release_delay_ms: default_release_delay_ms(),
            video_mime_type: default_video_mime_type(),
            unsupported_message: default_unsupported_message(),
            labels: ControlLabels::default(),
            elements: ElementIds::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ControlLabels {
    fn default() -> Self {
        Self {
            record: default_record_label(),
            stop: default_stop_label(),
        }
    }
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            record_button: default_record_button(),
            download_button: default_download_button(),
            screenshot_button: default_screenshot_button(),
            preview_video: default_preview_video(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl CaptureSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
