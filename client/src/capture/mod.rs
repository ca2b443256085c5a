//! Canvas recording and screenshot export for the Looking Glass inline view

pub mod config_handle;
pub mod download;
pub mod framebuffer;
pub mod media_recorder;
pub mod media_streams;
pub mod platform;
pub mod ui;

pub use platform::WebPlatform;
pub use ui::init_capture_controller;
