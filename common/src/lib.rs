//! Platform-independent core of the hologram capture controller.

pub mod chunks;
pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod platform;
pub mod state;

pub use chunks::*;
pub use codec::*;
pub use config::*;
pub use controller::*;
pub use error::CaptureError;
pub use export::*;
pub use platform::*;
pub use state::*;
