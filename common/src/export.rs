use crate::config::LookingGlassConfig;
use crate::error::{CaptureError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Video,
    Image,
}

impl ExportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Video => "webm",
            ExportKind::Image => "png",
        }
    }
}

/// Download filename for an export, e.g. `hologram_qs8x6a0.75.webm`.
///
/// Depends only on the quilt layout and aspect at call time.
pub fn export_filename(cfg: &LookingGlassConfig, kind: ExportKind) -> String {
    format!(
        "hologram_qs{}x{}a{}.{}",
        cfg.quilt_width,
        cfg.quilt_height,
        js_number(cfg.aspect),
        kind.extension()
    )
}

/// Format a number the way JavaScript's `Number.prototype.toString` does
fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
            _ => formatted,
        }
    } else {
        value.to_string()
    }
}

/// RGBA8 pixels read back from the rendering surface
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height).ok_or(CaptureError::FrameTooLarge { width, height })?;
        if rgba.len() != expected {
            return Err(CaptureError::FrameSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }

    /// RGBA byte count for the dimensions, `None` if it does not fit in memory
    pub fn byte_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .filter(|&len| len <= isize::MAX as usize)
    }

    /// Reverse row order. GL readback starts at the bottom-left corner,
    /// 2D bitmaps at the top-left.
    pub fn flip_rows(&mut self) {
        let stride = self.width as usize * 4;
        if stride == 0 {
            return;
        }
        let rows = self.height as usize;
        for top in 0..rows / 2 {
            let bottom = rows - 1 - top;
            let (head, tail) = self.rgba.split_at_mut(bottom * stride);
            head[top * stride..(top + 1) * stride].swap_with_slice(&mut tail[..stride]);
        }
    }
}
