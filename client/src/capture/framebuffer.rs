use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData, WebGl2RenderingContext};

use common::{CaptureError, Frame};

use super::platform::js_error;

/// Read RGBA pixels from the default framebuffer of the canvas' WebGL2 context
pub fn read_pixels(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Result<Frame, CaptureError> {
    let gl = canvas
        .get_context("webgl2")
        .map_err(js_error)?
        .and_then(|ctx| ctx.dyn_into::<WebGl2RenderingContext>().ok())
        .ok_or_else(|| CaptureError::RenderingContextUnavailable("webgl2".to_string()))?;

    let w = i32::try_from(width).map_err(|_| CaptureError::Platform(format!("width {} out of range", width)))?;
    let h = i32::try_from(height).map_err(|_| CaptureError::Platform(format!("height {} out of range", height)))?;

    let len = Frame::byte_len(width, height).ok_or(CaptureError::FrameTooLarge { width, height })?;
    let mut rgba = vec![0u8; len];
    gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, None);
    gl.read_pixels_with_opt_u8_array(
        0,
        0,
        w,
        h,
        WebGl2RenderingContext::RGBA,
        WebGl2RenderingContext::UNSIGNED_BYTE,
        Some(&mut rgba),
    )
    .map_err(js_error)?;

    Frame::new(width, height, rgba)
}

/// Copy a frame into a 2D canvas and encode it as a PNG data URL
pub fn encode_png(document: &Document, frame: &Frame) -> Result<String, CaptureError> {
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| CaptureError::Platform("created element is not a canvas".to_string()))?;
    canvas.set_width(frame.width);
    canvas.set_height(frame.height);

    let ctx = canvas
        .get_context("2d")
        .map_err(js_error)?
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or_else(|| CaptureError::RenderingContextUnavailable("2d".to_string()))?;

    let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&frame.rgba[..]), frame.width, frame.height)
        .map_err(js_error)?;
    ctx.put_image_data(&image, 0.0, 0.0).map_err(js_error)?;

    canvas.to_data_url_with_type("image/png").map_err(js_error)
}
