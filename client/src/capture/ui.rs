use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use common::{CaptureController, CaptureError, CaptureSettings, SessionId, ToggleOutcome};

use super::config_handle::ConfigHandle;
use super::media_recorder::RecordedChunk;
use super::platform::WebPlatform;

struct CaptureContext {
    controller: CaptureController<WebPlatform>,
    config: ConfigHandle,
}

thread_local! {
    static CAPTURE: RefCell<Option<CaptureContext>> = RefCell::new(None);
}

fn to_js(e: CaptureError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Run `f` against the controller.
///
/// Returns `None` if the controller is not initialized or is busy in an
/// action that is still on the stack.
fn with_capture<R>(f: impl FnOnce(&mut CaptureContext) -> R) -> Option<R> {
    CAPTURE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut guard) => match guard.as_mut() {
            Some(ctx) => Some(f(ctx)),
            None => {
                log::warn!("[Capture] Controller not initialized");
                None
            }
        },
        Err(_) => {
            log::warn!("[Capture] Controller busy, dropping event");
            None
        }
    })
}

fn not_initialized() -> JsValue {
    JsValue::from_str("capture controller not initialized")
}

/// Bind the capture controller to a canvas and the renderer's config object.
///
/// `settings` may be `undefined` to use the defaults.
#[wasm_bindgen]
pub fn init_capture_controller(
    canvas: HtmlCanvasElement,
    config: JsValue,
    settings: JsValue,
) -> Result<(), JsValue> {
    let settings: CaptureSettings = if settings.is_undefined() || settings.is_null() {
        CaptureSettings::default()
    } else {
        serde_wasm_bindgen::from_value(settings)?
    };

    match settings.logging.level.parse::<log::Level>() {
        Ok(level) => log::set_max_level(level.to_level_filter()),
        Err(_) => log::warn!("[Capture] Unknown log level {:?}, keeping default", settings.logging.level),
    }

    let config = ConfigHandle::new(config)?;
    let platform = WebPlatform::new(canvas, settings.elements.clone())?;
    let mut controller = CaptureController::new(platform, settings);
    controller.sync_controls();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document")?;
    let elements = controller.platform().elements().clone();

    CAPTURE.with(|cell| {
        *cell.borrow_mut() = Some(CaptureContext { controller, config });
    });

    setup_button(&document, &elements.record_button, "toggle recording", toggle_recording);
    setup_button(&document, &elements.download_button, "download video", download_video);
    setup_button(&document, &elements.screenshot_button, "download image", download_image);

    log::info!("[Capture] Controller initialized");
    Ok(())
}

fn setup_button(document: &web_sys::Document, id: &str, action: &'static str, handler: fn() -> Result<(), JsValue>) {
    let Some(button) = document.get_element_by_id(id) else {
        log::warn!("[Capture] Button #{} not found, {} is only available from JS", id, action);
        return;
    };

    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Err(e) = handler() {
            log::error!("[Capture] Failed to {}: {:?}", action, e);
        }
    }) as Box<dyn FnMut(_)>);

    if let Err(e) = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref()) {
        log::warn!("[Capture] Could not attach click handler to #{}: {:?}", id, e);
    }
    closure.forget();
}

/// Start recording if idle, stop if recording
#[wasm_bindgen]
pub fn toggle_recording() -> Result<(), JsValue> {
    with_capture(|ctx| -> Result<(), JsValue> {
        let mut cfg = ctx.config.read()?;
        let outcome = ctx.controller.toggle(&mut cfg);
        ctx.config.write_back(&cfg)?;

        match outcome.map_err(to_js)? {
            ToggleOutcome::Started(started) => {
                if let Some(view) = started.previous_view {
                    log::info!("[Capture] Inline view switched from {:?} to quilt for recording", view);
                }
                log::info!("[Capture] Recording with {}", started.codec);
            }
            ToggleOutcome::Stopped => log::info!("[Capture] Recording stopped"),
        }
        Ok(())
    })
    .unwrap_or_else(|| Err(not_initialized()))
}

/// Download the last recording as `hologram_qs<w>x<h>a<aspect>.webm`
#[wasm_bindgen]
pub fn download_video() -> Result<(), JsValue> {
    with_capture(|ctx| -> Result<(), JsValue> {
        let cfg = ctx.config.read()?;
        ctx.controller.export_video(&cfg).map_err(to_js)?;
        Ok(())
    })
    .unwrap_or_else(|| Err(not_initialized()))
}

/// Download the current quilt framebuffer as a PNG.
///
/// `capturing` should be set on the config first so the renderer draws the full quilt.
#[wasm_bindgen]
pub fn download_image() -> Result<(), JsValue> {
    with_capture(|ctx| -> Result<(), JsValue> {
        let cfg = ctx.config.read()?;
        ctx.controller.export_image(&cfg).map_err(to_js)?;
        Ok(())
    })
    .unwrap_or_else(|| Err(not_initialized()))
}

#[wasm_bindgen]
pub fn capture_state() -> String {
    with_capture(|ctx| ctx.controller.state().as_str().to_string()).unwrap_or_else(|| "uninitialized".to_string())
}

pub(crate) fn dispatch_chunk(session: SessionId, chunk: RecordedChunk) {
    with_capture(|ctx| ctx.controller.on_chunk(session, chunk));
}

pub(crate) fn dispatch_recorder_stopped(session: SessionId) {
    with_capture(|ctx| {
        if let Err(e) = ctx.controller.on_recorder_stopped(session) {
            log::error!("[Capture] Failed to finalize recording: {}", e);
        }
    });
}
