use wasm_bindgen::prelude::*;

use common::LookingGlassConfig;

/// The renderer's JS configuration object.
///
/// Read in full at every action; only `capturing` and `inlineView` are written back.
pub struct ConfigHandle {
    object: JsValue,
}

impl ConfigHandle {
    pub fn new(object: JsValue) -> Result<Self, JsValue> {
        if !object.is_object() {
            return Err("Looking Glass config must be an object".into());
        }
        Ok(Self { object })
    }

    pub fn read(&self) -> Result<LookingGlassConfig, JsValue> {
        Ok(serde_wasm_bindgen::from_value(self.object.clone())?)
    }

    pub fn write_back(&self, cfg: &LookingGlassConfig) -> Result<(), JsValue> {
        js_sys::Reflect::set(&self.object, &"capturing".into(), &JsValue::from_bool(cfg.capturing))?;
        let view: u8 = cfg.inline_view.into();
        js_sys::Reflect::set(&self.object, &"inlineView".into(), &JsValue::from(view))?;
        Ok(())
    }
}
