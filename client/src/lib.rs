use wasm_bindgen::prelude::*;

pub mod capture;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    // Narrowed by init_capture_controller from the configured level
    wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));
    log::set_max_level(log::LevelFilter::Info);

    log::info!("Hologram capture WASM initialized");
}
