/// Barcode Popup - Browser extension for generating barcodes
/// Built with Rust + WASM + Yew

pub mod error;
pub mod export;
pub mod history;
pub mod preferences;
pub mod render;
pub mod sample;
pub mod storage;
pub mod symbology;
pub mod tab_data;
pub mod ui;
pub mod validate;

pub use error::{Error, RenderFailure, Result, ValidationFailure};
pub use history::{HistoryItem, HistoryStore, Thumbnail};
pub use preferences::{DisplaySettings, PreferencesStore};
pub use symbology::Symbology;
pub use validate::normalize;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export validation for JavaScript access
#[wasm_bindgen]
pub fn normalize_input(text: &str, barcode_type: &str) -> std::result::Result<String, JsValue> {
    validate::normalize(text, &Symbology::from_bcid(barcode_type))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
