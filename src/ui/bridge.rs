/// Calls into `popup.js` for canvas, clipboard, downloads and `chrome.tabs`
use crate::error::{Error, RenderFailure, Result};
use crate::export::{self, ExportFormat};
use crate::history::{Clock, SystemClock, THUMBNAIL_WIDTH, Thumbnail};
use crate::render::{RenderOptions, Renderer};
use crate::symbology::Symbology;
use crate::tab_data::{TabInfo, active_tab_url};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub const CANVAS_ID: &str = "barcodeCanvas";

#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn renderBarcode(canvas_id: &str, options: JsValue) -> std::result::Result<(), JsValue>;

    fn canvasDataUrl(canvas_id: &str) -> String;

    fn canvasSize(canvas_id: &str) -> JsValue;

    fn thumbnailDataUrl(canvas_id: &str, width: u32) -> String;

    fn downloadUrl(url: &str, filename: &str);

    fn downloadText(content: &str, mime_type: &str, filename: &str);

    #[wasm_bindgen(catch)]
    async fn copyCanvas(canvas_id: &str) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn openPrintWindow(html: &str) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTabs() -> std::result::Result<JsValue, JsValue>;

    fn confirmDialog(message: &str) -> bool;

    fn setDarkModeClass(enabled: bool);

    #[wasm_bindgen(catch)]
    async fn sleep(ms: u32) -> std::result::Result<(), JsValue>;
}

#[derive(Deserialize)]
struct CanvasSize {
    width: u32,
    height: u32,
}

/// bwip-js drawing onto the popup's canvas
pub struct CanvasRenderer;

impl Renderer for CanvasRenderer {
    fn render(&mut self, options: &RenderOptions) -> std::result::Result<(), RenderFailure> {
        let options_js = serde_wasm_bindgen::to_value(options)
            .map_err(|e| RenderFailure::new(format!("Failed to serialize options: {}", e)))?;

        renderBarcode(CANVAS_ID, options_js).map_err(|e| RenderFailure::new(js_error_message(&e)))
    }
}

/// The `message` of a thrown JS error, or its debug form for anything else
fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub async fn current_tab_url() -> Result<String> {
    let tabs_js = getActiveTabs()
        .await
        .map_err(|e| Error::Collaborator(js_error_message(&e)))?;
    let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs_js)
        .map_err(|e| Error::Collaborator(format!("Failed to parse tabs: {}", e)))?;
    active_tab_url(&tabs)
}

pub fn thumbnail() -> Result<Thumbnail> {
    Thumbnail::from_data_url(&thumbnailDataUrl(CANVAS_ID, THUMBNAIL_WIDTH))
}

pub fn download_png(symbology: &Symbology) {
    let filename = export::download_filename(symbology, ExportFormat::Png, now_millis());
    downloadUrl(&canvasDataUrl(CANVAS_ID), &filename);
}

pub fn download_svg(symbology: &Symbology) -> Result<()> {
    let size: CanvasSize = serde_wasm_bindgen::from_value(canvasSize(CANVAS_ID))
        .map_err(|e| Error::Collaborator(format!("Failed to read canvas size: {}", e)))?;

    let svg = export::svg_wrapper(size.width, size.height, &canvasDataUrl(CANVAS_ID));
    let filename = export::download_filename(symbology, ExportFormat::Svg, now_millis());
    downloadText(&svg, ExportFormat::Svg.mime_type(), &filename);
    Ok(())
}

pub async fn copy_to_clipboard() -> Result<()> {
    copyCanvas(CANVAS_ID)
        .await
        .map_err(|e| Error::Collaborator(js_error_message(&e)))
}

pub fn print() -> Result<()> {
    let html = export::print_document(&canvasDataUrl(CANVAS_ID));
    openPrintWindow(&html).map_err(|e| Error::Collaborator(js_error_message(&e)))
}

pub fn confirm(message: &str) -> bool {
    confirmDialog(message)
}

pub fn apply_dark_mode(enabled: bool) {
    setDarkModeClass(enabled);
}

pub async fn wait_ms(ms: u32) {
    if let Err(e) = sleep(ms).await {
        log::warn!("Timer failed: {}", js_error_message(&e));
    }
}

fn now_millis() -> i64 {
    SystemClock.now_millis()
}
