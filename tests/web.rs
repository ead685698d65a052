//! Browser-only tests, run with `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use barcode_popup::history::{HISTORY_KEY, HistoryStore, Thumbnail};
use barcode_popup::preferences::{DisplaySettings, PreferencesStore};
use barcode_popup::storage::{KeyValueStore, LocalStorage};
use barcode_popup::symbology::Symbology;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn fresh_storage() -> LocalStorage {
    let mut storage = LocalStorage::open().unwrap();
    storage.remove(HISTORY_KEY).unwrap();
    storage.remove("barcodePreferences").unwrap();
    storage
}

#[wasm_bindgen_test]
fn test_local_storage_round_trip() {
    let mut storage = fresh_storage();
    storage.set("barcode-popup-test", "value").unwrap();
    assert_eq!(storage.get("barcode-popup-test"), Some("value".to_string()));
    storage.remove("barcode-popup-test").unwrap();
    assert_eq!(storage.get("barcode-popup-test"), None);
}

#[wasm_bindgen_test]
fn test_history_persists_in_local_storage() {
    let mut history = HistoryStore::new(fresh_storage());
    let item = history
        .record(
            Symbology::QrCode,
            "https://example.com".to_string(),
            Thumbnail::from_png(vec![1, 2, 3]),
            DisplaySettings::default(),
        )
        .unwrap();

    let reopened = HistoryStore::new(LocalStorage::open().unwrap());
    assert_eq!(reopened.get(item.id), Some(item));
}

#[wasm_bindgen_test]
fn test_preferences_persist_in_local_storage() {
    let mut prefs = PreferencesStore::new(fresh_storage());
    let settings = DisplaySettings {
        scale: 5.0,
        ..DisplaySettings::default()
    };
    prefs.save(&settings).unwrap();

    let reopened = PreferencesStore::new(LocalStorage::open().unwrap());
    assert_eq!(reopened.load(), settings);
}
