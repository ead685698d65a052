/// Bounded, newest-first history of generated barcodes
use crate::error::{Error, Result};
use crate::preferences::DisplaySettings;
use crate::storage::KeyValueStore;
use crate::symbology::Symbology;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const HISTORY_KEY: &str = "barcodeHistory";
pub const HISTORY_LIMIT: usize = 50;
pub const THUMBNAIL_WIDTH: u32 = 100;
const PREVIEW_CHARS: usize = 30;
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Milliseconds since the Unix epoch
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_millis(&self) -> i64 {
        js_sys::Date::now() as i64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// PNG bytes of a scaled-down render. Persisted as a `data:` URL so the
/// history panel can use it directly as an `<img>` source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Thumbnail {
    png: Vec<u8>,
}

impl Thumbnail {
    pub fn from_png(png: Vec<u8>) -> Self {
        Thumbnail { png }
    }

    pub fn from_data_url(url: &str) -> Result<Self> {
        let encoded = url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| Error::Collaborator("thumbnail is not a PNG data URL".to_string()))?;
        let png = STANDARD
            .decode(encoded)
            .map_err(|e| Error::Collaborator(format!("thumbnail is not valid base64: {}", e)))?;
        Ok(Thumbnail { png })
    }

    pub fn to_data_url(&self) -> String {
        format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(&self.png))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }
}

impl Serialize for Thumbnail {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for Thumbnail {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let url = String::deserialize(deserializer)?;
        Thumbnail::from_data_url(&url).map_err(serde::de::Error::custom)
    }
}

/// One past generation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub symbology: Symbology,
    pub text: String,
    pub thumbnail: Thumbnail,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub settings: DisplaySettings,
}

impl HistoryItem {
    /// Text for the history row, cut to 30 characters
    pub fn preview_text(&self) -> String {
        if self.text.chars().count() > PREVIEW_CHARS {
            let head: String = self.text.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", head)
        } else {
            self.text.clone()
        }
    }
}

/// Sole writer of the history slot. Each operation reads, modifies and
/// writes back the whole list.
pub struct HistoryStore<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> HistoryStore<S, SystemClock> {
    pub fn new(store: S) -> Self {
        HistoryStore::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> HistoryStore<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        HistoryStore { store, clock }
    }

    /// Prepend a new item, evicting the oldest beyond `HISTORY_LIMIT`
    pub fn record(
        &mut self,
        symbology: Symbology,
        text: String,
        thumbnail: Thumbnail,
        settings: DisplaySettings,
    ) -> Result<HistoryItem> {
        let mut items = self.list();
        let now = self.clock.now_millis();

        // Same-millisecond generations (or a clock stepping back) still get a fresh id
        let id = match items.first() {
            Some(newest) if newest.id >= now => newest.id + 1,
            _ => now,
        };

        let item = HistoryItem {
            id,
            symbology,
            text,
            thumbnail,
            created_at: DateTime::from_timestamp_millis(now).unwrap_or_default(),
            settings,
        };

        items.insert(0, item.clone());
        items.truncate(HISTORY_LIMIT);
        self.write(&items)?;

        log::debug!(
            "Recorded {} barcode {} ({} in history)",
            item.symbology,
            item.id,
            items.len()
        );
        Ok(item)
    }

    /// All items, newest first. An unreadable slot reads as empty, and
    /// unreadable items inside a readable slot are skipped.
    pub fn list(&self) -> Vec<HistoryItem> {
        let Some(json) = self.store.get(HISTORY_KEY) else {
            return Vec::new();
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&json) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring unreadable history: {}", e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!("Skipping unreadable history item: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn get(&self, id: i64) -> Option<HistoryItem> {
        self.list().into_iter().find(|item| item.id == id)
    }

    /// Remove the item with `id`; returns whether anything was removed
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let mut items = self.list();
        let before = items.len();
        items.retain(|item| item.id != id);

        if items.len() == before {
            return Ok(false);
        }

        self.write(&items)?;
        log::debug!("Deleted history item {}", id);
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(HISTORY_KEY)?;
        log::debug!("Cleared history");
        Ok(())
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn write(&mut self, items: &[HistoryItem]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(HISTORY_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::cell::Cell;

    /// Advances one millisecond per reading unless frozen
    struct TestClock {
        now: Cell<i64>,
        step: i64,
    }

    impl TestClock {
        fn ticking(start: i64) -> Self {
            TestClock {
                now: Cell::new(start),
                step: 1,
            }
        }

        fn frozen(at: i64) -> Self {
            TestClock {
                now: Cell::new(at),
                step: 0,
            }
        }
    }

    impl Clock for TestClock {
        fn now_millis(&self) -> i64 {
            let now = self.now.get();
            self.now.set(now + self.step);
            now
        }
    }

    fn create_test_store(clock: TestClock) -> HistoryStore<MemoryStore, TestClock> {
        HistoryStore::with_clock(MemoryStore::new(), clock)
    }

    fn record_text(history: &mut HistoryStore<MemoryStore, TestClock>, text: &str) -> HistoryItem {
        history
            .record(
                Symbology::Ean13,
                text.to_string(),
                Thumbnail::from_png(vec![0x89, b'P', b'N', b'G']),
                DisplaySettings::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_empty_history() {
        let history = create_test_store(TestClock::ticking(1_000));
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_record_prepends() {
        let mut history = create_test_store(TestClock::ticking(1_000));
        record_text(&mut history, "first");
        record_text(&mut history, "second");

        let items = history.list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "second");
        assert_eq!(items[1].text, "first");
        assert!(items[0].id > items[1].id);
    }

    #[test]
    fn test_record_limits_to_fifty() {
        let mut history = create_test_store(TestClock::ticking(1_000));
        for i in 0..51 {
            record_text(&mut history, &format!("item-{}", i));
        }

        let items = history.list();
        assert_eq!(items.len(), HISTORY_LIMIT);
        assert_eq!(items[0].text, "item-50");
        assert_eq!(items[49].text, "item-1");
        assert!(items.iter().all(|item| item.text != "item-0"));
    }

    #[test]
    fn test_colliding_timestamps_get_unique_ids() {
        let mut history = create_test_store(TestClock::frozen(5_000));
        let first = record_text(&mut history, "a");
        let second = record_text(&mut history, "b");
        let third = record_text(&mut history, "c");

        assert_eq!(first.id, 5_000);
        assert_eq!(second.id, 5_001);
        assert_eq!(third.id, 5_002);
        assert_eq!(third.created_at.timestamp_millis(), 5_000);
    }

    #[test]
    fn test_delete_by_id() {
        let mut history = create_test_store(TestClock::ticking(1_000));
        let first = record_text(&mut history, "first");
        record_text(&mut history, "second");

        assert!(history.delete(first.id).unwrap());

        let items = history.list();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "second");
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let mut history = create_test_store(TestClock::ticking(1_000));
        record_text(&mut history, "first");
        record_text(&mut history, "second");
        let before = history.list();

        assert!(!history.delete(42).unwrap());

        assert_eq!(history.list(), before);
    }

    #[test]
    fn test_clear() {
        let mut history = create_test_store(TestClock::ticking(1_000));
        for i in 0..10 {
            record_text(&mut history, &format!("item-{}", i));
        }

        history.clear().unwrap();

        assert!(history.list().is_empty());
        history.clear().unwrap();
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_get() {
        let mut history = create_test_store(TestClock::ticking(1_000));
        let item = record_text(&mut history, "find me");

        assert_eq!(history.get(item.id), Some(item));
        assert_eq!(history.get(7), None);
    }

    #[test]
    fn test_corrupt_history_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "[{broken").unwrap();
        let mut history = HistoryStore::with_clock(store, TestClock::ticking(1_000));

        assert!(history.list().is_empty());

        record_text(&mut history, "fresh");
        assert_eq!(history.list().len(), 1);
    }

    #[test]
    fn test_unreadable_item_is_skipped() {
        let mut history = create_test_store(TestClock::ticking(1_000));
        record_text(&mut history, "first");
        record_text(&mut history, "second");

        let mut store = history.into_inner();
        let mut value: serde_json::Value =
            serde_json::from_str(&store.get(HISTORY_KEY).unwrap()).unwrap();
        value[1]["thumbnail"] = serde_json::json!("not a data url");
        store.set(HISTORY_KEY, &value.to_string()).unwrap();

        let mut history = HistoryStore::with_clock(store, TestClock::ticking(2_000));
        let items = history.list();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "second");

        record_text(&mut history, "third");
        let texts: Vec<String> = history.list().into_iter().map(|item| item.text).collect();
        assert_eq!(texts, vec!["third", "second"]);
    }

    #[test]
    fn test_persisted_format() {
        let mut history = create_test_store(TestClock::frozen(0));
        record_text(&mut history, "123456789012");

        let json = history.into_inner().get(HISTORY_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let item = &value[0];

        assert_eq!(item["id"], 0);
        assert_eq!(item["type"], "ean13");
        assert_eq!(item["text"], "123456789012");
        assert_eq!(item["thumbnail"], "data:image/png;base64,iVBORw==");
        assert_eq!(item["timestamp"], "1970-01-01T00:00:00Z");
        assert_eq!(item["settings"]["showText"], true);
    }

    #[test]
    fn test_thumbnail_data_url() {
        let thumbnail = Thumbnail::from_data_url("data:image/png;base64,iVBORw==").unwrap();
        assert_eq!(thumbnail.as_bytes(), &[0x89, b'P', b'N', b'G']);

        assert!(Thumbnail::from_data_url("data:image/jpeg;base64,AAAA").is_err());
        assert!(Thumbnail::from_data_url("data:image/png;base64,%%%").is_err());
    }

    #[test]
    fn test_preview_text() {
        let mut history = create_test_store(TestClock::ticking(1_000));
        let short = record_text(&mut history, "short");
        let long = record_text(&mut history, &"x".repeat(31));

        assert_eq!(short.preview_text(), "short");
        assert_eq!(long.preview_text(), format!("{}...", "x".repeat(30)));
    }
}
