/// Last-used display settings, persisted as a single record
use crate::error::Result;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

pub const PREFERENCES_KEY: &str = "barcodePreferences";
pub const DARK_MODE_KEY: &str = "darkMode";

pub const DEFAULT_SCALE: f64 = 3.0;
pub const DEFAULT_FG_COLOR: &str = "#000000";
pub const DEFAULT_BG_COLOR: &str = "#FFFFFF";

/// How a barcode is drawn. Missing fields in stored JSON take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub scale: f64,
    pub show_text: bool,
    pub fg_color: String,
    pub bg_color: String,
}

impl DisplaySettings {
    /// Clamp values the renderer cannot use back to defaults
    pub fn sanitized(mut self) -> Self {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            self.scale = DEFAULT_SCALE;
        }
        if self.fg_color.is_empty() {
            self.fg_color = DEFAULT_FG_COLOR.to_string();
        }
        if self.bg_color.is_empty() {
            self.bg_color = DEFAULT_BG_COLOR.to_string();
        }
        self
    }

    /// Parse the scale slider's value; anything unusable means the default
    pub fn parse_scale(input: &str) -> f64 {
        match input.trim().parse::<f64>() {
            Ok(scale) if scale.is_finite() && scale > 0.0 => scale,
            _ => DEFAULT_SCALE,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            scale: DEFAULT_SCALE,
            show_text: true,
            fg_color: DEFAULT_FG_COLOR.to_string(),
            bg_color: DEFAULT_BG_COLOR.to_string(),
        }
    }
}

/// Sole writer of the preferences slot
pub struct PreferencesStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferencesStore<S> {
    pub fn new(store: S) -> Self {
        PreferencesStore { store }
    }

    pub fn save(&mut self, settings: &DisplaySettings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.store.set(PREFERENCES_KEY, &json)?;
        log::debug!("Saved display settings: {:?}", settings);
        Ok(())
    }

    /// Last saved settings, or defaults if none were saved or the slot is unreadable
    pub fn load(&self) -> DisplaySettings {
        let Some(json) = self.store.get(PREFERENCES_KEY) else {
            return DisplaySettings::default();
        };

        match serde_json::from_str::<DisplaySettings>(&json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring unreadable preferences: {}", e);
                DisplaySettings::default()
            }
        }
    }

    pub fn save_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.store
            .set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }

    pub fn load_dark_mode(&self) -> bool {
        self.store.get(DARK_MODE_KEY).as_deref() == Some("true")
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
