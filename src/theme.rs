//! Theme options broadcast to plugins.

use serde::{Deserialize, Serialize};

use crate::prefs::{PreferenceStore, DARK_MODE_KEY, HIGH_CONTRAST_MODE_KEY};

/// Color-scheme preferences shared with every mounted plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOptions {
    pub dark_mode: bool,
    pub high_contrast_mode: bool,
}

impl ThemeOptions {
    /// Read persisted theme preferences.
    pub fn from_prefs(prefs: &dyn PreferenceStore) -> Self {
        Self {
            dark_mode: prefs.get_bool(DARK_MODE_KEY),
            high_contrast_mode: prefs.get_bool(HIGH_CONTRAST_MODE_KEY),
        }
    }

    /// Persist a dark-mode change.
    pub fn persist_dark_mode(prefs: &dyn PreferenceStore, dark_mode: bool) {
        prefs.set_bool(DARK_MODE_KEY, dark_mode);
    }

    /// Persist a high-contrast change.
    pub fn persist_high_contrast(prefs: &dyn PreferenceStore, high_contrast: bool) {
        prefs.set_bool(HIGH_CONTRAST_MODE_KEY, high_contrast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferenceStore;

    #[test]
    fn defaults_to_light_theme() {
        let prefs = MemoryPreferenceStore::new();
        assert_eq!(ThemeOptions::from_prefs(&prefs), ThemeOptions::default());
    }

    #[test]
    fn round_trips_through_prefs() {
        let prefs = MemoryPreferenceStore::new();
        ThemeOptions::persist_dark_mode(&prefs, true);
        ThemeOptions::persist_high_contrast(&prefs, true);

        let options = ThemeOptions::from_prefs(&prefs);
        assert!(options.dark_mode);
        assert!(options.high_contrast_mode);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let options = ThemeOptions {
            dark_mode: true,
            high_contrast_mode: false,
        };
        let value = serde_json::to_value(options).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "darkMode": true, "highContrastMode": false })
        );
    }
}
