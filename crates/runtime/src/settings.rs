//! Settings oracle backends.

use std::collections::HashMap;
use std::path::Path;

use jrpg_core::SettingsOracle;

/// Settings loaded from a JSON object of scalar values.
///
/// A missing or unreadable file is not an error; the oracle then answers
/// every query with the caller's default.
#[derive(Clone, Debug, Default)]
pub struct JsonSettings {
    values: serde_json::Map<String, serde_json::Value>,
}

impl JsonSettings {
    pub fn load(path: &Path) -> Self {
        let values = std::fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
            .and_then(|value| value.as_object().cloned())
            .unwrap_or_else(|| {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                serde_json::Map::new()
            });
        Self { values }
    }
}

impl SettingsOracle for JsonSettings {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.values
            .get(key)
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }
}

/// Fixed settings for tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
    bools: HashMap<String, bool>,
    ints: HashMap<String, u32>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bool(mut self, key: &str, value: bool) -> Self {
        self.bools.insert(key.to_string(), value);
        self
    }

    pub fn set_u32(mut self, key: &str, value: u32) -> Self {
        self.ints.insert(key.to_string(), value);
        self
    }
}

impl SettingsOracle for MemorySettings {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.bools.get(key).copied().unwrap_or(default)
    }

    fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.ints.get(key).copied().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"fullscreen": true, "scale": 2}"#).unwrap();

        let settings = JsonSettings::load(&path);
        assert!(settings.get_bool("fullscreen", false));
        assert_eq!(settings.get_u32("scale", 1), 2);
        assert_eq!(settings.get_u32("volume", 7), 7);

        let missing = JsonSettings::load(&dir.path().join("nope.json"));
        assert!(!missing.get_bool("fullscreen", false));
    }
}
