//! Persistent key-value settings, read-only from the engine's perspective.

/// Access to user settings such as screen size or map rendering toggles.
pub trait SettingsOracle {
    /// Returns a boolean setting, or `default` when unset.
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// Returns an integer setting, or `default` when unset.
    fn get_u32(&self, key: &str, default: u32) -> u32;
}
