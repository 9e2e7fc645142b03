//! Persisted local settings.
//!
//! A small file-backed key-value store for state that survives restarts:
//! refresh interval, dark mode, active theme, per-group collapse flags,
//! and stored credentials. Every read re-validates the stored value;
//! anything tampered with or corrupt is silently reset to its default
//! (or deleted, for credentials) rather than surfaced as an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Allowed refresh intervals, in seconds.
pub const REFRESH_INTERVALS: &[u64] = &[10, 30, 60, 120, 300, 600];

/// Interval applied when the stored value is missing or invalid.
pub const DEFAULT_REFRESH_INTERVAL: u64 = 300;

const KEY_REFRESH_INTERVAL: &str = "refresh-interval";
const KEY_DARK_MODE: &str = "dark-mode";
const KEY_THEME: &str = "theme";
const KEY_COLLAPSED_GROUPS: &str = "collapsed-groups";
const KEY_AUTH: &str = "auth";

/// Stored Basic-auth credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAuth {
    pub username: String,
    /// Base64-encoded `username:password` token, used verbatim in the
    /// Authorization header.
    pub credentials: String,
}

/// File-backed settings store.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SettingsStore {
    /// Load settings from the given file.
    ///
    /// A missing or unparseable file yields an empty store; defaults are
    /// applied lazily on read.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => map,
                Ok(_) | Err(_) => {
                    warn!(path = %path.display(), "settings file is not a JSON object, starting fresh");
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        };
        Self { path, values }
    }

    /// Persist the current values. Failures are logged and swallowed;
    /// losing a preference write is not worth interrupting the UI for.
    fn save(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&Value::Object(self.values.clone())) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    warn!(path = %self.path.display(), error = %e, "failed to write settings");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize settings"),
        }
    }

    /// The refresh interval in seconds, always a member of
    /// [`REFRESH_INTERVALS`]. A stored value outside the allow-list is
    /// reset to [`DEFAULT_REFRESH_INTERVAL`] and written back.
    pub fn refresh_interval(&mut self) -> u64 {
        if let Some(secs) = self
            .values
            .get(KEY_REFRESH_INTERVAL)
            .and_then(Value::as_u64)
        {
            if REFRESH_INTERVALS.contains(&secs) {
                return secs;
            }
        }
        self.set_refresh_interval(DEFAULT_REFRESH_INTERVAL);
        DEFAULT_REFRESH_INTERVAL
    }

    /// Store a refresh interval; values outside the allow-list fall back
    /// to the default.
    pub fn set_refresh_interval(&mut self, secs: u64) {
        let secs = if REFRESH_INTERVALS.contains(&secs) {
            secs
        } else {
            DEFAULT_REFRESH_INTERVAL
        };
        self.values
            .insert(KEY_REFRESH_INTERVAL.to_string(), Value::from(secs));
        self.save();
    }

    pub fn dark_mode(&self) -> bool {
        self.values
            .get(KEY_DARK_MODE)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.values
            .insert(KEY_DARK_MODE.to_string(), Value::from(enabled));
        self.save();
    }

    /// The stored theme name, if any. Validation against the known theme
    /// set happens at resolution time, so an unknown name stored here
    /// simply resolves to the default theme.
    pub fn theme_name(&self) -> Option<&str> {
        self.values.get(KEY_THEME).and_then(Value::as_str)
    }

    pub fn set_theme_name(&mut self, name: &str) {
        self.values
            .insert(KEY_THEME.to_string(), Value::from(name));
        self.save();
    }

    pub fn is_group_collapsed(&self, group: &str) -> bool {
        self.values
            .get(KEY_COLLAPSED_GROUPS)
            .and_then(Value::as_object)
            .and_then(|map| map.get(group))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_group_collapsed(&mut self, group: &str, collapsed: bool) {
        let map = self
            .values
            .entry(KEY_COLLAPSED_GROUPS.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !map.is_object() {
            // Tampered value; replace it wholesale
            *map = Value::Object(Map::new());
        }
        if let Some(map) = map.as_object_mut() {
            map.insert(group.to_string(), Value::from(collapsed));
        }
        self.save();
    }

    /// Stored credentials, if present and well-formed. A corrupt entry is
    /// deleted rather than surfaced.
    pub fn auth(&mut self) -> Option<StoredAuth> {
        let value = self.values.get(KEY_AUTH)?.clone();
        match serde_json::from_value::<StoredAuth>(value) {
            Ok(auth) if !auth.credentials.is_empty() => Some(auth),
            _ => {
                self.values.remove(KEY_AUTH);
                self.save();
                None
            }
        }
    }

    pub fn set_auth(&mut self, auth: &StoredAuth) {
        if let Ok(value) = serde_json::to_value(auth) {
            self.values.insert(KEY_AUTH.to_string(), value);
            self.save();
        }
    }

    pub fn clear_auth(&mut self) {
        if self.values.remove(KEY_AUTH).is_some() {
            self.save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::load(dir.path().join("settings.json"))
    }

    #[test]
    fn test_defaults_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert_eq!(store.refresh_interval(), DEFAULT_REFRESH_INTERVAL);
        assert!(store.dark_mode());
        assert!(store.theme_name().is_none());
        assert!(!store.is_group_collapsed("core"));
        assert!(store.auth().is_none());
    }

    #[test]
    fn test_refresh_interval_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::load(&path);
        store.set_refresh_interval(60);

        let mut reloaded = SettingsStore::load(&path);
        assert_eq!(reloaded.refresh_interval(), 60);
    }

    #[test]
    fn test_tampered_refresh_interval_resets_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "refresh-interval": 42 }"#).unwrap();

        let mut store = SettingsStore::load(&path);
        assert_eq!(store.refresh_interval(), 300);

        // The reset is persisted
        let mut reloaded = SettingsStore::load(&path);
        assert_eq!(reloaded.refresh_interval(), 300);
    }

    #[test]
    fn test_non_numeric_refresh_interval_resets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "refresh-interval": "soon" }"#).unwrap();

        let mut store = SettingsStore::load(&path);
        assert_eq!(store.refresh_interval(), 300);
    }

    #[test]
    fn test_collapsed_groups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::load(&path);
        store.set_group_collapsed("core", true);
        assert!(store.is_group_collapsed("core"));
        assert!(!store.is_group_collapsed("edge"));

        let reloaded = SettingsStore::load(&path);
        assert!(reloaded.is_group_collapsed("core"));
    }

    #[test]
    fn test_corrupt_auth_is_deleted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "auth": { "username": 12 } }"#).unwrap();

        let mut store = SettingsStore::load(&path);
        assert!(store.auth().is_none());

        // Deleted, not just ignored
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("auth"));
    }

    #[test]
    fn test_auth_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::load(&path);
        store.set_auth(&StoredAuth {
            username: "admin".to_string(),
            credentials: "YWRtaW46aHVudGVyMg==".to_string(),
        });

        let mut reloaded = SettingsStore::load(&path);
        let auth = reloaded.auth().unwrap();
        assert_eq!(auth.username, "admin");
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        let mut store = SettingsStore::load(&path);
        assert_eq!(store.refresh_interval(), DEFAULT_REFRESH_INTERVAL);
    }
}
