use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persisted key/value configuration. The feature map values are the
/// literal string "on" for enabled codes; anything else counts as
/// disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub auto_publish: bool,
    pub author_user_id: i64,
    pub api_key: String,
    pub post_name_pattern: String,
    pub user_ids: HashMap<String, i64>,
    pub last_run: i64,
    pub features: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_publish: true,
            author_user_id: 1,
            api_key: "".to_string(),
            post_name_pattern: "%t".to_string(),
            user_ids: HashMap::new(),
            last_run: 0,
            features: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn feature_enabled(&self, file_code: &str) -> bool {
        matches!(self.features.get(file_code), Some(value) if value == "on")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct StoreError {
    pub msg: String,
}

/// JSON-file backed store. No locking and no transactional guarantee;
/// concurrent writers can lose updates.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SettingsStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// A missing file yields the defaults, so a fresh install works
    /// without a setup step.
    pub fn load(&self) -> Result<Settings, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(err) => {
                let msg = format!("failed to read {}: {err:?}", self.path.display());

                return Err(StoreError { msg });
            }
        };

        serde_json::from_str(&data).map_err(|err| {
            let msg = format!("failed to parse {}: {err:?}", self.path.display());

            StoreError { msg }
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(settings).map_err(|err| StoreError {
            msg: format!("failed to serialize settings: {err:?}"),
        })?;

        fs::write(&self.path, data).map_err(|err| StoreError {
            msg: format!("failed to write {}: {err:?}", self.path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, SettingsStore};
    use tempfile::tempdir;

    #[test]
    fn it_returns_defaults_when_the_file_is_missing() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        let settings = store.load().unwrap();

        assert!(settings.auto_publish);
        assert_eq!(settings.author_user_id, 1);
        assert_eq!(settings.api_key, "");
        assert_eq!(settings.post_name_pattern, "%t");
        assert_eq!(settings.last_run, 0);
        assert!(settings.user_ids.is_empty());
        assert!(settings.features.is_empty());
    }

    #[test]
    fn it_round_trips_settings() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        let mut settings = Settings::default();
        settings.api_key = "deadbeef".to_string();
        settings.user_ids.insert("ab12".to_string(), 7);
        settings.features.insert("ab12".to_string(), "on".to_string());
        settings.last_run = 1_700_000_000;

        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn feature_enabled_requires_the_literal_on() {
        let mut settings = Settings::default();
        settings.features.insert("ab12".to_string(), "on".to_string());
        settings.features.insert("cd34".to_string(), "true".to_string());

        assert!(settings.feature_enabled("ab12"));
        assert!(!settings.feature_enabled("cd34"));
        assert!(!settings.feature_enabled("zz99"));
    }
}
