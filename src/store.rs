use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::{app::errors::AppError, media::ExtractResult, storage::StorageManager};

pub const PREFERENCES_KEY: &str = "preferences.json";
pub const HISTORY_KEY: &str = "history.json";
pub const HISTORY_LIMIT: usize = 10;

/// Format filters and share-target behavior chosen by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub only_mp4: bool,
    #[serde(default)]
    pub only_muxed: bool,
    #[serde(default)]
    pub hide_streaming: bool,
    #[serde(default = "default_auto_analyze_on_share")]
    pub auto_analyze_on_share: bool,
}

fn default_auto_analyze_on_share() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            only_mp4: false,
            only_muxed: false,
            hide_streaming: false,
            auto_analyze_on_share: default_auto_analyze_on_share(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// unix millis
    pub at: i64,
}

impl HistoryEntry {
    pub fn from_result(url: &str, result: &ExtractResult) -> Self {
        Self {
            url: url.to_string(),
            title: result.title.clone(),
            extractor: result.extractor.clone(),
            thumbnail: result.thumbnail.clone(),
            at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Typed view over the key-value layer for preferences and recent history.
pub struct PersistentStore {
    storage: Arc<dyn StorageManager>,
    // serializes read-modify-write cycles on the history key
    history_lock: Mutex<()>,
}

impl PersistentStore {
    pub fn new(storage: Arc<dyn StorageManager>) -> Self {
        Self {
            storage,
            history_lock: Mutex::new(()),
        }
    }

    /// Missing, unreadable or malformed preferences all resolve to the defaults.
    pub fn load_preferences(&self) -> Preferences {
        if !self.storage.exists(PREFERENCES_KEY) {
            return Preferences::default();
        }

        let data = match self.storage.read(PREFERENCES_KEY) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("failed to read preferences, using defaults: {err}");
                return Preferences::default();
            }
        };

        match serde_json::from_slice::<serde_json::Value>(&data) {
            Ok(value @ serde_json::Value::Object(_)) => serde_json::from_value(value)
                .unwrap_or_else(|err| {
                    log::warn!("malformed preferences, using defaults: {err}");
                    Preferences::default()
                }),
            Ok(other) => {
                log::warn!("preferences is not an object ({other}), using defaults");
                Preferences::default()
            }
            Err(err) => {
                log::warn!("corrupt preferences, using defaults: {err}");
                Preferences::default()
            }
        }
    }

    pub fn save_preferences(&self, prefs: &Preferences) -> Result<(), AppError> {
        let data = serde_json::to_vec_pretty(prefs)?;
        self.storage.write(PREFERENCES_KEY, &data)?;
        log::debug!("preferences saved: {prefs:?}");
        Ok(())
    }

    /// Unreadable history is treated as empty.
    pub fn load_history(&self) -> Vec<HistoryEntry> {
        if !self.storage.exists(HISTORY_KEY) {
            return Vec::new();
        }

        self.storage
            .read(HISTORY_KEY)
            .map_err(|err| err.to_string())
            .and_then(|data| {
                serde_json::from_slice::<Vec<HistoryEntry>>(&data).map_err(|err| err.to_string())
            })
            .unwrap_or_else(|err| {
                log::warn!("discarding unreadable history: {err}");
                Vec::new()
            })
    }

    /// Put `entry` at the front, dropping any older entry with the same url,
    /// and keep at most [`HISTORY_LIMIT`] entries.
    pub fn push_history(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>, AppError> {
        let _guard = self.history_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut history = self.load_history();
        history.retain(|existing| existing.url != entry.url);
        history.insert(0, entry);
        history.truncate(HISTORY_LIMIT);

        self.storage
            .write(HISTORY_KEY, &serde_json::to_vec_pretty(&history)?)?;

        Ok(history)
    }

    pub fn clear_history(&self) -> Result<(), AppError> {
        let _guard = self.history_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.storage.delete(HISTORY_KEY)?;
        Ok(())
    }
}
