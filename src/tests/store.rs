use std::sync::Arc;

use crate::storage::{BackendLocal, StorageManager};
use crate::store::{
    HistoryEntry, PersistentStore, Preferences, HISTORY_KEY, HISTORY_LIMIT, PREFERENCES_KEY,
};

pub fn create_store() -> (PersistentStore, Arc<BackendLocal>, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(BackendLocal::new(tmp_dir.path()).unwrap());
    (PersistentStore::new(storage.clone()), storage, tmp_dir)
}

fn entry(url: &str, title: &str, at: i64) -> HistoryEntry {
    HistoryEntry {
        url: url.to_string(),
        title: Some(title.to_string()),
        extractor: Some("generic".to_string()),
        thumbnail: None,
        at,
    }
}

#[test]
fn test_missing_preferences_use_defaults() {
    let (store, _storage, _tmp_dir) = create_store();

    let prefs = store.load_preferences();
    assert_eq!(prefs, Preferences::default());
    assert!(!prefs.only_mp4);
    assert!(!prefs.only_muxed);
    assert!(!prefs.hide_streaming);
    assert!(prefs.auto_analyze_on_share);
}

#[test]
fn test_unusable_preferences_use_defaults() {
    let (store, storage, _tmp_dir) = create_store();

    for blob in ["{not json", "[1,2]", "42", "null", "{\"only_mp4\": \"yes\"}"] {
        storage.write(PREFERENCES_KEY, blob.as_bytes()).unwrap();
        assert_eq!(store.load_preferences(), Preferences::default(), "{blob}");
    }
}

#[test]
fn test_partial_preferences_keep_defaults() {
    let (store, storage, _tmp_dir) = create_store();

    storage
        .write(PREFERENCES_KEY, br#"{"only_muxed": true, "theme": "dark"}"#)
        .unwrap();

    assert_eq!(
        store.load_preferences(),
        Preferences {
            only_muxed: true,
            ..Default::default()
        }
    );
}

#[test]
fn test_preferences_round_trip() {
    let (store, _storage, _tmp_dir) = create_store();

    let prefs = Preferences {
        only_mp4: true,
        only_muxed: false,
        hide_streaming: true,
        auto_analyze_on_share: false,
    };
    store.save_preferences(&prefs).unwrap();

    assert_eq!(store.load_preferences(), prefs);
}

#[test]
fn test_history_moves_repeated_url_to_front() {
    let (store, _storage, _tmp_dir) = create_store();

    store.push_history(entry("https://a.example/", "a", 1)).unwrap();
    store.push_history(entry("https://b.example/", "b", 2)).unwrap();
    let history = store
        .push_history(entry("https://a.example/", "a again", 3))
        .unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].url, "https://a.example/");
    assert_eq!(history[0].title.as_deref(), Some("a again"));
    assert_eq!(history[1].url, "https://b.example/");
    assert_eq!(store.load_history(), history);
}

#[test]
fn test_history_is_capped() {
    let (store, _storage, _tmp_dir) = create_store();

    for i in 0..=HISTORY_LIMIT {
        store
            .push_history(entry(&format!("https://example.com/{i}"), "t", i as i64))
            .unwrap();
    }

    let history = store.load_history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(
        history[0].url,
        format!("https://example.com/{HISTORY_LIMIT}")
    );
    // the oldest entry is the one evicted
    assert!(history.iter().all(|e| e.url != "https://example.com/0"));
}

#[test]
fn test_store_survives_reopen() {
    let (store, _storage, tmp_dir) = create_store();

    let prefs = Preferences {
        hide_streaming: true,
        ..Default::default()
    };
    store.save_preferences(&prefs).unwrap();
    store.push_history(entry("https://a.example/", "a", 1)).unwrap();
    drop(store);

    let reopened = PersistentStore::new(Arc::new(BackendLocal::new(tmp_dir.path()).unwrap()));
    assert_eq!(reopened.load_preferences(), prefs);
    assert_eq!(reopened.load_history(), vec![entry("https://a.example/", "a", 1)]);
}

#[test]
fn test_corrupt_history_reads_as_empty() {
    let (store, storage, _tmp_dir) = create_store();

    storage.write(HISTORY_KEY, b"{\"url\": 1}").unwrap();
    assert!(store.load_history().is_empty());

    // and the next push starts over
    let history = store.push_history(entry("https://a.example/", "a", 1)).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn test_clear_history() {
    let (store, storage, _tmp_dir) = create_store();

    store.push_history(entry("https://a.example/", "a", 1)).unwrap();
    assert!(storage.exists(HISTORY_KEY));

    store.clear_history().unwrap();
    assert!(!storage.exists(HISTORY_KEY));
    assert!(store.load_history().is_empty());

    // clearing twice is fine
    store.clear_history().unwrap();
}
