#![allow(dead_code)]

use dayflags::backup::BackupFlag;
use dayflags::notify::{ChangeNotifier, ChangeObserver};
use dayflags::storage::{DayFlagStore, StoreOptions};
use dayflags::uri::ResourceUri;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use tempfile::TempDir;

pub mod fixtures;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        dayflags::logging::init_test_logging();
    });
}

/// A store plus the collaborators it was opened with.
pub struct TestStore {
    pub store: DayFlagStore,
    pub backup: Arc<BackupFlag>,
    pub notifier: Arc<ChangeNotifier>,
}

pub fn test_store() -> TestStore {
    init_test_logging();
    let backup = Arc::new(BackupFlag::new());
    let notifier = Arc::new(ChangeNotifier::new());
    let store = DayFlagStore::open_memory(&StoreOptions::default(), notifier.clone(), backup.clone())
        .expect("Failed to create test store");
    TestStore {
        store,
        backup,
        notifier,
    }
}

pub fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join(".dayflags").join("alarm.db")
}

pub fn open_file_store(path: &Path) -> TestStore {
    init_test_logging();
    let backup = Arc::new(BackupFlag::new());
    let notifier = Arc::new(ChangeNotifier::new());
    let store = DayFlagStore::open(path, &StoreOptions::default(), notifier.clone(), backup.clone())
        .expect("Failed to open file store");
    TestStore {
        store,
        backup,
        notifier,
    }
}

pub fn test_store_with_dir() -> (TestStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = open_file_store(&db_path(&dir));
    (store, dir)
}

/// Observer that records every address it is told about.
#[derive(Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl ChangeObserver for RecordingObserver {
    fn on_change(&self, uri: &ResourceUri) {
        self.seen.lock().unwrap().push(uri.to_string());
    }
}
