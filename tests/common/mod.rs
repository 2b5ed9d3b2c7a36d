#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use finance_core::{
    config::ConfigManager, core::ledger_manager::LedgerManager, storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (LedgerManager, ConfigManager) {
    let base = temp_base();
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let config = config_manager.load().expect("load default config");
    let storage = JsonStorage::new(config_manager.resolve_data_file(&config));
    let (ledger_manager, _) = LedgerManager::open(Box::new(storage)).expect("open ledger");

    (ledger_manager, config_manager)
}

pub fn balance(manager: &LedgerManager, category: &str, name: &str) -> f64 {
    manager
        .state()
        .category(category)
        .and_then(|entry| entry.account(name))
        .map(|account| account.balance)
        .expect("account exists")
}
