use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use crate::{errors::LedgerError, ledger::LedgerState};

use super::{LoadReport, Result, StorageBackend};

/// Keeps the persisted state in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    stored: Mutex<Option<LedgerState>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LedgerState) -> Self {
        Self {
            stored: Mutex::new(Some(state)),
            ..Self::default()
        }
    }

    /// Makes every subsequent save fail until switched off again.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Option<LedgerState> {
        self.stored.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<LoadReport> {
        let guard = self
            .stored
            .lock()
            .map_err(|_| LedgerError::Persistence("memory storage lock poisoned".into()))?;
        Ok(match guard.as_ref() {
            Some(state) => LoadReport::new(state.clone(), Vec::new(), false),
            None => LoadReport::new(LedgerState::default(), Vec::new(), true),
        })
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence(
                "memory storage is rejecting writes".into(),
            ));
        }
        let mut guard = self
            .stored
            .lock()
            .map_err(|_| LedgerError::Persistence("memory storage lock poisoned".into()))?;
        *guard = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
