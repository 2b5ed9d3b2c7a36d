pub mod document;
pub mod json_backend;
pub mod memory;

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::Arc,
};

use crate::{errors::LedgerError, ledger::LedgerState};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over persistence backends capable of storing the tracker state.
pub trait StorageBackend: Send + Sync {
    /// Reads the persisted state, falling back to the seeded default when none exists.
    fn load(&self) -> Result<LoadReport>;
    /// Replaces the persisted state with `state`.
    fn save(&self, state: &LedgerState) -> Result<()>;
    /// Where the state lives, if it lives on disk.
    fn location(&self) -> Option<PathBuf> {
        None
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn load(&self) -> Result<LoadReport> {
        (**self).load()
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        (**self).save(state)
    }

    fn location(&self) -> Option<PathBuf> {
        (**self).location()
    }
}

/// Outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub state: LedgerState,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
    /// True when nothing was persisted yet and defaults were used.
    pub created: bool,
}

impl LoadReport {
    pub fn new(state: LedgerState, migrations: Vec<String>, created: bool) -> Self {
        let warnings = ledger_warnings(&state);
        Self {
            state,
            warnings,
            migrations,
            created,
        }
    }
}

pub use document::LedgerDocument;
pub use json_backend::{JsonStorage, DEFAULT_DATA_FILE};
pub use memory::MemoryStorage;

/// Detects dangling references and other anomalies within a state snapshot.
pub fn ledger_warnings(state: &LedgerState) -> Vec<String> {
    let mut warnings = Vec::new();

    if !state.exchange_rate.is_finite() || state.exchange_rate <= 0.0 {
        warnings.push(format!(
            "exchange rate {} is not a positive number",
            state.exchange_rate
        ));
    }
    if !state.rule_percentages.totals_hundred() {
        warnings.push(format!(
            "rule percentages {} add up to {} instead of 100",
            state.rule_percentages,
            state.rule_percentages.sum()
        ));
    }

    let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();
    for (category, account) in state.accounts() {
        owners
            .entry(account.name.as_str())
            .or_default()
            .push(category.name.as_str());
    }
    let mut shared: Vec<_> = owners
        .into_iter()
        .filter(|(_, categories)| categories.len() > 1)
        .collect();
    shared.sort_by(|a, b| a.0.cmp(b.0));
    for (name, categories) in shared {
        warnings.push(format!(
            "account `{}` exists in several categories: {}",
            name,
            categories.join(", ")
        ));
    }

    let mut seen_ids = HashSet::new();
    for txn in &state.transactions {
        if !seen_ids.insert(txn.id) {
            warnings.push(format!("transaction id {} is used more than once", txn.id));
        }
        if state.locate_transaction_account(txn).is_none() {
            warnings.push(format!(
                "transaction {} references unknown account `{}`",
                txn.id, txn.account
            ));
        }
    }
    warnings
}
