use std::path::PathBuf;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::services::{
    summary_service::TrendPoint, AccountService, AllocationRow, CategoryService, NewTransaction,
    ServiceResult, SettingsService, SummaryService, TotalsResult, TransactionService,
};
use crate::errors::LedgerError;
use crate::ledger::{Account, Currency, LedgerState, RulePercentages, Transaction};
use crate::storage::{LoadReport, StorageBackend};

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
    pub path: Option<PathBuf>,
    pub created: bool,
}

/// Owns the live tracker state and keeps it in step with storage.
///
/// Every mutation runs against a copy of the state, the copy is persisted,
/// and only then does it replace the live state. A failed validation or a
/// failed save leaves the live state exactly as it was.
pub struct LedgerManager {
    state: LedgerState,
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    /// Loads the persisted state from `storage`.
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<(Self, LoadMetadata), LedgerError> {
        let report = storage.load()?;
        let path = storage.location();
        let (state, metadata) = split_report(report, path);
        Ok((Self { state, storage }, metadata))
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Runs `op` on a copy of the state, persists the copy, then commits it.
    pub fn apply<T, F>(&mut self, action: &str, op: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut LedgerState) -> ServiceResult<T>,
    {
        let mut draft = self.state.clone();
        let outcome = op(&mut draft)?;
        if let Err(err) = self.storage.save(&draft) {
            tracing::error!(action, error = %err, "failed to persist change");
            return Err(err.into());
        }
        self.state = draft;
        tracing::info!(action, "change committed");
        Ok(outcome)
    }

    pub fn add_account(
        &mut self,
        category: &str,
        name: &str,
        initial_balance: f64,
        currency: Currency,
    ) -> ServiceResult<Uuid> {
        self.apply("add account", |state| {
            AccountService::add(state, category, name, initial_balance, currency)
        })
    }

    pub fn edit_balance(&mut self, category: &str, name: &str, balance: f64) -> ServiceResult<f64> {
        self.apply("edit balance", |state| {
            AccountService::edit_balance(state, category, name, balance)
        })
    }

    pub fn delete_account(&mut self, category: &str, name: &str) -> ServiceResult<Account> {
        self.apply("delete account", |state| {
            AccountService::delete(state, category, name)
        })
    }

    pub fn rename_account(
        &mut self,
        category: &str,
        old_name: &str,
        new_name: &str,
    ) -> ServiceResult<usize> {
        self.apply("rename account", |state| {
            AccountService::rename(state, category, old_name, new_name)
        })
    }

    pub fn add_category(&mut self, name: &str) -> ServiceResult<()> {
        self.apply("add category", |state| CategoryService::add(state, name))
    }

    pub fn add_transaction(&mut self, input: NewTransaction) -> ServiceResult<Uuid> {
        self.apply("add transaction", |state| {
            TransactionService::add(state, input)
        })
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> ServiceResult<Transaction> {
        self.apply("delete transaction", |state| {
            TransactionService::delete(state, id)
        })
    }

    pub fn delete_transaction_matching(
        &mut self,
        date: &str,
        account: &str,
        description: &str,
    ) -> ServiceResult<Transaction> {
        self.apply("delete transaction", |state| {
            TransactionService::delete_matching(state, date, account, description)
        })
    }

    pub fn purge_orphans(&mut self) -> ServiceResult<Vec<Transaction>> {
        self.apply("purge orphaned transactions", |state| {
            Ok(TransactionService::purge_orphans(state))
        })
    }

    pub fn update_rule_percentages(
        &mut self,
        rules: RulePercentages,
    ) -> ServiceResult<RulePercentages> {
        self.apply("update rule percentages", |state| {
            SettingsService::update_rule_percentages(state, rules)
        })
    }

    pub fn update_exchange_rate(&mut self, rate: f64) -> ServiceResult<f64> {
        self.apply("update exchange rate", |state| {
            SettingsService::update_exchange_rate(state, rate)
        })
    }

    pub fn totals(&self) -> TotalsResult {
        SummaryService::totals(&self.state)
    }

    pub fn allocation(&self) -> Vec<AllocationRow> {
        SummaryService::allocation(&self.state, &self.totals())
    }

    pub fn trend(&self, days: usize, today: NaiveDate) -> Vec<TrendPoint> {
        SummaryService::trend(&self.state, days, today)
    }
}

fn split_report(report: LoadReport, path: Option<PathBuf>) -> (LedgerState, LoadMetadata) {
    let LoadReport {
        state,
        warnings,
        migrations,
        created,
    } = report;
    for note in &migrations {
        tracing::info!(migration = %note, "upgraded stored state");
    }
    for warning in &warnings {
        tracing::warn!(%warning, "stored state needs attention");
    }
    (
        state,
        LoadMetadata {
            warnings,
            migrations,
            path,
            created,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::ServiceError;
    use crate::ledger::{TransactionKind, CASH_AND_BANK};
    use crate::storage::{JsonStorage, MemoryStorage};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn failed_save_leaves_state_untouched() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut manager, _) = LedgerManager::open(Box::new(storage.clone())).unwrap();
        storage.set_fail_saves(true);

        let err = manager
            .add_transaction(NewTransaction::new(
                "On Hand",
                TransactionKind::Income,
                10.0,
                "Gift",
            ))
            .expect_err("save must fail");
        assert!(matches!(err, ServiceError::Ledger(_)), "got {err:?}");
        assert!(err.to_string().contains("not saved"));
        assert!(manager.state().transactions.is_empty());
        assert_eq!(manager.totals().cash_bank, 0.0);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut manager, metadata) = LedgerManager::open(Box::new(storage.clone())).unwrap();
        assert!(metadata.created);

        manager.edit_balance(CASH_AND_BANK, "MM Acc", 5.0).unwrap();
        manager.add_category("Property").unwrap();
        assert_eq!(storage.save_count(), 2);
        assert_eq!(storage.snapshot().as_ref(), Some(manager.state()));
    }

    #[test]
    fn rejected_mutation_is_not_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut manager, _) = LedgerManager::open(Box::new(storage.clone())).unwrap();
        manager
            .update_exchange_rate(-1.0)
            .expect_err("negative rate");
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn reopen_from_json_sees_changes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("finance_data.json");
        let (mut manager, _) = LedgerManager::open(Box::new(JsonStorage::new(&path))).unwrap();
        manager.update_exchange_rate(310.0).unwrap();
        manager
            .add_transaction(
                NewTransaction::new("On Hand", TransactionKind::Expense, 25.0, "Tea").on("today"),
            )
            .unwrap();

        let (reopened, metadata) = LedgerManager::open(Box::new(JsonStorage::new(&path))).unwrap();
        assert!(!metadata.created);
        assert_eq!(metadata.path.as_deref(), Some(path.as_path()));
        assert_eq!(reopened.state(), manager.state());
    }
}
