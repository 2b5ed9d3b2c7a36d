use uuid::Uuid;

use crate::ledger::{Account, Category, Currency, LedgerState};

use super::{finite, required_text, ServiceError, ServiceResult};

/// CRUD over the accounts held by each category.
pub struct AccountService;

impl AccountService {
    pub fn add(
        state: &mut LedgerState,
        category: &str,
        name: &str,
        initial_balance: f64,
        currency: Currency,
    ) -> ServiceResult<Uuid> {
        let name = required_text("Account name", name)?;
        let balance = finite("Initial balance", initial_balance)?;
        let entry = Self::category_mut(state, category)?;
        if entry.contains(&name) {
            return Err(ServiceError::DuplicateAccount {
                category: entry.name.clone(),
                name,
            });
        }
        let mut account = Account::new(name).with_balance(balance);
        account.currency = currency;
        let id = account.id;
        entry.accounts.push(account);
        Ok(id)
    }

    /// Overwrites the balance directly. The transaction log is not touched.
    /// Returns the previous balance.
    pub fn edit_balance(
        state: &mut LedgerState,
        category: &str,
        name: &str,
        new_balance: f64,
    ) -> ServiceResult<f64> {
        let balance = finite("Balance", new_balance)?;
        let account = Self::account_mut(state, category, name)?;
        let previous = account.balance;
        account.balance = balance;
        Ok(previous)
    }

    /// Removes the account. Transactions recorded against it are kept as history.
    pub fn delete(state: &mut LedgerState, category: &str, name: &str) -> ServiceResult<Account> {
        let entry = Self::category_mut(state, category)?;
        let index = entry
            .position(name)
            .ok_or_else(|| Self::missing_account(category, name))?;
        Ok(entry.accounts.remove(index))
    }

    /// Renames the account in place and relabels every transaction recorded
    /// under the old name, whichever category it was recorded in. Returns the
    /// number of relabeled transactions.
    pub fn rename(
        state: &mut LedgerState,
        category: &str,
        old_name: &str,
        new_name: &str,
    ) -> ServiceResult<usize> {
        let new_name = required_text("New account name", new_name)?;
        let entry = Self::category_mut(state, category)?;
        if entry.contains(&new_name) {
            return Err(ServiceError::DuplicateAccount {
                category: entry.name.clone(),
                name: new_name,
            });
        }
        let account = entry
            .account_mut(old_name)
            .ok_or_else(|| Self::missing_account(category, old_name))?;
        account.name = new_name.clone();
        let renamed_id = account.id;

        let mut relabeled = 0;
        let mut foreign_history = 0;
        for txn in state
            .transactions
            .iter_mut()
            .filter(|txn| txn.account == old_name)
        {
            if txn.account_id.is_some_and(|id| id != renamed_id) {
                foreign_history += 1;
            }
            txn.account = new_name.clone();
            relabeled += 1;
        }
        if foreign_history > 0 {
            tracing::warn!(
                old = old_name,
                new = %new_name,
                count = foreign_history,
                "rename relabeled transactions that belong to a same-named account elsewhere"
            );
        }
        Ok(relabeled)
    }

    pub fn list(state: &LedgerState) -> Vec<(&Category, &Account)> {
        state.accounts().collect()
    }

    pub fn find<'a>(state: &'a LedgerState, category: &str, name: &str) -> Option<&'a Account> {
        state.category(category).and_then(|entry| entry.account(name))
    }

    fn category_mut<'a>(
        state: &'a mut LedgerState,
        category: &str,
    ) -> ServiceResult<&'a mut Category> {
        state
            .category_mut(category)
            .ok_or_else(|| ServiceError::NotFound(format!("Category `{category}`")))
    }

    fn account_mut<'a>(
        state: &'a mut LedgerState,
        category: &str,
        name: &str,
    ) -> ServiceResult<&'a mut Account> {
        Self::category_mut(state, category)?
            .account_mut(name)
            .ok_or_else(|| Self::missing_account(category, name))
    }

    fn missing_account(category: &str, name: &str) -> ServiceError {
        ServiceError::NotFound(format!("Account `{name}` in `{category}`"))
    }
}
