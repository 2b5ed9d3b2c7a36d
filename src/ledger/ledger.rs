use uuid::Uuid;

use super::{
    account::Account,
    category::{Category, CASH_AND_BANK, CRYPTO_AND_INVESTMENTS, LEGACY_FOREIGN_ACCOUNT, UPCOMING},
    rules::RulePercentages,
    transaction::Transaction,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;
pub const DEFAULT_EXCHANGE_RATE: f64 = 290.0;

const SEEDED_CASH_ACCOUNTS: [&str; 5] = [
    "Com Bank Main Acc",
    "MM Acc",
    "Boc Bank Main Acc",
    "Sampath Acc",
    "On Hand",
];
const SEEDED_INVESTMENT_ACCOUNTS: [&str; 4] = ["CAL", "CSE", "Ez Cash", "Paynoree Skrill"];

/// Position of an account inside [`LedgerState::categories`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountLocation {
    pub category: usize,
    pub account: usize,
}

/// Complete tracker state: settings, categorized balances and the transaction log.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerState {
    /// Local currency units per unit of foreign currency.
    pub exchange_rate: f64,
    pub rule_percentages: RulePercentages,
    pub categories: Vec<Category>,
    /// Stored oldest first.
    pub transactions: Vec<Transaction>,
}

impl Default for LedgerState {
    fn default() -> Self {
        let cash = SEEDED_CASH_ACCOUNTS.iter().map(|name| Account::new(*name)).collect();
        let mut investments = vec![Account::foreign(LEGACY_FOREIGN_ACCOUNT)];
        investments.extend(SEEDED_INVESTMENT_ACCOUNTS.iter().map(|name| Account::new(*name)));
        Self {
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            rule_percentages: RulePercentages::default(),
            categories: vec![
                Category::with_accounts(CASH_AND_BANK, cash),
                Category::with_accounts(CRYPTO_AND_INVESTMENTS, investments),
                Category::new(UPCOMING),
            ],
            transactions: Vec::new(),
        }
    }
}

impl LedgerState {
    /// State without any categories, accounts or transactions.
    pub fn empty() -> Self {
        Self {
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            rule_percentages: RulePercentages::default(),
            categories: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories
            .iter_mut()
            .find(|category| category.name == name)
    }

    /// Finds the first account called `name`, scanning categories in order.
    pub fn resolve_account(&self, name: &str) -> Option<AccountLocation> {
        self.categories
            .iter()
            .enumerate()
            .find_map(|(category, entry)| {
                entry
                    .position(name)
                    .map(|account| AccountLocation { category, account })
            })
    }

    pub fn locate_account_id(&self, id: Uuid) -> Option<AccountLocation> {
        self.categories
            .iter()
            .enumerate()
            .find_map(|(category, entry)| {
                entry
                    .accounts
                    .iter()
                    .position(|account| account.id == id)
                    .map(|account| AccountLocation { category, account })
            })
    }

    /// Resolves the account a transaction belongs to, preferring its stored id.
    pub fn locate_transaction_account(&self, transaction: &Transaction) -> Option<AccountLocation> {
        transaction
            .account_id
            .and_then(|id| self.locate_account_id(id))
            .or_else(|| self.resolve_account(&transaction.account))
    }

    pub fn account_at(&self, location: AccountLocation) -> Option<&Account> {
        self.categories
            .get(location.category)
            .and_then(|category| category.accounts.get(location.account))
    }

    pub fn account_at_mut(&mut self, location: AccountLocation) -> Option<&mut Account> {
        self.categories
            .get_mut(location.category)
            .and_then(|category| category.accounts.get_mut(location.account))
    }

    /// Iterates `(category, account)` pairs in display order.
    pub fn accounts(&self) -> impl Iterator<Item = (&Category, &Account)> {
        self.categories.iter().flat_map(|category| {
            category
                .accounts
                .iter()
                .map(move |account| (category, account))
        })
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        Some(self.transactions.remove(index))
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{account::Currency, rules::RuleTag};

    #[test]
    fn default_state_is_seeded() {
        let state = LedgerState::default();
        let names: Vec<_> = state.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![CASH_AND_BANK, CRYPTO_AND_INVESTMENTS, UPCOMING]);
        assert_eq!(state.categories[0].accounts.len(), 5);
        assert!(state.categories[2].accounts.is_empty());
        assert!(state.accounts().all(|(_, account)| account.balance == 0.0));
        let crypto = state
            .category(CRYPTO_AND_INVESTMENTS)
            .and_then(|c| c.account(LEGACY_FOREIGN_ACCOUNT))
            .expect("foreign account seeded");
        assert_eq!(crypto.currency, Currency::Foreign);
        assert_eq!(state.exchange_rate, DEFAULT_EXCHANGE_RATE);
    }

    #[test]
    fn resolve_account_prefers_first_category() {
        let mut state = LedgerState::default();
        state
            .category_mut(UPCOMING)
            .unwrap()
            .accounts
            .push(Account::new("On Hand"));
        let location = state.resolve_account("On Hand").expect("resolves");
        assert_eq!(location.category, 0);
    }

    #[test]
    fn transaction_lookup_prefers_account_id() {
        let mut state = LedgerState::default();
        let upcoming_account = Account::new("On Hand");
        let txn = Transaction::new("today", &upcoming_account, "Bonus", 10.0, RuleTag::None);
        state
            .category_mut(UPCOMING)
            .unwrap()
            .accounts
            .push(upcoming_account);
        let location = state.locate_transaction_account(&txn).expect("resolves");
        assert_eq!(location.category, 2);
    }
}
