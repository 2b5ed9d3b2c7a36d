use serde::Serialize;

use super::account::Account;

pub const CASH_AND_BANK: &str = "Cash & Bank";
pub const CRYPTO_AND_INVESTMENTS: &str = "Crypto & Investments";
pub const UPCOMING: &str = "Upcoming";

/// Name of the investment account that older state files hold in foreign currency.
pub const LEGACY_FOREIGN_ACCOUNT: &str = "Crypto $";

/// Groups accounts under a display name. Account order is preserved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Category {
    pub name: String,
    pub accounts: Vec<Account>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accounts: Vec::new(),
        }
    }

    pub fn with_accounts(name: impl Into<String>, accounts: Vec<Account>) -> Self {
        Self {
            name: name.into(),
            accounts,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.accounts.iter().position(|account| account.name == name)
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.name == name)
    }

    pub fn account_mut(&mut self, name: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.name == name)
    }

    /// Sum of all balances converted to local currency.
    pub fn local_total(&self, exchange_rate: f64) -> f64 {
        self.accounts
            .iter()
            .map(|account| account.local_value(exchange_rate))
            .sum()
    }
}
