//! On-disk layout of the tracker state.
//!
//! Categories are written as an ordered JSON object of account name to
//! account record. Files produced by earlier versions store bare numbers
//! instead of records; those are upgraded while loading.

use std::{fmt, marker::PhantomData};

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use uuid::Uuid;

use crate::ledger::{
    Account, Category, Currency, LedgerState, RulePercentages, Transaction,
    CRYPTO_AND_INVESTMENTS, CURRENT_SCHEMA_VERSION, DEFAULT_EXCHANGE_RATE,
    LEGACY_FOREIGN_ACCOUNT,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub schema_version: u8,
    #[serde(default = "default_exchange_rate", alias = "exchangeRate")]
    pub exchange_rate: f64,
    #[serde(default, alias = "rulePercentages")]
    pub rule_percentages: RulePercentages,
    pub categories: OrderedMap<OrderedMap<AccountEntry>>,
    #[serde(default)]
    pub transactions: Vec<TransactionEntry>,
}

fn default_exchange_rate() -> f64 {
    DEFAULT_EXCHANGE_RATE
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountEntry {
    Record(AccountRecord),
    Balance(f64),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: Uuid,
    pub balance: f64,
    #[serde(default)]
    pub currency: Currency,
}

/// Stored transaction. Records written before ids existed carry none.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionEntry {
    #[serde(default, skip_serializing)]
    id: Option<Uuid>,
    #[serde(flatten)]
    pub transaction: Transaction,
}

impl From<&Transaction> for TransactionEntry {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: Some(transaction.id),
            transaction: transaction.clone(),
        }
    }
}

impl LedgerDocument {
    pub fn from_state(state: &LedgerState) -> Self {
        let categories = state
            .categories
            .iter()
            .map(|category| {
                let accounts = category
                    .accounts
                    .iter()
                    .map(|account| {
                        let record = AccountRecord {
                            id: account.id,
                            balance: account.balance,
                            currency: account.currency,
                        };
                        (account.name.clone(), AccountEntry::Record(record))
                    })
                    .collect();
                (category.name.clone(), OrderedMap(accounts))
            })
            .collect();
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            exchange_rate: state.exchange_rate,
            rule_percentages: state.rule_percentages,
            categories: OrderedMap(categories),
            transactions: state.transactions.iter().map(TransactionEntry::from).collect(),
        }
    }

    /// Converts into live state, returning notes for every upgrade applied.
    pub fn into_state(self) -> (LedgerState, Vec<String>) {
        let mut migrations = Vec::new();
        if self.schema_version < CURRENT_SCHEMA_VERSION {
            migrations.push(format!(
                "upgraded schema v{} to v{}",
                self.schema_version, CURRENT_SCHEMA_VERSION
            ));
        }

        let mut categories = Vec::with_capacity(self.categories.0.len());
        let mut upgraded_accounts = 0usize;
        for (category_name, accounts) in self.categories.0 {
            let mut category = Category::new(category_name);
            for (account_name, entry) in accounts.0 {
                let account = match entry {
                    AccountEntry::Record(record) => Account {
                        id: record.id,
                        name: account_name,
                        balance: record.balance,
                        currency: record.currency,
                    },
                    AccountEntry::Balance(balance) => {
                        upgraded_accounts += 1;
                        let legacy_foreign = category.name == CRYPTO_AND_INVESTMENTS
                            && account_name == LEGACY_FOREIGN_ACCOUNT;
                        if legacy_foreign {
                            migrations.push(format!(
                                "marked `{}` in `{}` as foreign currency",
                                account_name, category.name
                            ));
                            Account::foreign(account_name).with_balance(balance)
                        } else {
                            Account::new(account_name).with_balance(balance)
                        }
                    }
                };
                // Later keys replace earlier ones, matching JSON object semantics.
                match category.position(&account.name) {
                    Some(index) => category.accounts[index] = account,
                    None => category.accounts.push(account),
                }
            }
            categories.push(category);
        }
        if upgraded_accounts > 0 {
            migrations.push(format!(
                "assigned ids to {upgraded_accounts} account(s) stored as bare balances"
            ));
        }

        let mut upgraded_transactions = 0usize;
        let transactions = self
            .transactions
            .into_iter()
            .map(|entry| {
                let mut transaction = entry.transaction;
                match entry.id {
                    Some(id) => transaction.id = id,
                    None => upgraded_transactions += 1,
                }
                transaction
            })
            .collect();
        if upgraded_transactions > 0 {
            migrations.push(format!(
                "assigned ids to {upgraded_transactions} transaction(s) stored without one"
            ));
        }

        let state = LedgerState {
            exchange_rate: self.exchange_rate,
            rule_percentages: self.rule_percentages,
            categories,
            transactions,
        };
        (state, migrations)
    }
}

/// JSON object that keeps its key order.
#[derive(Debug, Default)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, value)))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            entries.push((key, value));
        }
        Ok(OrderedMap(entries))
    }
}
