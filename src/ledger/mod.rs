//! Tracker domain models and persistence-friendly types.

pub mod account;
pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod rules;
pub mod transaction;

pub use account::{Account, Currency};
pub use category::{
    Category, CASH_AND_BANK, CRYPTO_AND_INVESTMENTS, LEGACY_FOREIGN_ACCOUNT, UPCOMING,
};
pub use ledger::{AccountLocation, LedgerState, CURRENT_SCHEMA_VERSION, DEFAULT_EXCHANGE_RATE};
pub use rules::{Bucket, RulePercentages, RuleTag};
pub use transaction::{Transaction, TransactionKind};
