use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Currency an account balance is denominated in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    #[default]
    Local,
    Foreign,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Currency::Local => "local",
            Currency::Foreign => "foreign",
        };
        f.write_str(label)
    }
}

/// Represents a named balance owned by exactly one category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub balance: f64,
    pub currency: Currency,
}

impl Account {
    /// Creates a new local-currency account with a zero balance.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance: 0.0,
            currency: Currency::Local,
        }
    }

    /// Creates a new foreign-currency account with a zero balance.
    pub fn foreign(name: impl Into<String>) -> Self {
        Self {
            currency: Currency::Foreign,
            ..Self::new(name)
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    /// Balance expressed in local currency at the given exchange rate.
    pub fn local_value(&self, exchange_rate: f64) -> f64 {
        to_local(self.currency, self.balance, exchange_rate)
    }
}

/// Converts an amount held in `currency` into local currency.
pub fn to_local(currency: Currency, amount: f64, exchange_rate: f64) -> f64 {
    match currency {
        Currency::Local => amount,
        Currency::Foreign => amount * exchange_rate,
    }
}
