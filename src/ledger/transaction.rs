use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{account::Account, rules::RuleTag};

/// A recorded change to one account's balance.
///
/// `amount` is signed (positive income, negative expense) and denominated in
/// the currency of the account it was recorded against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    pub date: String,
    pub account: String,
    pub description: String,
    pub amount: f64,
    #[serde(default, alias = "ruleCategory")]
    pub rule_category: RuleTag,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Records `amount` against `account`, stamped with the current instant.
    pub fn new(
        date: impl Into<String>,
        account: &Account,
        description: impl Into<String>,
        amount: f64,
        rule_category: RuleTag,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id: Some(account.id),
            date: date.into(),
            account: account.name.clone(),
            description: description.into(),
            amount,
            rule_category,
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn kind(&self) -> TransactionKind {
        if self.amount >= 0.0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }

    /// Matches on the fields a transaction list displays.
    pub fn matches(&self, date: &str, account: &str, description: &str) -> bool {
        self.date == date && self.account == account && self.description == description
    }
}

/// Direction of a transaction, which fixes the sign of its stored amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn signed(self, raw: f64) -> f64 {
        match self {
            TransactionKind::Income => raw.abs(),
            TransactionKind::Expense => -raw.abs(),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => f.write_str("income"),
            TransactionKind::Expense => f.write_str("expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" | "+" => Ok(TransactionKind::Income),
            "expense" | "out" | "-" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction type `{other}`")),
        }
    }
}

/// RFC 3339 on write. Offset-less ISO-8601 values from older files are read
/// as local wall-clock time.
mod timestamp_format {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(&raw, NAIVE_FORMAT)
            .map_err(|err| D::Error::custom(format!("invalid timestamp `{raw}`: {err}")))?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| D::Error::custom(format!("timestamp `{raw}` does not exist locally")))
    }
}
