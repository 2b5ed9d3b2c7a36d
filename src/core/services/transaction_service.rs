//! Business logic for recording and reversing transactions.

use chrono::Local;
use uuid::Uuid;

use crate::ledger::{LedgerState, RuleTag, Transaction, TransactionKind};

use super::{required_text, ServiceError, ServiceResult};

/// Display format used when no date is supplied.
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// Input for [`TransactionService::add`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Free-form display date; not parsed.
    pub date: String,
    pub account: String,
    pub description: String,
    /// Magnitude; the sign comes from `kind`.
    pub amount: f64,
    pub kind: TransactionKind,
    pub rule_category: RuleTag,
}

impl NewTransaction {
    pub fn new(
        account: impl Into<String>,
        kind: TransactionKind,
        amount: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: Local::now().format(DISPLAY_DATE_FORMAT).to_string(),
            account: account.into(),
            description: description.into(),
            amount,
            kind,
            rule_category: RuleTag::None,
        }
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn tagged(mut self, rule_category: RuleTag) -> Self {
        self.rule_category = rule_category;
        self
    }
}

/// Applies and reverses transactions against account balances.
pub struct TransactionService;

impl TransactionService {
    /// Records the transaction and applies it to the owning account's balance.
    pub fn add(state: &mut LedgerState, input: NewTransaction) -> ServiceResult<Uuid> {
        let account_name = required_text("Account", &input.account)?;
        let description = required_text("Description", &input.description)?;
        let raw = validate_amount(input.amount)?;
        let location = state
            .resolve_account(&account_name)
            .ok_or_else(|| ServiceError::AccountNotFound(account_name.clone()))?;
        let amount = input.kind.signed(raw);

        let account = state
            .account_at_mut(location)
            .ok_or_else(|| ServiceError::AccountNotFound(account_name.clone()))?;
        account.balance += amount;
        let transaction = Transaction::new(
            input.date.trim(),
            account,
            description,
            amount,
            input.rule_category,
        );
        Ok(state.add_transaction(transaction))
    }

    /// Removes the transaction identified by `id` and reverses its balance effect.
    pub fn delete(state: &mut LedgerState, id: Uuid) -> ServiceResult<Transaction> {
        let txn = state
            .transaction(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Transaction {id}")))?;
        let location = state
            .locate_transaction_account(txn)
            .ok_or_else(|| ServiceError::AccountNotFound(txn.account.clone()))?;
        let amount = txn.amount;
        if let Some(account) = state.account_at_mut(location) {
            account.balance -= amount;
        }
        state
            .remove_transaction(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Transaction {id}")))
    }

    /// Deletes the newest transaction showing the given date, account and description.
    pub fn delete_matching(
        state: &mut LedgerState,
        date: &str,
        account: &str,
        description: &str,
    ) -> ServiceResult<Transaction> {
        let id = state
            .transactions
            .iter()
            .rev()
            .find(|txn| txn.matches(date, account, description))
            .map(|txn| txn.id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Transaction `{description}` on {date} for `{account}`"
                ))
            })?;
        Self::delete(state, id)
    }

    /// Drops transactions whose account no longer exists. Balances are untouched.
    pub fn purge_orphans(state: &mut LedgerState) -> Vec<Transaction> {
        let (kept, orphaned): (Vec<_>, Vec<_>) = std::mem::take(&mut state.transactions)
            .into_iter()
            .partition(|txn| state.locate_transaction_account(txn).is_some());
        state.transactions = kept;
        orphaned
    }

    /// Transactions in display order, newest first.
    pub fn list(state: &LedgerState) -> Vec<&Transaction> {
        state.transactions.iter().rev().collect()
    }

    /// Finds a transaction by full id or by an unambiguous id prefix.
    pub fn find_by_prefix<'a>(state: &'a LedgerState, prefix: &str) -> ServiceResult<&'a Transaction> {
        let needle = prefix.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(ServiceError::Validation("transaction id must not be empty".into()));
        }
        let mut matches = state
            .transactions
            .iter()
            .filter(|txn| txn.id.to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(txn),
            (None, _) => Err(ServiceError::NotFound(format!("Transaction {prefix}"))),
            (Some(_), Some(_)) => Err(ServiceError::Validation(format!(
                "transaction id prefix `{prefix}` is ambiguous"
            ))),
        }
    }
}

/// Parses a user-entered amount, accepting thousands separators.
pub fn parse_amount(raw: &str) -> ServiceResult<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let value = cleaned
        .parse::<f64>()
        .map_err(|_| ServiceError::Validation(format!("`{raw}` is not a valid amount")))?;
    validate_amount(value)
}

fn validate_amount(value: f64) -> ServiceResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ServiceError::Validation(format!(
            "amount must be a non-negative number, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Account, CASH_AND_BANK};

    fn balance(state: &LedgerState, name: &str) -> f64 {
        state
            .category(CASH_AND_BANK)
            .and_then(|c| c.account(name))
            .map(|a| a.balance)
            .unwrap()
    }

    #[test]
    fn expense_is_stored_negative() {
        let mut state = LedgerState::default();
        let id = TransactionService::add(
            &mut state,
            NewTransaction::new("On Hand", TransactionKind::Expense, 50.0, "Lunch"),
        )
        .unwrap();
        assert_eq!(state.transaction(id).unwrap().amount, -50.0);
        assert_eq!(balance(&state, "On Hand"), -50.0);
    }

    #[test]
    fn add_then_delete_restores_balance() {
        let mut state = LedgerState::default();
        crate::core::services::AccountService::edit_balance(
            &mut state,
            CASH_AND_BANK,
            "MM Acc",
            300.0,
        )
        .unwrap();
        let id = TransactionService::add(
            &mut state,
            NewTransaction::new("MM Acc", TransactionKind::Income, 120.0, "Interest"),
        )
        .unwrap();
        assert_eq!(balance(&state, "MM Acc"), 420.0);

        let removed = TransactionService::delete(&mut state, id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(balance(&state, "MM Acc"), 300.0);
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn add_validates_input() {
        let mut state = LedgerState::default();
        let cases = [
            NewTransaction::new("", TransactionKind::Income, 1.0, "x"),
            NewTransaction::new("On Hand", TransactionKind::Income, 1.0, "  "),
            NewTransaction::new("On Hand", TransactionKind::Income, -1.0, "x"),
            NewTransaction::new("On Hand", TransactionKind::Income, f64::NAN, "x"),
        ];
        for input in cases {
            let err = TransactionService::add(&mut state, input.clone())
                .expect_err("invalid input must fail");
            assert!(matches!(err, ServiceError::Validation(_)), "{input:?} gave {err:?}");
        }
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn add_to_unknown_account_fails() {
        let mut state = LedgerState::default();
        let err = TransactionService::add(
            &mut state,
            NewTransaction::new("Savings", TransactionKind::Income, 1.0, "x"),
        )
        .expect_err("unknown account");
        assert!(matches!(err, ServiceError::AccountNotFound(_)));
    }

    #[test]
    fn delete_matching_takes_newest_duplicate() {
        let mut state = LedgerState::default();
        let first = TransactionService::add(
            &mut state,
            NewTransaction::new("On Hand", TransactionKind::Expense, 10.0, "Bus").on("May 1"),
        )
        .unwrap();
        let second = TransactionService::add(
            &mut state,
            NewTransaction::new("On Hand", TransactionKind::Expense, 15.0, "Bus").on("May 1"),
        )
        .unwrap();

        let removed =
            TransactionService::delete_matching(&mut state, "May 1", "On Hand", "Bus").unwrap();
        assert_eq!(removed.id, second);
        assert_eq!(state.transactions[0].id, first);
        assert_eq!(balance(&state, "On Hand"), -10.0);
    }

    #[test]
    fn delete_of_orphan_reports_missing_account() {
        let mut state = LedgerState::default();
        let gone = Account::new("Closed");
        let id = state.add_transaction(Transaction::new("d", &gone, "x", 5.0, RuleTag::None));
        let err = TransactionService::delete(&mut state, id).expect_err("orphan");
        assert!(matches!(err, ServiceError::AccountNotFound(_)));
        assert_eq!(state.transactions.len(), 1);

        let purged = TransactionService::purge_orphans(&mut state);
        assert_eq!(purged.len(), 1);
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let mut state = LedgerState::default();
        for label in ["a", "b", "c"] {
            TransactionService::add(
                &mut state,
                NewTransaction::new("On Hand", TransactionKind::Income, 1.0, label),
            )
            .unwrap();
        }
        let labels: Vec<_> = TransactionService::list(&state)
            .into_iter()
            .map(|txn| txn.description.as_str())
            .collect();
        assert_eq!(labels, vec!["c", "b", "a"]);
    }

    #[test]
    fn parse_amount_accepts_grouping() {
        assert_eq!(parse_amount("1,250.50").unwrap(), 1250.5);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-3").is_err());
    }
}
