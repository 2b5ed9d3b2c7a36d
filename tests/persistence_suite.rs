mod common;

use std::fs;

use chrono::{TimeZone, Utc};
use common::temp_base;
use finance_core::{
    core::{
        ledger_manager::LedgerManager,
        services::{AccountService, NewTransaction, TransactionService},
    },
    errors::LedgerError,
    ledger::{
        Currency, LedgerState, RuleTag, TransactionKind, CASH_AND_BANK, CRYPTO_AND_INVESTMENTS,
        LEGACY_FOREIGN_ACCOUNT,
    },
    storage::{JsonStorage, StorageBackend},
};

const LEGACY_FILE: &str = r#"{
  "exchange_rate": 300,
  "rule_percentages": { "growth": 30, "stability": 10, "essentials": 50, "rewards": 10 },
  "categories": {
    "Cash & Bank": { "Com Bank Main Acc": 1200.5, "On Hand": 40 },
    "Crypto & Investments": { "Crypto $": 2, "CSE": 500 },
    "Upcoming": {}
  },
  "transactions": [
    {
      "date": "January 05, 2024",
      "account": "On Hand",
      "description": "Coffee",
      "amount": -10,
      "rule_category": "-",
      "timestamp": "2024-01-05T09:30:00.123456"
    }
  ]
}"#;

fn populated_state() -> LedgerState {
    let mut state = LedgerState::default();
    AccountService::edit_balance(&mut state, CASH_AND_BANK, "On Hand", 1250.0).unwrap();
    AccountService::add(&mut state, CASH_AND_BANK, "Savings", 12.5, Currency::Local).unwrap();
    AccountService::edit_balance(&mut state, CRYPTO_AND_INVESTMENTS, LEGACY_FOREIGN_ACCOUNT, 3.25)
        .unwrap();
    TransactionService::add(
        &mut state,
        NewTransaction::new("Savings", TransactionKind::Income, 7.5, "Interest")
            .on("June 01, 2024")
            .tagged(RuleTag::Stability),
    )
    .unwrap();
    state
}

#[test]
fn save_then_load_round_trips() {
    let path = temp_base().join("finance_data.json");
    let storage = JsonStorage::new(&path);
    let state = populated_state();

    storage.save(&state).expect("save state");
    let report = storage.load().expect("load state");

    assert_eq!(report.state, state);
    assert!(report.migrations.is_empty());
    assert!(report.warnings.is_empty());
    assert!(!report.created);
}

#[test]
fn legacy_file_is_upgraded() {
    let path = temp_base().join("finance_data.json");
    fs::write(&path, LEGACY_FILE).unwrap();

    let report = JsonStorage::new(&path).load().expect("load legacy file");
    let state = &report.state;
    assert!(report
        .migrations
        .iter()
        .any(|note| note.contains("assigned ids to 1 transaction(s)")));
    assert_eq!(state.exchange_rate, 300.0);
    assert_eq!(state.rule_percentages.growth, 30.0);

    let names: Vec<&str> = state.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Cash & Bank", "Crypto & Investments", "Upcoming"]);

    let crypto = state
        .category(CRYPTO_AND_INVESTMENTS)
        .and_then(|c| c.account(LEGACY_FOREIGN_ACCOUNT))
        .unwrap();
    assert_eq!(crypto.currency, Currency::Foreign);
    let cse = state
        .category(CRYPTO_AND_INVESTMENTS)
        .and_then(|c| c.account("CSE"))
        .unwrap();
    assert_eq!(cse.currency, Currency::Local);

    let txn = &state.transactions[0];
    assert_eq!(txn.rule_category, RuleTag::None);
    assert_eq!(txn.account_id, None);
    assert_eq!(txn.amount, -10.0);
}

#[test]
fn legacy_transactions_resolve_by_name() {
    let path = temp_base().join("finance_data.json");
    fs::write(&path, LEGACY_FILE).unwrap();

    let (mut manager, metadata) = LedgerManager::open(Box::new(JsonStorage::new(&path))).unwrap();
    assert!(!metadata.migrations.is_empty());
    let id = manager.state().transactions[0].id;
    manager.delete_transaction(id).unwrap();

    let on_hand = manager
        .state()
        .category(CASH_AND_BANK)
        .and_then(|c| c.account("On Hand"))
        .unwrap();
    assert_eq!(on_hand.balance, 50.0);

    // The upgraded layout is written back on the first change.
    let reloaded = JsonStorage::new(&path).load().unwrap();
    assert!(reloaded.migrations.is_empty());
    assert_eq!(&reloaded.state, manager.state());
}

#[test]
fn camel_case_keys_are_accepted() {
    let path = temp_base().join("finance_data.json");
    fs::write(
        &path,
        r#"{
  "exchangeRate": 280,
  "rulePercentages": { "growth": 25, "stability": 15, "essentials": 50, "rewards": 10 },
  "categories": { "Cash & Bank": { "On Hand": 5 } },
  "transactions": [
    { "date": "d", "account": "On Hand", "description": "x", "amount": 5,
      "ruleCategory": "Rewards", "timestamp": "2024-02-01T10:00:00+05:30" }
  ]
}"#,
    )
    .unwrap();

    let report = JsonStorage::new(&path).load().unwrap();
    assert_eq!(report.state.exchange_rate, 280.0);
    let txn = &report.state.transactions[0];
    assert_eq!(txn.rule_category, RuleTag::Rewards);
    assert_eq!(
        txn.timestamp,
        Utc.with_ymd_and_hms(2024, 2, 1, 4, 30, 0).unwrap()
    );
}

#[test]
fn corrupt_file_is_reported() {
    let path = temp_base().join("finance_data.json");
    fs::write(&path, "{ not json").unwrap();

    let err = JsonStorage::new(&path).load().expect_err("corrupt file");
    assert!(matches!(err, LedgerError::CorruptState { .. }));
    // Nothing is overwritten.
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn failed_save_keeps_previous_file() {
    let path = temp_base().join("finance_data.json");
    let storage = JsonStorage::new(&path);
    let state = populated_state();
    storage.save(&state).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    // A directory where the staging file belongs makes the write fail.
    fs::create_dir(path.with_extension("json.tmp")).unwrap();
    let mut changed = state.clone();
    changed.exchange_rate = 1.0;
    assert!(storage.save(&changed).is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn manager_rolls_back_when_disk_write_fails() {
    let path = temp_base().join("finance_data.json");
    let (mut manager, _) = LedgerManager::open(Box::new(JsonStorage::new(&path))).unwrap();
    manager.edit_balance(CASH_AND_BANK, "On Hand", 10.0).unwrap();

    fs::create_dir(path.with_extension("json.tmp")).unwrap();
    let err = manager
        .edit_balance(CASH_AND_BANK, "On Hand", 99.0)
        .expect_err("save fails");
    assert!(err.to_string().contains("not saved"));

    let on_hand = manager
        .state()
        .category(CASH_AND_BANK)
        .and_then(|c| c.account("On Hand"))
        .unwrap();
    assert_eq!(on_hand.balance, 10.0);
}
