mod common;

use assert_cmd::Command;
use common::temp_base;
use predicates::prelude::*;
use predicates::str::contains;

fn script_cmd(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("finance_core_cli").unwrap();
    cmd.env("FINANCE_CORE_HOME", home)
        .env("FINANCE_CORE_CLI_SCRIPT", "1")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_records_transaction() {
    let home = temp_base();
    let input = "txn add income \"Com Bank Main Acc\" 1,000 Salary Essentials\nsummary\nexit\n";

    script_cmd(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Transaction recorded"))
        .stdout(contains("LKR 1,000.00"));

    let json = std::fs::read_to_string(home.join("finance_data.json")).unwrap();
    assert!(json.contains("\"Salary\""));
    assert!(json.contains("\"Essentials\""));
}

#[test]
fn state_survives_between_runs() {
    let home = temp_base();
    script_cmd(&home)
        .write_stdin("account balance \"Crypto & Investments\" \"Crypto $\" 10\nexit\n")
        .assert()
        .success();

    script_cmd(&home)
        .write_stdin("summary\nallocation\n")
        .assert()
        .success()
        .stdout(contains("LKR 2,900.00"))
        .stdout(contains("Growth"));
}

#[test]
fn unknown_command_gets_suggestion() {
    let home = temp_base();
    script_cmd(&home)
        .write_stdin("sumary\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `sumary`"))
        .stdout(contains("Did you mean `summary`?"));
}

#[test]
fn service_errors_do_not_stop_the_script() {
    let home = temp_base();
    script_cmd(&home)
        .write_stdin("txn add expense \"On Hnd\" 5 Tea\nrules 50 50 50 50\nversion\n")
        .assert()
        .success()
        .stdout(contains("does not belong to any category"))
        .stdout(contains("Did you mean `On Hand`?"))
        .stdout(contains("percentages must total 100"))
        .stdout(contains("Schema ver").and(contains("Data file")));
}

#[test]
fn trend_rejects_out_of_range_day_counts() {
    let home = temp_base();
    script_cmd(&home)
        .write_stdin("trend 200000000\ntrend 3\n")
        .assert()
        .success()
        .stdout(contains("between 1 and 3650"))
        .stdout(contains("Real total, last 3 days"));
}

#[test]
fn version_reports_package_and_files() {
    let home = temp_base();
    script_cmd(&home)
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains(format!("Finance Core {}", env!("CARGO_PKG_VERSION"))))
        .stdout(contains("config.json"));
}

#[test]
fn config_command_persists_settings() {
    let home = temp_base();
    script_cmd(&home)
        .write_stdin("config currency eur gbp\nconfig data-file books.json\nrate 2\n")
        .assert()
        .success()
        .stdout(contains("Currencies set to EUR (local) and GBP (foreign)"))
        .stdout(contains("books.json"))
        .stdout(contains("Exchange rate set to 2"));

    let config = std::fs::read_to_string(home.join("config.json")).unwrap();
    assert!(config.contains("\"EUR\""));
    assert!(config.contains("books.json"));
    assert!(home.join("books.json").exists());

    script_cmd(&home)
        .write_stdin("config\nsummary\n")
        .assert()
        .success()
        .stdout(contains("GBP"))
        .stdout(contains("Exchange rate: 1 GBP = 2 EUR"));
}
