//! Read-only views over the tracker state: totals, the allocation lens and
//! the balance trend used for charting.

use std::collections::HashMap;

use chrono::{Days, Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::ledger::{
    account::to_local, Bucket, Currency, LedgerState, Transaction, CASH_AND_BANK,
    CRYPTO_AND_INVESTMENTS, UPCOMING,
};

pub const DEFAULT_TREND_DAYS: usize = 30;
/// Only the most recent transactions are walked back when building a trend.
pub const TREND_TRANSACTION_LIMIT: usize = 60;
/// Longest series a trend will produce, roughly ten years.
pub const MAX_TREND_DAYS: usize = 3650;

/// Aggregate balances in local currency.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct TotalsResult {
    pub cash_bank: f64,
    pub crypto: f64,
    pub upcoming: f64,
    /// Cash plus investments; upcoming funds are excluded.
    pub real_total: f64,
    pub total: f64,
}

/// One bucket of the allocation lens.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllocationRow {
    pub bucket: Bucket,
    pub label: &'static str,
    pub target_percent: f64,
    pub target: f64,
    pub current: f64,
    pub diff: f64,
    pub percent_of_real_total: f64,
    /// `current / target` as a percentage, capped at 100.
    pub progress_percent: f64,
}

/// A single day of the reconstructed balance series.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(state: &LedgerState) -> TotalsResult {
        let category_total = |name: &str| {
            state
                .category(name)
                .map(|category| category.local_total(state.exchange_rate))
                .unwrap_or(0.0)
        };
        let cash_bank = category_total(CASH_AND_BANK);
        let crypto = category_total(CRYPTO_AND_INVESTMENTS);
        let upcoming = category_total(UPCOMING);
        let real_total = cash_bank + crypto;
        TotalsResult {
            cash_bank,
            crypto,
            upcoming,
            real_total,
            total: real_total + upcoming,
        }
    }

    /// Compares holdings against the rule percentages.
    ///
    /// Growth is measured by the investment category. The cash balance is
    /// split across stability, essentials and rewards in proportion to their
    /// weights; those buckets have no balances of their own.
    pub fn allocation(state: &LedgerState, totals: &TotalsResult) -> Vec<AllocationRow> {
        let rules = &state.rule_percentages;
        let non_growth = rules.non_growth_sum();
        Bucket::ALL
            .iter()
            .map(|&bucket| {
                let weight = rules.weight(bucket);
                let current = match bucket {
                    Bucket::Growth => totals.crypto,
                    _ if non_growth == 0.0 => 0.0,
                    _ => totals.cash_bank * weight / non_growth,
                };
                let target = totals.real_total * weight / 100.0;
                AllocationRow {
                    bucket,
                    label: bucket.label(),
                    target_percent: weight,
                    target,
                    current,
                    diff: current - target,
                    percent_of_real_total: percent_of(current, totals.real_total),
                    progress_percent: progress(current, target),
                }
            })
            .collect()
    }

    /// Approximates the real total over the last `days` days, oldest first.
    ///
    /// Starts from today's real total and walks the most recent transactions
    /// backwards. Days without a recorded change repeat the previous value.
    /// Direct balance edits are invisible here. Transactions are grouped by
    /// their local calendar day.
    pub fn trend(state: &LedgerState, days: usize, today: NaiveDate) -> Vec<TrendPoint> {
        Self::trend_in(state, days, today, &Local)
    }

    /// Same as [`SummaryService::trend`], grouping timestamps by their date in `zone`.
    ///
    /// `days` is capped at [`MAX_TREND_DAYS`], and the series stops at the
    /// earliest date the calendar can represent.
    pub fn trend_in<Tz: TimeZone>(
        state: &LedgerState,
        days: usize,
        today: NaiveDate,
        zone: &Tz,
    ) -> Vec<TrendPoint> {
        let current = Self::totals(state).real_total;
        let days = days.min(MAX_TREND_DAYS);

        let mut recent: Vec<&Transaction> = state.transactions.iter().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut by_day = HashMap::new();
        by_day.insert(today, current);
        let mut running = current;
        for txn in recent.into_iter().take(TREND_TRANSACTION_LIMIT) {
            running -= Self::local_amount(state, txn);
            by_day.insert(txn.timestamp.with_timezone(zone).date_naive(), running);
        }

        let mut last = current;
        (0..days)
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(offset as u64)))
            .map(|date| {
                if let Some(value) = by_day.get(&date) {
                    last = *value;
                }
                TrendPoint { date, value: last }
            })
            .collect()
    }

    fn local_amount(state: &LedgerState, txn: &Transaction) -> f64 {
        let currency = state
            .locate_transaction_account(txn)
            .and_then(|location| state.account_at(location))
            .map(|account| account.currency)
            .unwrap_or(Currency::Local);
        to_local(currency, txn.amount, state.exchange_rate)
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

fn progress(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        0.0
    } else {
        (current / target * 100.0).min(100.0)
    }
}
