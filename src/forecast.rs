// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::{
    BudgetRecord, BudgetRow, Forecast, ForecastRow, ForecastSummary, MonthlyRule, OneTimeItem,
    Transaction, TransactionKind, WeeklyRule,
};
use crate::schedule::{monthly_dates, weekly_dates};

pub const SEED_DESCRIPTION: &str = "Starting Balance";
pub const SEED_CATEGORY: &str = "Deposit";

/// Last day of the forecast: December 31 of the start year.
pub fn horizon_end(start: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(start.year(), 12, 31).unwrap_or(start)
}

/// Calendar months from the start month through December, inclusive.
pub fn months_remaining(start: NaiveDate) -> u32 {
    (13 - start.month()).max(1)
}

impl Transaction {
    pub fn seed(date: NaiveDate, amount: Decimal) -> Self {
        Self {
            date,
            description: SEED_DESCRIPTION.to_string(),
            category: SEED_CATEGORY.to_string(),
            amount,
            kind: TransactionKind::Seed,
        }
    }

    pub fn is_seed(&self) -> bool {
        self.kind == TransactionKind::Seed
    }

    pub fn from_row<R: BudgetRow>(row: &R, date: NaiveDate) -> Self {
        Self {
            date,
            description: row.name().to_string(),
            category: row.category().to_string(),
            amount: row.signed_amount(),
            kind: row.kind().into(),
        }
    }
}

/// Flattens the seed and every active rule or item into dated transactions.
///
/// The result is unordered apart from assembly order (seed, monthly, weekly,
/// one-time); [`build_forecast`] does the sorting.
pub fn assemble(
    seed: Option<Decimal>,
    start: NaiveDate,
    monthly: &[MonthlyRule],
    weekly: &[WeeklyRule],
    onetime: &[OneTimeItem],
) -> Vec<Transaction> {
    let end = horizon_end(start);
    let mut out = Vec::new();

    if let Some(seed) = seed {
        out.push(Transaction::seed(start, seed));
    }

    for rule in monthly.iter().filter(|r| r.is_active()) {
        let before = out.len();
        out.extend(monthly_dates(start, end, rule.day()).map(|d| Transaction::from_row(rule, d)));
        debug!(name = %rule.name, day = rule.day(), occurrences = out.len() - before, "expanded monthly rule");
    }

    for rule in weekly.iter().filter(|r| r.is_active()) {
        let before = out.len();
        out.extend(
            weekly_dates(start, end, rule.frequency, rule.weekday())
                .map(|d| Transaction::from_row(rule, d)),
        );
        debug!(name = %rule.name, weekday = %rule.weekday(), occurrences = out.len() - before, "expanded weekly rule");
    }

    for item in onetime.iter().filter(|i| i.is_active()) {
        match item.date {
            Some(date) if date >= start && date <= end => {
                out.push(Transaction::from_row(item, date));
            }
            Some(date) => debug!(name = %item.name, %date, "one-time item outside horizon, skipped"),
            None => debug!(name = %item.name, "one-time item without a date, skipped"),
        }
    }

    out
}

pub fn assemble_record(record: &BudgetRecord) -> Vec<Transaction> {
    assemble(
        record.seed,
        record.start_date,
        &record.monthly,
        &record.weekly,
        &record.onetime,
    )
}

/// Orders transactions and derives the running balance.
///
/// The seed opens its day; other same-day transactions are ordered by amount,
/// largest first, so income lands before that day's bills. Balances saturate at
/// the `Decimal` range instead of overflowing. Returns `None` when there is
/// nothing to forecast.
pub fn build_forecast(mut transactions: Vec<Transaction>, start: NaiveDate) -> Option<Forecast> {
    if transactions.is_empty() {
        return None;
    }
    transactions.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| b.is_seed().cmp(&a.is_seed()))
            .then_with(|| b.amount.cmp(&a.amount))
    });

    let seed = transactions
        .iter()
        .filter(|t| t.is_seed())
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount));

    let mut balance = Decimal::ZERO;
    let rows: Vec<ForecastRow> = transactions
        .into_iter()
        .map(|t| {
            balance = balance.saturating_add(t.amount);
            ForecastRow {
                date: t.date,
                description: t.description,
                category: t.category,
                amount: t.amount,
                balance,
                kind: t.kind,
            }
        })
        .collect();

    let ending_balance = balance;
    let minimum_balance = rows.iter().map(|r| r.balance).min().unwrap_or(balance);
    let months = months_remaining(start);
    let summary = ForecastSummary {
        start_date: start,
        end_date: horizon_end(start),
        months,
        seed,
        ending_balance,
        minimum_balance,
        average_monthly_surplus: ending_balance.saturating_sub(seed) / Decimal::from(months),
    };
    Some(Forecast { rows, summary })
}

/// Expands and balances a whole budget record.
pub fn forecast(record: &BudgetRecord) -> Option<Forecast> {
    let result = build_forecast(assemble_record(record), record.start_date);
    match &result {
        Some(f) => info!(
            rows = f.rows.len(),
            ending = %f.summary.ending_balance,
            minimum = %f.summary.minimum_balance,
            "forecast built"
        ),
        None => info!("nothing to forecast"),
    }
    result
}
