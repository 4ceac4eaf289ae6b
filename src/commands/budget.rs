// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::Path;

use crate::commands::exporter::save_record;
use crate::db::currency_symbol;
use crate::models::{BudgetRecord, BudgetRow, Frequency, MonthlyRule, RuleKind, WeeklyRule};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, resolve_record};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("new", sub)) => new_budget(sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn monthly_bill(name: &str, category: &str, amount: i64, day: i64) -> MonthlyRule {
    MonthlyRule {
        active: Some(true),
        kind: RuleKind::Bill,
        name: name.to_string(),
        category: Some(category.to_string()),
        amount: Decimal::from(amount),
        day_of_month: Some(day),
    }
}

fn weekly_rule(
    kind: RuleKind,
    name: &str,
    category: &str,
    amount: i64,
    frequency: Frequency,
    weekday: &str,
) -> WeeklyRule {
    WeeklyRule {
        active: Some(true),
        kind,
        name: name.to_string(),
        category: Some(category.to_string()),
        amount: Decimal::from(amount),
        frequency,
        weekday: weekday.to_string(),
    }
}

/// Household starter: rent on the 1st, two bi-weekly Friday paychecks, weekly gas.
pub fn starter_record(seed: Decimal, start_date: NaiveDate) -> BudgetRecord {
    let mut record = BudgetRecord::new(seed, start_date);
    record.monthly = vec![
        monthly_bill("Rent (Drew)", "Housing", 1000, 1),
        monthly_bill("Rent (Alex)", "Housing", 800, 1),
    ];
    record.weekly = vec![
        weekly_rule(RuleKind::Income, "Drew Paycheck", "Salary", 1600, Frequency::BiWeekly, "Friday"),
        weekly_rule(RuleKind::Income, "Alex Paycheck", "Salary", 1200, Frequency::BiWeekly, "Friday"),
        weekly_rule(RuleKind::Bill, "Gas", "Auto", 40, Frequency::Weekly, "Monday"),
    ];
    record
}

fn new_budget(sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap().trim();
    let seed = parse_decimal(sub.get_one::<String>("seed").unwrap())?;
    let start = match sub.get_one::<String>("start") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    save_record(Path::new(out), &starter_record(seed, start))?;
    println!("Wrote starter budget to {} (start {}, seed {})", out, start, seed);
    Ok(())
}

fn active_label(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "yes".into(),
        Some(false) => "no".into(),
        None => "(unset)".into(),
    }
}

/// Leading cells of a rule listing, showing the category as stored.
pub fn rule_cells<R: BudgetRow>(row: &R, symbol: &str) -> Vec<String> {
    vec![
        active_label(row.active_flag()),
        format!("{:?}", row.kind()),
        row.name().to_string(),
        row.stored_category().unwrap_or_default().to_string(),
        fmt_money(&row.amount(), symbol),
    ]
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let record = resolve_record(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &record)? {
        return Ok(());
    }
    let symbol = currency_symbol(conn)?;
    let seed = record
        .seed
        .map(|s| fmt_money(&s, &symbol))
        .unwrap_or_else(|| "(none)".into());
    println!("Starting balance {} on {}", seed, record.start_date);

    let monthly = record
        .monthly
        .iter()
        .map(|r| {
            let mut cells = rule_cells(r, &symbol);
            cells.push(r.day().to_string());
            cells
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Active", "Type", "Name", "Category", "Amount", "Day"], monthly)
    );

    let weekly = record
        .weekly
        .iter()
        .map(|r| {
            let mut cells = rule_cells(r, &symbol);
            cells.push(format!("{:?}", r.frequency));
            cells.push(r.weekday().to_string());
            cells
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Active", "Type", "Name", "Category", "Amount", "Freq", "Day Name"],
            weekly
        )
    );

    let onetime = record
        .onetime
        .iter()
        .map(|r| {
            let mut cells = rule_cells(r, &symbol);
            cells.push(r.date.map(|d| d.to_string()).unwrap_or_else(|| "(none)".into()));
            cells
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Active", "Type", "Name", "Category", "Amount", "Date"], onetime)
    );
    Ok(())
}
