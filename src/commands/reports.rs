// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::commands::forecast::{EMPTY_MESSAGE, run};
use crate::db::currency_symbol;
use crate::models::{ForecastRow, TransactionKind};
use crate::utils::{fmt_money, maybe_print_json, pretty_table, resolve_record};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthFlow {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub closing_balance: Decimal,
}

/// Per-month totals over forecast rows; the seed counts toward balance only.
pub fn monthly_flows(rows: &[ForecastRow]) -> Vec<MonthFlow> {
    let mut map: BTreeMap<(i32, u32), MonthFlow> = BTreeMap::new();
    for r in rows {
        let entry = map
            .entry((r.date.year(), r.date.month()))
            .or_insert_with(|| MonthFlow {
                month: format!("{:04}-{:02}", r.date.year(), r.date.month()),
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
                net: Decimal::ZERO,
                closing_balance: Decimal::ZERO,
            });
        match r.kind {
            TransactionKind::Seed => {}
            _ if r.amount > Decimal::ZERO => entry.income = entry.income.saturating_add(r.amount),
            _ => entry.expense = entry.expense.saturating_sub(r.amount),
        }
        entry.net = entry.income.saturating_sub(entry.expense);
        // rows are chronological, so the last one seen wins
        entry.closing_balance = r.balance;
    }
    map.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub spent: Decimal,
    pub count: usize,
}

/// Bill outflows grouped by category, largest first.
pub fn spend_by_category_rows(rows: &[ForecastRow]) -> Vec<CategorySpend> {
    let mut agg: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for r in rows.iter().filter(|r| r.kind == TransactionKind::Bill) {
        let e = agg.entry(r.category.as_str()).or_insert((Decimal::ZERO, 0));
        e.0 = e.0.saturating_sub(r.amount);
        e.1 += 1;
    }
    let mut items: Vec<CategorySpend> = agg
        .into_iter()
        .map(|(category, (spent, count))| CategorySpend {
            category: category.to_string(),
            spent,
            count,
        })
        .collect();
    items.sort_by(|a, b| b.spent.cmp(&a.spent).then_with(|| a.category.cmp(&b.category)));
    items
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let record = resolve_record(conn, sub)?;
    let Some(result) = run(conn, &record, false)? else {
        println!("{}", EMPTY_MESSAGE);
        return Ok(());
    };
    let data = monthly_flows(&result.rows);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let symbol = currency_symbol(conn)?;
        let rows = data
            .iter()
            .map(|m| {
                vec![
                    m.month.clone(),
                    fmt_money(&m.income, &symbol),
                    fmt_money(&m.expense, &symbol),
                    fmt_money(&m.net, &symbol),
                    fmt_money(&m.closing_balance, &symbol),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net", "Closing Balance"], rows)
        );
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let record = resolve_record(conn, sub)?;
    let Some(result) = run(conn, &record, false)? else {
        println!("{}", EMPTY_MESSAGE);
        return Ok(());
    };
    let data = spend_by_category_rows(&result.rows);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let symbol = currency_symbol(conn)?;
        let rows = data
            .iter()
            .map(|c| vec![c.category.clone(), c.count.to_string(), fmt_money(&c.spent, &symbol)])
            .collect();
        println!("{}", pretty_table(&["Category", "Payments", "Spent"], rows));
    }
    Ok(())
}
