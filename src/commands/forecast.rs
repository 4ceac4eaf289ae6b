// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::cache::cached_forecast;
use crate::db::{SqliteCache, currency_symbol};
use crate::forecast::forecast;
use crate::models::{BudgetRecord, Forecast};
use crate::utils::{fmt_money, maybe_print_json, pretty_table, resolve_record};

pub const EMPTY_MESSAGE: &str = "Add some items to generate a forecast.";

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let limit = sub.get_one::<usize>("limit").copied();
    let record = resolve_record(conn, sub)?;

    let Some(result) = run(conn, &record, sub.get_flag("no_cache"))? else {
        println!("{}", EMPTY_MESSAGE);
        return Ok(());
    };

    if json_flag {
        maybe_print_json(true, false, &result)?;
        return Ok(());
    }
    if maybe_print_json(false, jsonl_flag, &result.rows)? {
        return Ok(());
    }

    let symbol = currency_symbol(conn)?;
    let shown = limit.unwrap_or(result.rows.len());
    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .take(shown)
        .map(|r| {
            vec![
                r.display_date(),
                r.description.clone(),
                r.category.clone(),
                fmt_money(&r.amount, &symbol),
                fmt_money(&r.balance, &symbol),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Description", "Category", "Amount", "Checking Balance"],
            rows
        )
    );
    if shown < result.rows.len() {
        println!("... {} more rows", result.rows.len() - shown);
    }
    println!("{}", summary_table(&result, &symbol));
    Ok(())
}

/// Forecast for `record`, through the database cache unless `no_cache` is set.
pub fn run(conn: &Connection, record: &BudgetRecord, no_cache: bool) -> Result<Option<Forecast>> {
    if no_cache {
        return Ok(forecast(record));
    }
    let mut store = SqliteCache::new(conn);
    Ok(cached_forecast(&mut store, record)?)
}

pub fn summary_table(result: &Forecast, symbol: &str) -> comfy_table::Table {
    let s = &result.summary;
    pretty_table(
        &["End of Year Balance", "Lowest Point", "Avg Monthly Surplus"],
        vec![vec![
            fmt_money(&s.ending_balance, symbol),
            fmt_money(&s.minimum_balance, symbol),
            fmt_money(&s.average_monthly_surplus, symbol),
        ]],
    )
}
