// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Once;

use crate::commands::importer::read_record;
use crate::db;
use crate::models::BudgetRecord;

static TRACING_INIT: Once = Once::new();

/// Installs the stderr tracing subscriber once; `RUST_LOG` overrides the default level.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("flowcast=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// `-$1,234.50` style: sign, symbol, grouped thousands, two decimals.
pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    let rounded = d.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}.{}", sign, symbol, grouped, frac)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Loads the budget named by `--config` or `--profile` and applies `--seed`/`--start`.
pub fn resolve_record(conn: &Connection, sub: &clap::ArgMatches) -> Result<BudgetRecord> {
    let mut record = if let Some(path) = sub.get_one::<String>("config") {
        let path = path.trim();
        read_record(Path::new(path)).with_context(|| format!("Load budget {}", path))?
    } else if let Some(name) = sub.get_one::<String>("profile") {
        db::load_profile(conn, name.trim())?
    } else {
        bail!("Provide a budget with --config <file> or --profile <name>");
    };
    if let Some(seed) = sub.get_one::<String>("seed") {
        record.seed = Some(parse_decimal(seed)?);
    }
    if let Some(start) = sub.get_one::<String>("start") {
        record.start_date = parse_date(start)?;
    }
    Ok(record)
}
