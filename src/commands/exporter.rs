// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::commands::importer::read_record;
use crate::errors::{BudgetError, BudgetResult};
use crate::forecast::forecast;
use crate::models::{BudgetRecord, Collection};
use crate::utils::resolve_record;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("rows", sub)) => export_rows(sub),
        Some(("forecast", sub)) => export_forecast(conn, sub),
        _ => Ok(()),
    }
}

fn export_rows(sub: &clap::ArgMatches) -> Result<()> {
    let kind: Collection = sub.get_one::<String>("kind").unwrap().parse()?;
    let config = sub.get_one::<String>("config").unwrap().trim();
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let record =
        read_record(Path::new(config)).with_context(|| format!("Load budget {}", config))?;
    let count = match kind {
        Collection::Monthly => write_rows(Path::new(out), &fmt, &record.monthly)?,
        Collection::Weekly => write_rows(Path::new(out), &fmt, &record.weekly)?,
        Collection::OneTime => write_rows(Path::new(out), &fmt, &record.onetime)?,
    };
    println!("Exported {} {} rows to {}", count, kind.key(), out);
    Ok(())
}

fn export_forecast(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let record = resolve_record(conn, sub)?;
    match forecast(&record) {
        Some(f) => {
            let count = write_rows(Path::new(out), &fmt, &f.rows)?;
            println!("Exported {} forecast rows to {}", count, out);
        }
        None => println!("Add some items to generate a forecast."),
    }
    Ok(())
}

/// Writes rows as CSV (header from the row's field names) or a pretty JSON array.
pub fn write_rows<T: Serialize>(path: &Path, fmt: &str, rows: &[T]) -> BudgetResult<usize> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(path)?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            fs::write(path, serde_json::to_string_pretty(rows)?)?;
        }
        other => return Err(BudgetError::UnsupportedFormat(other.to_string())),
    }
    Ok(rows.len())
}

/// Writes the record next to its destination first, then renames over it.
pub fn save_record(path: &Path, record: &BudgetRecord) -> BudgetResult<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
    fs::rename(tmp, path)?;
    Ok(())
}
