// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::commands::exporter::save_record;
use crate::errors::{BudgetError, BudgetResult};
use crate::models::{BudgetRecord, Collection};

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("rows", sub)) => import_rows(sub),
        _ => Ok(()),
    }
}

fn import_rows(sub: &clap::ArgMatches) -> Result<()> {
    let kind: Collection = sub.get_one::<String>("kind").unwrap().parse()?;
    let path = sub.get_one::<String>("path").unwrap().trim();
    let config = sub.get_one::<String>("config").unwrap().trim();

    let mut record =
        read_record(Path::new(config)).with_context(|| format!("Load budget {}", config))?;
    let count = replace_collection(&mut record, kind, Path::new(path))
        .with_context(|| format!("Import {} rows from {}", kind.key(), path))?;
    save_record(Path::new(config), &record)?;
    info!(collection = kind.key(), count, "imported rows");
    println!("Imported {} {} rows into {}", count, kind.key(), config);
    Ok(())
}

/// Reads a row file and swaps it in for one collection; the record is untouched on error.
pub fn replace_collection(
    record: &mut BudgetRecord,
    kind: Collection,
    path: &Path,
) -> BudgetResult<usize> {
    Ok(match kind {
        Collection::Monthly => {
            record.monthly = read_rows(path)?;
            record.monthly.len()
        }
        Collection::Weekly => {
            record.weekly = read_rows(path)?;
            record.weekly.len()
        }
        Collection::OneTime => {
            record.onetime = read_rows(path)?;
            record.onetime.len()
        }
    })
}

pub fn read_record(path: &Path) -> BudgetResult<BudgetRecord> {
    let text = fs::read_to_string(path)?;
    parse_record(&text)
}

/// Parses a full budget record, rejecting anything structurally off.
///
/// Individual cells are read leniently; the shape of the document is not.
pub fn parse_record(text: &str) -> BudgetResult<BudgetRecord> {
    let mut value: Value = serde_json::from_str(text)?;
    let obj = value
        .as_object_mut()
        .ok_or_else(|| BudgetError::Malformed("budget record must be a JSON object".into()))?;
    if !obj.contains_key("start_date") {
        return Err(BudgetError::Malformed("missing 'start_date'".into()));
    }
    for key in ["monthly", "weekly", "onetime"] {
        if obj.get(key).is_some_and(Value::is_null) {
            obj.remove(key);
        } else if obj.get(key).is_some_and(|v| !v.is_array()) {
            return Err(BudgetError::Malformed(format!(
                "'{}' must be an array of rows",
                key
            )));
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Reads rows from a `.csv` file (header row required) or a `.json` array.
///
/// CSV cells are handed to the row types as strings, the same way a
/// spreadsheet export writes them into JSON.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> BudgetResult<Vec<T>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    match ext.as_str() {
        "csv" => {
            let mut rdr = ReaderBuilder::new()
                .has_headers(true)
                .trim(Trim::All)
                .from_path(path)?;
            let headers = rdr.headers()?.clone();
            let mut rows = Vec::new();
            for result in rdr.records() {
                let record = result?;
                let cells: Map<String, Value> = headers
                    .iter()
                    .zip(record.iter())
                    .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
                    .collect();
                rows.push(serde_json::from_value(Value::Object(cells))?);
            }
            Ok(rows)
        }
        "json" => {
            let text = fs::read_to_string(path)?;
            let value: Value = serde_json::from_str(&text)?;
            if !value.is_array() {
                return Err(BudgetError::Malformed(
                    "row file must contain a JSON array".into(),
                ));
            }
            Ok(serde_json::from_value(value)?)
        }
        other => Err(BudgetError::UnsupportedFormat(other.to_string())),
    }
}
