// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::forecast::horizon_end;
use crate::models::{BudgetRecord, BudgetRow, DEFAULT_DAY_OF_MONTH};
use crate::schedule::is_known_weekday;
use crate::utils::{pretty_table, resolve_record};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub issue: &'static str,
    pub collection: &'static str,
    pub row: usize, // 1-based
    pub name: String,
    pub detail: String,
}

fn common<R: BudgetRow>(collection: &'static str, idx: usize, row: &R, out: &mut Vec<Finding>) {
    let mut push = |issue: &'static str, detail: String| {
        out.push(Finding {
            issue,
            collection,
            row: idx + 1,
            name: row.name().to_string(),
            detail,
        })
    };
    if row.active_flag().is_none() {
        push("active_missing", "no Active value, treated as inactive".into());
    }
    if row.amount().is_zero() {
        push("zero_amount", "contributes nothing".into());
    } else if row.amount() < Decimal::ZERO {
        push(
            "negative_amount",
            format!("entered as {}; the sign comes from Type", row.amount()),
        );
    }
}

/// Everything in `record` that forecasting will clamp, default or skip.
pub fn diagnose(record: &BudgetRecord) -> Vec<Finding> {
    let mut out = Vec::new();
    let start = record.start_date;
    let end = horizon_end(start);

    for (i, r) in record.monthly.iter().enumerate() {
        common("monthly", i, r, &mut out);
        match r.day_of_month {
            None => out.push(Finding {
                issue: "day_missing",
                collection: "monthly",
                row: i + 1,
                name: r.name.clone(),
                detail: format!("no day of month, defaults to {}", DEFAULT_DAY_OF_MONTH),
            }),
            Some(d) if !(1..=31).contains(&d) => out.push(Finding {
                issue: "day_clamped",
                collection: "monthly",
                row: i + 1,
                name: r.name.clone(),
                detail: format!("day {} clamped to {}", d, d.clamp(1, 31)),
            }),
            Some(_) => {}
        }
    }

    for (i, r) in record.weekly.iter().enumerate() {
        common("weekly", i, r, &mut out);
        if !is_known_weekday(&r.weekday) {
            out.push(Finding {
                issue: "weekday_fallback",
                collection: "weekly",
                row: i + 1,
                name: r.name.clone(),
                detail: format!("'{}' is not a weekday, defaults to Monday", r.weekday),
            });
        }
    }

    for (i, r) in record.onetime.iter().enumerate() {
        common("onetime", i, r, &mut out);
        let problem = match r.date {
            None => Some(("date_missing", "no readable date, skipped".to_string())),
            Some(d) if d < start || d > end => Some((
                "outside_horizon",
                format!("{} is outside {}..{}, skipped", d, start, end),
            )),
            Some(_) => None,
        };
        if let Some((issue, detail)) = problem {
            out.push(Finding {
                issue,
                collection: "onetime",
                row: i + 1,
                name: r.name.clone(),
                detail,
            });
        }
    }
    out
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let record = resolve_record(conn, sub)?;
    let findings = diagnose(&record);
    if findings.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = findings
            .into_iter()
            .map(|f| {
                vec![
                    f.issue.to_string(),
                    format!("{} #{}", f.collection, f.row),
                    f.name,
                    f.detail,
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Issue", "Row", "Name", "Detail"], rows));
    }
    Ok(())
}
