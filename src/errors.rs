// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures at the budget load/save boundary.
///
/// Forecasting itself never fails; only reading or writing configuration does.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed budget JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Malformed budget record: {0}")]
    Malformed(String),
    #[error("Unknown collection '{0}' (use monthly|weekly|onetime)")]
    UnknownCollection(String),
    #[error("Unsupported format '{0}' (use csv|json)")]
    UnsupportedFormat(String),
    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),
}

pub type BudgetResult<T> = Result<T, BudgetError>;
