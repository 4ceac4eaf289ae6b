// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::errors::BudgetResult;
use crate::forecast::forecast;
use crate::models::{BudgetRecord, Forecast};

/// Canonical serialization of every input that affects a forecast.
///
/// The string itself is the cache key, so two records share an entry only
/// when they serialize identically.
pub fn fingerprint(record: &BudgetRecord) -> BudgetResult<String> {
    Ok(serde_json::to_string(record)?)
}

pub trait ForecastStore {
    fn get(&self, fingerprint: &str) -> BudgetResult<Option<Forecast>>;
    fn put(&mut self, fingerprint: &str, forecast: &Forecast) -> BudgetResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Forecast>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ForecastStore for MemoryCache {
    fn get(&self, fingerprint: &str) -> BudgetResult<Option<Forecast>> {
        Ok(self.entries.get(fingerprint).cloned())
    }

    fn put(&mut self, fingerprint: &str, forecast: &Forecast) -> BudgetResult<()> {
        self.entries.insert(fingerprint.to_string(), forecast.clone());
        Ok(())
    }
}

/// Serves a stored forecast for an identical record, computing and storing it otherwise.
///
/// Empty forecasts are never stored. A stored entry that fails to load is
/// treated as a miss and overwritten.
pub fn cached_forecast<S: ForecastStore + ?Sized>(
    store: &mut S,
    record: &BudgetRecord,
) -> BudgetResult<Option<Forecast>> {
    let key = fingerprint(record)?;
    match store.get(&key) {
        Ok(Some(hit)) => {
            debug!(rows = hit.rows.len(), "forecast cache hit");
            return Ok(Some(hit));
        }
        Ok(None) => debug!("forecast cache miss"),
        Err(e) => warn!(error = %e, "unreadable forecast cache entry, recomputing"),
    }
    let computed = forecast(record);
    if let Some(f) = &computed {
        store.put(&key, f)?;
    }
    Ok(computed)
}
