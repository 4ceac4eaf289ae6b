// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::commands::exporter::save_record;
use crate::commands::importer::read_record;
use crate::db;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("save", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let config = sub.get_one::<String>("config").unwrap().trim();
            let record = read_record(Path::new(config))
                .with_context(|| format!("Load budget {}", config))?;
            db::save_profile(conn, name, &record)?;
            println!("Saved profile '{}' from {}", name, config);
        }
        Some(("load", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let out = sub.get_one::<String>("out").unwrap().trim();
            let record = db::load_profile(conn, name)?;
            save_record(Path::new(out), &record)?;
            println!("Wrote profile '{}' to {}", name, out);
        }
        Some(("list", sub)) => {
            let data = db::list_profiles(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|p| vec![p.name, p.start_date, p.saved_at])
                    .collect();
                println!("{}", pretty_table(&["Profile", "Start", "Saved"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            db::remove_profile(conn, name)?;
            println!("Removed profile '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
