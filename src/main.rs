// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use flowcast::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("budget", sub)) => commands::budget::handle(&conn, sub)?,
        Some(("forecast", sub)) => commands::forecast::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("profile", sub)) => commands::profiles::handle(&conn, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("cache", sub)) => commands::cache::handle(&conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
