// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::engine::notify::NotificationSink;
use crate::engine::scheduler::SweepScheduler;
use crate::engine::sweep::run_sweep;
use crate::utils::{get_setting, parse_date};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use std::io::BufRead;
use std::time::Duration;

const DEFAULT_INTERVAL_SECS: u64 = 86_400;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("run", sub)) => run(conn, sub)?,
        Some(("watch", sub)) => watch(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn run(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => Utc::now().date_naive(),
    };
    let sink = NotificationSink::from_settings(conn)?;
    let report = run_sweep(conn, &sink, today)?;
    println!(
        "Sweep for {}: scanned {}, reminders sent {}, suppressed {}, failures {}",
        today, report.scanned, report.reminders_sent, report.suppressed, report.failures
    );
    Ok(())
}

fn watch(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let interval = match sub.get_one::<String>("interval") {
        Some(raw) => raw.trim().parse::<u64>()?,
        None => get_setting(conn, "sweep_interval_secs")?
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_INTERVAL_SECS),
    };

    // The scheduler thread owns its own connection and sink
    let sched_conn = db::open_or_init()?;
    let sink = NotificationSink::from_settings(&sched_conn)?;
    let scheduler = SweepScheduler::start(sched_conn, sink, Duration::from_secs(interval));

    println!(
        "Sweep scheduler running every {}s; press Enter to stop",
        interval
    );
    let stdin = std::io::stdin();
    let mut line = String::new();
    let _ = stdin.lock().read_line(&mut line);

    scheduler.shutdown();
    println!("Scheduler stopped");
    Ok(())
}
