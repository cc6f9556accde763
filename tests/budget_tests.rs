// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billkeep::{cli, commands::budgets};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    billkeep::db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO users(name) VALUES('default')", [])
        .unwrap();
    conn
}

fn run_set(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["billkeep", "budget", "set"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("budget", m)) => budgets::handle(conn, m),
        _ => panic!("budget command not parsed"),
    }
}

#[test]
fn set_creates_then_updates_the_same_window() {
    let conn = setup();
    run_set(
        &conn,
        &[
            "--category", "Dining", "--amount", "300", "--period", "monthly", "--from",
            "2025-06-01", "--to", "2025-07-01",
        ],
    )
    .unwrap();
    run_set(
        &conn,
        &[
            "--category", "Dining", "--amount", "450", "--period", "monthly", "--from",
            "2025-06-01", "--to", "2025-07-01", "--threshold", "90",
        ],
    )
    .unwrap();

    let (count, amount, threshold): (i64, String, i64) = conn
        .query_row(
            "SELECT COUNT(*), MAX(amount), MAX(alert_threshold) FROM budgets",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(amount, "450");
    assert_eq!(threshold, 90);
}

#[test]
fn set_rejects_nonpositive_amount() {
    let conn = setup();
    let err = run_set(
        &conn,
        &[
            "--category", "Dining", "--amount", "0", "--period", "monthly", "--from",
            "2025-06-01", "--to", "2025-07-01",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("must be positive"));
}

#[test]
fn set_rejects_threshold_outside_range() {
    let conn = setup();
    for bad in ["0", "101"] {
        let err = run_set(
            &conn,
            &[
                "--category", "Dining", "--amount", "300", "--period", "monthly", "--from",
                "2025-06-01", "--to", "2025-07-01", "--threshold", bad,
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("1..=100"));
    }
}

#[test]
fn set_rejects_inverted_window() {
    let conn = setup();
    let err = run_set(
        &conn,
        &[
            "--category", "Dining", "--amount", "300", "--period", "monthly", "--from",
            "2025-07-01", "--to", "2025-06-01",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("before end"));
}

#[test]
fn set_rejects_unknown_period() {
    let conn = setup();
    let err = run_set(
        &conn,
        &[
            "--category", "Dining", "--amount", "300", "--period", "fortnightly", "--from",
            "2025-06-01", "--to", "2025-07-01",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown period"));
}
