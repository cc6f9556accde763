// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billkeep::engine::recurrence::mark_paid;
use billkeep::engine::EngineError;
use chrono::NaiveDate;
use rusqlite::{params, Connection};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    billkeep::db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO users(name) VALUES('alice')", [])
        .unwrap();
    conn.execute("INSERT INTO users(name) VALUES('bob')", [])
        .unwrap();
    conn
}

fn add_bill(conn: &Connection, user_id: i64, name: &str, due: &str, frequency: &str) -> i64 {
    conn.execute(
        "INSERT INTO bills(user_id, name, amount, category, due_date, frequency, reminder_days)
         VALUES (?1, ?2, '120', 'utilities', ?3, ?4, 3)",
        params![user_id, name, due, frequency],
    )
    .unwrap();
    conn.last_insert_rowid()
}

#[test]
fn paying_monthly_bill_spawns_exactly_one_successor() {
    let mut conn = setup();
    let id = add_bill(&conn, 1, "Electricity", "2024-01-15", "monthly");
    let today = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();

    let (paid, successor) = mark_paid(&mut conn, id, 1, today).unwrap();
    assert!(paid.is_paid);
    assert_eq!(paid.last_paid_date, Some(today));

    let next = successor.expect("monthly bill must advance");
    assert!(!next.is_paid);
    assert_eq!(next.due_date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
    assert_eq!(next.name, "Electricity");
    assert_eq!(next.reminder_days, 3);
    assert!(next.last_reminder_state.is_none());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM bills", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn paying_quarterly_bill_advances_three_months() {
    let mut conn = setup();
    let id = add_bill(&conn, 1, "Insurance", "2024-01-15", "quarterly");
    let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

    let (_, successor) = mark_paid(&mut conn, id, 1, today).unwrap();
    assert_eq!(
        successor.unwrap().due_date,
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
    );
}

#[test]
fn paying_once_bill_is_terminal() {
    let mut conn = setup();
    let id = add_bill(&conn, 1, "Car repair", "2024-03-01", "once");
    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    let (paid, successor) = mark_paid(&mut conn, id, 1, today).unwrap();
    assert!(paid.is_paid);
    assert!(successor.is_none());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM bills", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn paying_twice_is_rejected_and_spawns_nothing() {
    let mut conn = setup();
    let id = add_bill(&conn, 1, "Rent", "2024-02-01", "monthly");
    let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

    mark_paid(&mut conn, id, 1, today).unwrap();
    let err = mark_paid(&mut conn, id, 1, today).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // still exactly one successor from the first payment
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM bills", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn ownership_mismatch_reports_not_found() {
    let mut conn = setup();
    let id = add_bill(&conn, 1, "Rent", "2024-02-01", "monthly");
    let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

    // bob cannot pay alice's bill, and learns nothing about its existence
    let err = mark_paid(&mut conn, id, 2, today).unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let paid: bool = conn
        .query_row("SELECT is_paid FROM bills WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .unwrap();
    assert!(!paid);
}

#[test]
fn original_row_is_kept_as_history() {
    let mut conn = setup();
    let id = add_bill(&conn, 1, "Netflix", "2024-05-20", "monthly");
    let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

    mark_paid(&mut conn, id, 1, today).unwrap();

    let (is_paid, last_paid): (bool, String) = conn
        .query_row(
            "SELECT is_paid, last_paid_date FROM bills WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert!(is_paid);
    assert_eq!(last_paid, "2024-05-20");
}
