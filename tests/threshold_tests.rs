// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billkeep::engine::notify::{Notification, NotificationChannel, NotificationSink};
use billkeep::engine::threshold::{classify, overrun_alerts_on_expense, BudgetStatus};
use billkeep::engine::EngineError;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn classify_is_total_and_exclusive() {
    // spend == amount is exactly 100%, which is near-limit, not over
    assert_eq!(classify(dec("500"), 80, dec("500")), BudgetStatus::NearLimit);
    // exactly at the threshold
    assert_eq!(classify(dec("500"), 80, dec("400")), BudgetStatus::NearLimit);
    // just below the threshold
    assert_eq!(classify(dec("500"), 80, dec("399.99")), BudgetStatus::OnTrack);
    // over only past 100%
    assert_eq!(classify(dec("500"), 80, dec("500.01")), BudgetStatus::Over);
    assert_eq!(classify(dec("500"), 80, dec("0")), BudgetStatus::OnTrack);
}

#[test]
fn classify_near_limit_and_over_examples() {
    // 450/500 = 90% >= 80%
    assert_eq!(classify(dec("500"), 80, dec("450")), BudgetStatus::NearLimit);
    // 510/500 = 102%
    assert_eq!(classify(dec("500"), 80, dec("510")), BudgetStatus::Over);
}

#[test]
fn zero_amount_budget_never_divides() {
    assert_eq!(classify(dec("0"), 80, dec("100")), BudgetStatus::OnTrack);
    assert_eq!(classify(dec("-10"), 80, dec("100")), BudgetStatus::OnTrack);
}

struct CaptureChannel {
    sent: Arc<Mutex<Vec<(i64, String)>>>,
}

impl NotificationChannel for CaptureChannel {
    fn name(&self) -> &'static str {
        "capture"
    }

    fn send(
        &self,
        _conn: &Connection,
        user_id: i64,
        note: &Notification,
    ) -> Result<(), EngineError> {
        self.sent.lock().unwrap().push((user_id, note.title.clone()));
        Ok(())
    }
}

fn capture_sink() -> (NotificationSink, Arc<Mutex<Vec<(i64, String)>>>) {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let sink = NotificationSink::with_channels(vec![Box::new(CaptureChannel {
        sent: sent.clone(),
    })]);
    (sink, sent)
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    billkeep::db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO users(name) VALUES('default')", [])
        .unwrap();
    conn.execute("INSERT INTO categories(name) VALUES('Dining')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO budgets(user_id, category, amount, period, alert_threshold, start_date, end_date)
         VALUES (1, 'Dining', '500', 'monthly', 80, '2025-06-01', '2025-07-01')",
        [],
    )
    .unwrap();
    conn
}

fn add_expense(conn: &Connection, date: &str, amount: &str) {
    conn.execute(
        "INSERT INTO transactions(user_id, date, amount, payee, category_id) VALUES (1, ?1, ?2, 'x', 1)",
        params![date, amount],
    )
    .unwrap();
}

#[test]
fn alert_fires_only_on_transition_into_over() {
    let conn = setup();
    let (sink, sent) = capture_sink();
    let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    // 450 spent: near limit, no alert
    add_expense(&conn, "2025-06-10", "-450");
    let crossed =
        overrun_alerts_on_expense(&conn, &sink, 1, 1, date, dec("450")).unwrap();
    assert_eq!(crossed, 0);
    assert!(sent.lock().unwrap().is_empty());

    // +100 tips it to 550: crosses into over, exactly one alert
    add_expense(&conn, "2025-06-15", "-100");
    let crossed =
        overrun_alerts_on_expense(&conn, &sink, 1, 1, date, dec("100")).unwrap();
    assert_eq!(crossed, 1);
    assert_eq!(sent.lock().unwrap().len(), 1);
    assert!(sent.lock().unwrap()[0].1.contains("Budget exceeded"));

    // already over before this expense: no re-alert
    add_expense(&conn, "2025-06-16", "-20");
    let crossed = overrun_alerts_on_expense(&conn, &sink, 1, 1, date, dec("20")).unwrap();
    assert_eq!(crossed, 0);
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[test]
fn expense_outside_budget_window_does_not_alert() {
    let conn = setup();
    let (sink, sent) = capture_sink();
    let date = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();

    add_expense(&conn, "2025-07-02", "-600");
    let crossed = overrun_alerts_on_expense(&conn, &sink, 1, 1, date, dec("600")).unwrap();
    assert_eq!(crossed, 0);
    assert!(sent.lock().unwrap().is_empty());
}
