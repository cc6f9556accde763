// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::Serialize;

use super::notify::{Notification, NotificationSink};
use super::{bill_from_parts, read_bill_row, EngineError, BILL_COLUMNS};
use crate::models::Bill;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderState {
    Future,
    Reminding,
    DueToday,
    Overdue,
}

impl ReminderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderState::Future => "future",
            ReminderState::Reminding => "reminding",
            ReminderState::DueToday => "due_today",
            ReminderState::Overdue => "overdue",
        }
    }
}

/// Classify an unpaid bill by days until due.
pub fn classify_due(due_date: NaiveDate, reminder_days: i64, today: NaiveDate) -> ReminderState {
    let days = (due_date - today).num_days();
    if days < 0 {
        ReminderState::Overdue
    } else if days == 0 {
        ReminderState::DueToday
    } else if days <= reminder_days {
        ReminderState::Reminding
    } else {
        ReminderState::Future
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct SweepReport {
    pub scanned: u64,
    pub reminders_sent: u64,
    pub suppressed: u64,
    pub failures: u64,
}

enum Outcome {
    Quiet,
    Sent,
    Suppressed,
}

/// One pass over the full unpaid set. Paid bills never enter the scan. A bill
/// that fails to load or process is counted and skipped; it cannot abort the
/// rest of the sweep.
pub fn run_sweep(
    conn: &Connection,
    sink: &NotificationSink,
    today: NaiveDate,
) -> Result<SweepReport, EngineError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM bills WHERE is_paid=0 ORDER BY id",
        BILL_COLUMNS
    ))?;
    let rows = stmt.query_map([], read_bill_row)?;

    let mut raw = Vec::new();
    for row in rows {
        raw.push(row?);
    }

    let mut report = SweepReport::default();
    for parts in raw {
        report.scanned += 1;
        let bill_id = parts.0;
        let outcome = bill_from_parts(parts).and_then(|bill| process_bill(conn, sink, today, &bill));
        match outcome {
            Ok(Outcome::Sent) => report.reminders_sent += 1,
            Ok(Outcome::Suppressed) => report.suppressed += 1,
            Ok(Outcome::Quiet) => {}
            Err(e) => {
                report.failures += 1;
                tracing::warn!(bill_id, error = %e, "bill skipped during sweep");
            }
        }
    }
    Ok(report)
}

fn process_bill(
    conn: &Connection,
    sink: &NotificationSink,
    today: NaiveDate,
    bill: &Bill,
) -> Result<Outcome, EngineError> {
    let state = classify_due(bill.due_date, bill.reminder_days, today);
    let Some(note) = reminder_message(bill, state, today) else {
        return Ok(Outcome::Quiet);
    };

    // Re-send on a state change or on a new day; repeats within the same day
    // for the same state are suppressed.
    let same_state = bill.last_reminder_state.as_deref() == Some(state.as_str());
    let sent_today = bill.last_reminder_sent_at == Some(today);
    if same_state && sent_today {
        return Ok(Outcome::Suppressed);
    }

    sink.notify(conn, bill.user_id, &note);
    conn.execute(
        "UPDATE bills SET last_reminder_state=?1, last_reminder_sent_at=?2 WHERE id=?3",
        params![state.as_str(), today, bill.id],
    )?;
    Ok(Outcome::Sent)
}

fn reminder_message(bill: &Bill, state: ReminderState, today: NaiveDate) -> Option<Notification> {
    let link = Some(format!("billkeep://bills/{}", bill.id));
    match state {
        ReminderState::Future => None,
        ReminderState::Reminding => {
            let days = (bill.due_date - today).num_days();
            Some(Notification {
                title: format!("Upcoming bill: {}", bill.name),
                body: format!(
                    "'{}' ({}) is due in {} day{} on {}",
                    bill.name,
                    bill.amount,
                    days,
                    if days == 1 { "" } else { "s" },
                    bill.due_date
                ),
                action_link: link,
            })
        }
        ReminderState::DueToday => Some(Notification {
            title: format!("Bill due today: {}", bill.name),
            body: format!("'{}' ({}) is due today", bill.name, bill.amount),
            action_link: link,
        }),
        ReminderState::Overdue => Some(Notification {
            title: format!("Overdue bill: {}", bill.name),
            body: format!(
                "'{}' ({}) was due on {} and is still unpaid",
                bill.name, bill.amount, bill.due_date
            ),
            action_link: link,
        }),
    }
}
