// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::{params, Connection};

use super::{get_bill, EngineError};
use crate::models::{Bill, Frequency};

/// Next occurrence for a recurring bill. `None` for one-shot bills: paying
/// them is terminal.
///
/// Calendar-month steps keep the day-of-month and clamp to the last valid day
/// on overflow (Jan 31 + 1 month lands on Feb 28/29).
pub fn next_due_date(current: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Once => None,
        Frequency::Weekly => Some(current + Duration::days(7)),
        Frequency::Monthly => Some(add_months(current, 1)),
        Frequency::Quarterly => Some(add_months(current, 3)),
        Frequency::Yearly => Some(add_months(current, 12)),
    }
}

fn add_months(d: NaiveDate, months: i32) -> NaiveDate {
    let total = d.year() * 12 + d.month0() as i32 + months;
    let y = total.div_euclid(12);
    let m = total.rem_euclid(12) as u32 + 1;
    let mut day = d.day();
    loop {
        if let Some(next) = NaiveDate::from_ymd_opt(y, m, day) {
            return next;
        }
        // every month has at least 28 days, so this terminates
        day -= 1;
    }
}

/// Mark a bill paid and, for recurring bills, spawn its next occurrence.
///
/// Runs in one SQLite transaction: either the paid flag lands together with
/// the successor row, or neither does. The original row stays behind as
/// payment history.
pub fn mark_paid(
    conn: &mut Connection,
    bill_id: i64,
    user_id: i64,
    today: NaiveDate,
) -> Result<(Bill, Option<Bill>), EngineError> {
    let tx = conn.transaction()?;

    let bill = get_bill(&tx, bill_id, user_id)?;
    if bill.is_paid {
        return Err(EngineError::Validation(format!(
            "bill '{}' is already paid",
            bill.name
        )));
    }

    tx.execute(
        "UPDATE bills SET is_paid=1, last_paid_date=?1 WHERE id=?2",
        params![today, bill_id],
    )?;

    let successor = match next_due_date(bill.due_date, bill.frequency) {
        Some(next_due) => {
            tx.execute(
                "INSERT INTO bills(user_id, name, amount, category, due_date, frequency,
                                   reminder_days, is_paid, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
                params![
                    user_id,
                    bill.name,
                    bill.amount.to_string(),
                    bill.category.as_str(),
                    next_due,
                    bill.frequency.as_str(),
                    bill.reminder_days,
                    bill.notes
                ],
            )?;
            let new_id = tx.last_insert_rowid();
            Some(get_bill(&tx, new_id, user_id)?)
        }
        None => None,
    };

    tx.commit()?;

    let mut paid = bill;
    paid.is_paid = true;
    paid.last_paid_date = Some(today);
    Ok((paid, successor))
}
