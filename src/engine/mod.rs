// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod notify;
pub mod recurrence;
pub mod scheduler;
pub mod spend;
pub mod sweep;
pub mod threshold;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::models::{Bill, BillCategory, Frequency};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    // Ownership mismatches surface as not-found so record existence never leaks
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Channel '{channel}' delivery failed: {message}")]
    Channel {
        channel: &'static str,
        message: String,
    },
    #[error("Bad stored record: {0}")]
    Corrupt(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub const BILL_COLUMNS: &str = "id, user_id, name, amount, category, due_date, frequency, \
     reminder_days, is_paid, last_paid_date, notes, last_reminder_state, last_reminder_sent_at";

pub(crate) type BillRow = (
    i64,
    i64,
    String,
    String,
    String,
    NaiveDate,
    String,
    i64,
    bool,
    Option<NaiveDate>,
    Option<String>,
    Option<String>,
    Option<NaiveDate>,
);

pub(crate) fn read_bill_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<BillRow> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
        r.get(9)?,
        r.get(10)?,
        r.get(11)?,
        r.get(12)?,
    ))
}

pub(crate) fn bill_from_parts(raw: BillRow) -> Result<Bill, EngineError> {
    let (
        id,
        user_id,
        name,
        amount_s,
        category_s,
        due_date,
        frequency_s,
        reminder_days,
        is_paid,
        last_paid_date,
        notes,
        last_reminder_state,
        last_reminder_sent_at,
    ) = raw;
    let amount = amount_s
        .parse()
        .map_err(|_| EngineError::Corrupt(format!("invalid amount '{}' on bill {}", amount_s, id)))?;
    let category = BillCategory::parse(&category_s).ok_or_else(|| {
        EngineError::Corrupt(format!("unknown category '{}' on bill {}", category_s, id))
    })?;
    let frequency = Frequency::parse(&frequency_s).ok_or_else(|| {
        EngineError::Corrupt(format!("unknown frequency '{}' on bill {}", frequency_s, id))
    })?;
    Ok(Bill {
        id,
        user_id,
        name,
        amount,
        category,
        due_date,
        frequency,
        reminder_days,
        is_paid,
        last_paid_date,
        notes,
        last_reminder_state,
        last_reminder_sent_at,
    })
}

/// Fetch a bill scoped by id and owner. An id that exists under a different
/// owner reports not-found.
pub fn get_bill(conn: &Connection, bill_id: i64, user_id: i64) -> Result<Bill, EngineError> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM bills WHERE id=?1 AND user_id=?2", BILL_COLUMNS),
            params![bill_id, user_id],
            read_bill_row,
        )
        .optional()?
        .ok_or(EngineError::NotFound("bill"))?;
    bill_from_parts(raw)
}

pub fn list_bills(
    conn: &Connection,
    user_id: i64,
    include_paid: bool,
) -> Result<Vec<Bill>, EngineError> {
    let sql = if include_paid {
        format!(
            "SELECT {} FROM bills WHERE user_id=?1 ORDER BY due_date, id",
            BILL_COLUMNS
        )
    } else {
        format!(
            "SELECT {} FROM bills WHERE user_id=?1 AND is_paid=0 ORDER BY due_date, id",
            BILL_COLUMNS
        )
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], read_bill_row)?;
    let mut bills = Vec::new();
    for row in rows {
        bills.push(bill_from_parts(row?)?);
    }
    Ok(bills)
}
