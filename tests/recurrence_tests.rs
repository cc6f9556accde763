// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billkeep::engine::recurrence::next_due_date;
use billkeep::models::Frequency;
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn weekly_adds_seven_days() {
    assert_eq!(
        next_due_date(d(2024, 3, 25), Frequency::Weekly),
        Some(d(2024, 4, 1))
    );
}

#[test]
fn monthly_clamps_to_month_end() {
    // leap year
    assert_eq!(
        next_due_date(d(2024, 1, 31), Frequency::Monthly),
        Some(d(2024, 2, 29))
    );
    // non-leap year
    assert_eq!(
        next_due_date(d(2023, 1, 31), Frequency::Monthly),
        Some(d(2023, 2, 28))
    );
    // ordinary day-of-month is preserved
    assert_eq!(
        next_due_date(d(2024, 4, 15), Frequency::Monthly),
        Some(d(2024, 5, 15))
    );
    // December rolls into the next year
    assert_eq!(
        next_due_date(d(2024, 12, 31), Frequency::Monthly),
        Some(d(2025, 1, 31))
    );
}

#[test]
fn quarterly_adds_three_calendar_months() {
    assert_eq!(
        next_due_date(d(2024, 1, 15), Frequency::Quarterly),
        Some(d(2024, 4, 15))
    );
    // Nov 30 + 3 months clamps at Feb
    assert_eq!(
        next_due_date(d(2023, 11, 30), Frequency::Quarterly),
        Some(d(2024, 2, 29))
    );
}

#[test]
fn yearly_handles_leap_day() {
    assert_eq!(
        next_due_date(d(2024, 2, 29), Frequency::Yearly),
        Some(d(2025, 2, 28))
    );
    assert_eq!(
        next_due_date(d(2024, 6, 1), Frequency::Yearly),
        Some(d(2025, 6, 1))
    );
}

#[test]
fn once_is_terminal() {
    assert_eq!(next_due_date(d(2024, 1, 1), Frequency::Once), None);
}

#[test]
fn determinism() {
    let a = next_due_date(d(2024, 1, 31), Frequency::Monthly);
    let b = next_due_date(d(2024, 1, 31), Frequency::Monthly);
    assert_eq!(a, b);
}
