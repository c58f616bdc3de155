//! Ledger date handling.
//!
//! Requests are stamped with the server's local calendar date only, written
//! day first (`16/10/2026`).

use chrono::{Local, NaiveDate};

/// strftime pattern used for the `Data` column.
pub const CREATED_DATE_FORMAT: &str = "%d/%m/%Y";

/// Formats a calendar date the way the ledger stores it.
pub fn format_created_date(date: NaiveDate) -> String {
    date.format(CREATED_DATE_FORMAT).to_string()
}

/// Today's date in server local time, formatted for the ledger.
pub fn today() -> String {
    format_created_date(Local::now().date_naive())
}

/// Checks that `value` is a real calendar date in the padded ledger form.
pub fn is_created_date(value: &str) -> bool {
    value.len() == 10
        && NaiveDate::parse_from_str(value, CREATED_DATE_FORMAT)
            .is_ok_and(|date| format_created_date(date) == value)
}
