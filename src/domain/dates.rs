//! Calendar parsing for book issue dates.

use thiserror::Error;
use time::{Date, format_description::FormatItem, macros::format_description};

/// Issue dates arrive from the store as `DD.MM.YYYY`.
pub const BOOK_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day].[month].[year]");

#[derive(Debug, Error)]
#[error("malformed book date `{value}`")]
pub struct MalformedDateError {
    pub value: String,
    #[source]
    pub source: time::error::Parse,
}

/// Parse a raw `DD.MM.YYYY` issue date into a calendar date.
///
/// Pure calendar parsing, no timezone conversion. Callers decide whether a
/// failure rejects the item or is logged and skipped; it is never coerced
/// to a default date.
pub fn parse_book_date(value: &str) -> Result<Date, MalformedDateError> {
    Date::parse(value, BOOK_DATE_FORMAT).map_err(|source| MalformedDateError {
        value: value.to_string(),
        source,
    })
}

/// Year and calendar month (1..=12) of a parsed issue date.
pub fn year_month(date: Date) -> (i32, u8) {
    (date.year(), u8::from(date.month()))
}
