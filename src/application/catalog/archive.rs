//! Temporal aggregation: year and month issue buckets.

use std::collections::BTreeMap;

use tracing::warn;

use crate::domain::calendar::{MONTHS, SHORT_MONTHS};
use crate::domain::dates::{parse_book_date, year_month};
use crate::domain::entities::BookRecord;

use super::types::{MonthEntry, YearEntry, month_url, year_url};

/// Issue counts per calendar month (1..=12) within one year.
type MonthCounts = BTreeMap<u8, u32>;

/// Group books into per-year month counts.
///
/// A book with an unparseable date is logged and skipped; it never aborts
/// the aggregation and is never coerced to a default date.
fn bucket_by_year(books: &[BookRecord]) -> BTreeMap<i32, MonthCounts> {
    let mut years: BTreeMap<i32, MonthCounts> = BTreeMap::new();
    for book in books {
        match parse_book_date(&book.book_year) {
            Ok(date) => {
                let (year, month) = year_month(date);
                *years.entry(year).or_default().entry(month).or_insert(0) += 1;
            }
            Err(error) => {
                warn!(
                    book_id = book.id,
                    error = %error,
                    "Skipping book with malformed issue date"
                );
            }
        }
    }
    years
}

/// Year → month drill-down for the edition detail view.
///
/// Years appear only when at least one book falls in them; months are
/// backfilled from the canonical table in calendar order, empty months
/// carrying a null url. Each year's count is the sum of its month counts,
/// which by construction equals the number of books placed in the year.
pub fn years_breakdown(edition_id: i64, books: &[BookRecord]) -> BTreeMap<i32, YearEntry> {
    bucket_by_year(books)
        .into_iter()
        .map(|(year, by_month)| {
            let months = month_entries(&MONTHS, edition_id, year, &by_month);
            let count = months.iter().map(|entry| entry.count).sum();
            (
                year,
                YearEntry {
                    value: year,
                    url: year_url(edition_id, year),
                    months,
                    count,
                },
            )
        })
        .collect()
}

/// Month counts for one fixed year, driven by the short month table.
pub fn months_breakdown(edition_id: i64, year: i32, books: &[BookRecord]) -> Vec<MonthEntry> {
    let by_month = bucket_by_year(books).remove(&year).unwrap_or_default();
    month_entries(&SHORT_MONTHS, edition_id, year, &by_month)
}

fn month_entries(
    table: &[(u8, &str); 12],
    edition_id: i64,
    year: i32,
    by_month: &MonthCounts,
) -> Vec<MonthEntry> {
    table
        .iter()
        .map(|&(month, name)| {
            let count = by_month.get(&month).copied().unwrap_or(0);
            MonthEntry {
                value: name.to_string(),
                url: (count > 0).then(|| month_url(edition_id, year, month)),
                count,
            }
        })
        .collect()
}
