//! Domain records mirrored from persistent storage.
//!
//! Editions and books are externally owned; this crate only reads them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionRecord {
    pub id: i64,
    pub name: String,
    pub edition_type: String,
    pub description: Option<String>,
    pub is_public: bool,
}

/// One row of the public listing: an edition joined with its lead book,
/// whose cover illustrates the edition in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionSummary {
    pub id: i64,
    pub name: String,
    pub book_id: i64,
    pub book_cover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: i64,
    pub edition_id: i64,
    pub book_name: String,
    /// Raw `DD.MM.YYYY` issue date; parsed by the aggregation layer.
    pub book_year: String,
    pub cover: String,
    pub is_active: bool,
}
