//! Repository trait describing the catalog store adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::pagination::{PageRequest, PageSlice};
use crate::domain::entities::{BookRecord, EditionRecord, EditionSummary};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Filter over public listing rows; both predicates are conjunctive.
///
/// `letter` matches name prefixes, `edition_type` matches exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EditionQueryFilter {
    pub edition_type: Option<String>,
    pub letter: Option<String>,
}

/// Filter over one edition's books.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookQueryFilter {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub active_only: bool,
}

#[async_trait]
pub trait EditionsRepo: Send + Sync {
    /// Public editions with at least one book, matching `filter`,
    /// ascending by name.
    async fn list_editions(
        &self,
        filter: &EditionQueryFilter,
    ) -> Result<Vec<EditionSummary>, RepoError>;

    /// One page of the same set, with the unpaginated total.
    async fn page_editions(
        &self,
        filter: &EditionQueryFilter,
        page: PageRequest,
    ) -> Result<PageSlice<EditionSummary>, RepoError>;

    async fn find_edition(&self, id: i64) -> Result<Option<EditionRecord>, RepoError>;

    /// Books of one edition matching `filter`, ascending by issue date.
    async fn list_books(
        &self,
        edition_id: i64,
        filter: &BookQueryFilter,
    ) -> Result<Vec<BookRecord>, RepoError>;
}
