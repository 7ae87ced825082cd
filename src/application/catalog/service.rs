//! Catalog read operations behind the result cache.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::pagination::PageRequest;
use crate::application::repos::{BookQueryFilter, EditionsRepo, RepoError};
use crate::cache::{CacheKey, ResultCache};

use super::archive;
use super::listing::{self, ListingQuery};
use super::types::{
    ArchiveBook, ArchiveData, ArchiveView, EditionData, EditionDetail, ListingResult, book_url,
    cover_image_url, edition_url, year_url,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("edition {id} not found")]
    EditionNotFound { id: i64 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Read-side catalog service.
///
/// Each operation derives its cache key from the normalized request
/// parameters, serves a cached payload verbatim on hit, and otherwise
/// queries the store, aggregates, and caches the result under the shared
/// catalog tag.
pub struct CatalogService {
    repo: Arc<dyn EditionsRepo>,
    cache: Arc<ResultCache>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn EditionsRepo>, cache: Arc<ResultCache>) -> Self {
        Self { repo, cache }
    }

    /// Faceted public listing.
    pub async fn listing(&self, query: ListingQuery) -> Result<ListingResult, CatalogError> {
        // Normalize before keying so page 0 and page 1 share an entry.
        let query = ListingQuery {
            page: PageRequest::new(query.page).page(),
            ..query
        };
        let key = CacheKey::Listing {
            edition_type: query.edition_type.clone(),
            letter: query.letter.clone(),
            page: query.page,
        };
        self.cache
            .get_or_compute(key, || async move {
                listing::assemble(self.repo.as_ref(), &query)
                    .await
                    .map_err(CatalogError::from)
            })
            .await
    }

    /// Edition detail with the year → month drill-down over all its books.
    pub async fn edition(&self, id: i64) -> Result<EditionDetail, CatalogError> {
        let key = CacheKey::Edition { id };
        self.cache
            .get_or_compute(key, || async move {
                let record = self
                    .repo
                    .find_edition(id)
                    .await?
                    .ok_or(CatalogError::EditionNotFound { id })?;
                let books = self.repo.list_books(id, &BookQueryFilter::default()).await?;
                Ok(EditionDetail {
                    data: EditionData {
                        edition_type: record.edition_type,
                        name: record.name,
                        description: record.description.filter(|text| !text.is_empty()),
                        url: edition_url(id),
                        years: archive::years_breakdown(id, &books),
                    },
                })
            })
            .await
    }

    /// Year archive: month counts plus the book listing, active books only.
    ///
    /// The counts always reflect the whole year while the listing narrows to
    /// the requested month; the two bases intentionally diverge.
    pub async fn archive(
        &self,
        id: i64,
        year: i32,
        month: Option<u8>,
    ) -> Result<ArchiveView, CatalogError> {
        let key = CacheKey::Archive { id, year, month };
        self.cache
            .get_or_compute(key, || async move {
                let record = self
                    .repo
                    .find_edition(id)
                    .await?
                    .ok_or(CatalogError::EditionNotFound { id })?;

                let counts_filter = BookQueryFilter {
                    year: Some(year),
                    month: None,
                    active_only: true,
                };
                let year_books = self.repo.list_books(id, &counts_filter).await?;

                let listing_filter = BookQueryFilter {
                    year: Some(year),
                    month,
                    active_only: true,
                };
                let books = self.repo.list_books(id, &listing_filter).await?;

                Ok(ArchiveView {
                    data: ArchiveData {
                        edition_type: record.edition_type,
                        name: record.name,
                        year,
                        month,
                        url: year_url(id, year),
                        months: archive::months_breakdown(id, year, &year_books),
                        books: books
                            .into_iter()
                            .map(|book| ArchiveBook {
                                image: cover_image_url(book.id, &book.cover),
                                url: book_url(book.id),
                                name: book.book_name,
                            })
                            .collect(),
                    },
                })
            })
            .await
    }

    /// Flush every cached catalog view.
    ///
    /// External write paths call this after any edition or book mutation.
    pub fn invalidate(&self) {
        info!("Flushing catalog cache after external write");
        self.cache.invalidate();
    }
}
