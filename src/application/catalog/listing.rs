//! Listing assembly: facets, sorted page, and filter echo in one envelope.

use crate::application::pagination::{self, PER_PAGE, PageRequest};
use crate::application::repos::{EditionQueryFilter, EditionsRepo, RepoError};

use super::alphabet::{self, LATIN_ALPHABET, RUSSIAN_ALPHABET};
use super::types::{ListingEdition, ListingResult, cover_image_url, edition_url};

/// Request parameters of the public listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub edition_type: Option<String>,
    pub letter: Option<String>,
    pub page: u32,
}

/// Build the faceted listing envelope.
///
/// Letter facets are computed over the type-filtered set only: they show
/// which letters remain selectable while holding the type filter, so the
/// letter filter itself must not narrow them. The listing page applies
/// both filters.
pub async fn assemble(
    repo: &dyn EditionsRepo,
    query: &ListingQuery,
) -> Result<ListingResult, RepoError> {
    let facet_filter = EditionQueryFilter {
        edition_type: query.edition_type.clone(),
        letter: None,
    };
    let facet_set = repo.list_editions(&facet_filter).await?;
    let rus_letters = alphabet::alphabet_facets(
        facet_set.iter().map(|edition| edition.name.as_str()),
        &RUSSIAN_ALPHABET,
    );
    let eng_letters = alphabet::alphabet_facets(
        facet_set.iter().map(|edition| edition.name.as_str()),
        &LATIN_ALPHABET,
    );

    let page = PageRequest::new(query.page);
    let listing_filter = EditionQueryFilter {
        edition_type: query.edition_type.clone(),
        letter: query.letter.clone(),
    };
    let slice = repo.page_editions(&listing_filter, page).await?;

    let editions = slice
        .items
        .into_iter()
        .map(|summary| ListingEdition {
            url: edition_url(summary.id),
            image: cover_image_url(summary.book_id, &summary.book_cover),
            name: summary.name,
        })
        .collect();

    Ok(ListingResult {
        edition_type: query.edition_type.clone(),
        letter: query.letter.clone(),
        rus_letters,
        eng_letters,
        editions,
        current_page: page.page(),
        per_page: PER_PAGE,
        total_items: slice.total_items,
        total_pages: pagination::total_pages(slice.total_items, PER_PAGE),
    })
}
