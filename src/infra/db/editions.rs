use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use crate::application::pagination::{PageRequest, PageSlice};
use crate::application::repos::{BookQueryFilter, EditionQueryFilter, EditionsRepo, RepoError};
use crate::domain::entities::{BookRecord, EditionRecord, EditionSummary};

use super::PostgresRepositories;
use super::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct EditionSummaryRow {
    id: i64,
    name: String,
    book_id: i64,
    book_cover: String,
}

impl From<EditionSummaryRow> for EditionSummary {
    fn from(row: EditionSummaryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            book_id: row.book_id,
            book_cover: row.book_cover,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EditionRow {
    id: i64,
    name: String,
    edition_type: String,
    description: Option<String>,
    is_public: bool,
}

impl From<EditionRow> for EditionRecord {
    fn from(row: EditionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            edition_type: row.edition_type,
            description: row.description,
            is_public: row.is_public,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    edition_id: i64,
    book_name: String,
    book_year: String,
    cover: String,
    is_active: bool,
}

impl From<BookRow> for BookRecord {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            edition_id: row.edition_id,
            book_name: row.book_name,
            book_year: row.book_year,
            cover: row.cover,
            is_active: row.is_active,
        }
    }
}

impl PostgresRepositories {
    fn push_listing_select(qb: &mut QueryBuilder<'_, Postgres>) {
        // The lateral join carries the lead book for the cover image and
        // doubles as the at-least-one-book gate.
        qb.push(
            "SELECT e.id, e.name, b.id AS book_id, b.cover AS book_cover \
             FROM editions e \
             JOIN LATERAL ( \
                 SELECT id, cover FROM books WHERE edition_id = e.id ORDER BY id LIMIT 1 \
             ) b ON TRUE \
             WHERE e.is_public = TRUE ",
        );
    }

    fn apply_listing_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &EditionQueryFilter) {
        if let Some(edition_type) = filter.edition_type.as_ref() {
            qb.push(" AND e.type = ");
            qb.push_bind(edition_type.clone());
        }
        if let Some(letter) = filter.letter.as_ref() {
            qb.push(" AND e.name LIKE ");
            qb.push_bind(format!("{}%", escape_like(letter)));
        }
    }
}

/// Escape LIKE metacharacters so a filter value is matched literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[async_trait]
impl EditionsRepo for PostgresRepositories {
    async fn list_editions(
        &self,
        filter: &EditionQueryFilter,
    ) -> Result<Vec<EditionSummary>, RepoError> {
        let mut qb = QueryBuilder::new("");
        Self::push_listing_select(&mut qb);
        Self::apply_listing_filter(&mut qb, filter);
        qb.push(" ORDER BY e.name ASC ");

        let rows = qb
            .build_query_as::<EditionSummaryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(EditionSummary::from).collect())
    }

    async fn page_editions(
        &self,
        filter: &EditionQueryFilter,
        page: PageRequest,
    ) -> Result<PageSlice<EditionSummary>, RepoError> {
        let mut count_qb = QueryBuilder::new(
            "SELECT COUNT(*) FROM editions e \
             WHERE e.is_public = TRUE \
             AND EXISTS (SELECT 1 FROM books WHERE edition_id = e.id) ",
        );
        Self::apply_listing_filter(&mut count_qb, filter);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb = QueryBuilder::new("");
        Self::push_listing_select(&mut qb);
        Self::apply_listing_filter(&mut qb, filter);
        qb.push(" ORDER BY e.name ASC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(page.offset() as i64);

        let rows = qb
            .build_query_as::<EditionSummaryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PageSlice {
            items: rows.into_iter().map(EditionSummary::from).collect(),
            total_items: total.max(0) as u64,
        })
    }

    async fn find_edition(&self, id: i64) -> Result<Option<EditionRecord>, RepoError> {
        let row = sqlx::query_as::<_, EditionRow>(
            "SELECT id, name, type AS edition_type, description, is_public \
             FROM editions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(EditionRecord::from))
    }

    async fn list_books(
        &self,
        edition_id: i64,
        filter: &BookQueryFilter,
    ) -> Result<Vec<BookRecord>, RepoError> {
        let mut qb = QueryBuilder::new(
            "SELECT id, edition_id, book_name, book_year, cover, is_active \
             FROM books WHERE edition_id = ",
        );
        qb.push_bind(edition_id);

        if filter.active_only {
            qb.push(" AND is_active = TRUE ");
        }
        // book_year is DD.MM.YYYY text; year and month live in fixed slices.
        if let Some(year) = filter.year {
            qb.push(" AND substring(book_year FROM 7 FOR 4) = ");
            qb.push_bind(format!("{year:04}"));
        }
        if let Some(month) = filter.month {
            qb.push(" AND substring(book_year FROM 4 FOR 2) = ");
            qb.push_bind(format!("{month:02}"));
        }
        qb.push(
            " ORDER BY substring(book_year FROM 7 FOR 4), \
              substring(book_year FROM 4 FOR 2), \
              substring(book_year FROM 1 FOR 2), id ",
        );

        let rows = qb
            .build_query_as::<BookRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BookRecord::from).collect())
    }
}
