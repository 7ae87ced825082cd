//! End-to-end coverage of the catalog API routes over an in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use periodika::application::catalog::service::CatalogService;
use periodika::application::pagination::{PageRequest, PageSlice};
use periodika::application::repos::{
    BookQueryFilter, EditionQueryFilter, EditionsRepo, RepoError,
};
use periodika::cache::{CacheConfig, MemoryCacheStore, ResultCache};
use periodika::domain::dates::{parse_book_date, year_month};
use periodika::domain::entities::{BookRecord, EditionRecord, EditionSummary};
use periodika::infra::http::{self, ApiState};
use serde_json::Value;
use tower::ServiceExt;

struct MemoryEditions {
    editions: Vec<EditionRecord>,
    books: Vec<BookRecord>,
    queries: AtomicUsize,
}

impl MemoryEditions {
    fn matching(&self, filter: &EditionQueryFilter) -> Vec<EditionSummary> {
        let mut rows: Vec<EditionSummary> = self
            .editions
            .iter()
            .filter(|edition| edition.is_public)
            .filter(|edition| {
                filter
                    .edition_type
                    .as_ref()
                    .is_none_or(|wanted| edition.edition_type == *wanted)
            })
            .filter(|edition| {
                filter
                    .letter
                    .as_ref()
                    .is_none_or(|letter| edition.name.starts_with(letter.as_str()))
            })
            .filter_map(|edition| {
                let lead = self
                    .books
                    .iter()
                    .filter(|book| book.edition_id == edition.id)
                    .min_by_key(|book| book.id)?;
                Some(EditionSummary {
                    id: edition.id,
                    name: edition.name.clone(),
                    book_id: lead.id,
                    book_cover: lead.cover.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }
}

#[async_trait]
impl EditionsRepo for MemoryEditions {
    async fn list_editions(
        &self,
        filter: &EditionQueryFilter,
    ) -> Result<Vec<EditionSummary>, RepoError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.matching(filter))
    }

    async fn page_editions(
        &self,
        filter: &EditionQueryFilter,
        page: PageRequest,
    ) -> Result<PageSlice<EditionSummary>, RepoError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let rows = self.matching(filter);
        let total_items = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageSlice { items, total_items })
    }

    async fn find_edition(&self, id: i64) -> Result<Option<EditionRecord>, RepoError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.editions.iter().find(|edition| edition.id == id).cloned())
    }

    async fn list_books(
        &self,
        edition_id: i64,
        filter: &BookQueryFilter,
    ) -> Result<Vec<BookRecord>, RepoError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let mut books: Vec<BookRecord> = self
            .books
            .iter()
            .filter(|book| book.edition_id == edition_id)
            .filter(|book| !filter.active_only || book.is_active)
            .filter(|book| {
                let Ok(date) = parse_book_date(&book.book_year) else {
                    return true;
                };
                let (year, month) = year_month(date);
                filter.year.is_none_or(|wanted| year == wanted)
                    && filter.month.is_none_or(|wanted| month == wanted)
            })
            .cloned()
            .collect();
        books.sort_by_key(|book| (parse_book_date(&book.book_year).ok(), book.id));
        Ok(books)
    }
}

fn edition(id: i64, name: &str, edition_type: &str) -> EditionRecord {
    EditionRecord {
        id,
        name: name.to_string(),
        edition_type: edition_type.to_string(),
        description: Some(String::new()),
        is_public: true,
    }
}

fn book(id: i64, edition_id: i64, date: &str) -> BookRecord {
    BookRecord {
        id,
        edition_id,
        book_name: format!("Issue {id}"),
        book_year: date.to_string(),
        cover: format!("{id}.jpg"),
        is_active: true,
    }
}

fn fixture() -> (Arc<MemoryEditions>, Router) {
    let repo = Arc::new(MemoryEditions {
        editions: vec![
            edition(1, "Аврора", "журнал"),
            edition(2, "Apple", "газета"),
        ],
        books: vec![
            book(10, 1, "05.01.2020"),
            book(11, 1, "19.01.2020"),
            book(12, 1, "15.03.2020"),
            book(13, 2, "02.02.2022"),
        ],
        queries: AtomicUsize::new(0),
    });
    let config = CacheConfig::default();
    let cache = Arc::new(ResultCache::new(
        Arc::new(MemoryCacheStore::new(&config)),
        config,
    ));
    let catalog = Arc::new(CatalogService::new(repo.clone(), cache));
    (repo, http::router(ApiState { catalog }))
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn listing_route_serves_the_contract_envelope() {
    let (_repo, router) = fixture();
    let (status, body) = get_json(&router, "/api/editions").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["type"].is_null());
    assert!(body["letter"].is_null());
    assert_eq!(body["rus_letters"].as_array().expect("rus_letters").len(), 32);
    assert_eq!(body["eng_letters"].as_array().expect("eng_letters").len(), 26);
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["per_page"], 32);
    assert_eq!(body["total_items"], 2);
    assert_eq!(body["total_pages"], 1);

    let editions = body["editions"].as_array().expect("editions");
    assert_eq!(editions.len(), 2);
    assert_eq!(editions[0]["name"], "Apple");
    assert_eq!(editions[0]["url"], "/editions/2");
    assert_eq!(editions[0]["image"], "/storage/book_pages/13/13.jpg");
}

#[tokio::test]
async fn listing_route_applies_filters_and_echoes_them() {
    let (_repo, router) = fixture();
    // type=журнал&letter=А, percent-encoded.
    let (status, body) = get_json(
        &router,
        "/api/editions?type=%D0%B6%D1%83%D1%80%D0%BD%D0%B0%D0%BB&letter=%D0%90",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "журнал");
    assert_eq!(body["letter"], "А");
    let editions = body["editions"].as_array().expect("editions");
    assert_eq!(editions.len(), 1);
    assert_eq!(editions[0]["name"], "Аврора");

    let rus = body["rus_letters"].as_array().expect("rus_letters");
    let present: Vec<&str> = rus
        .iter()
        .filter(|facet| facet["present"] == true)
        .filter_map(|facet| facet["letter"].as_str())
        .collect();
    assert_eq!(present, vec!["А"]);
}

#[tokio::test]
async fn listing_route_pages_past_the_data_return_empty() {
    let (_repo, router) = fixture();
    let (status, body) = get_json(&router, "/api/editions?page=5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_page"], 5);
    assert_eq!(body["editions"].as_array().expect("editions").len(), 0);
    assert_eq!(body["total_items"], 2);
}

#[tokio::test]
async fn detail_route_serves_the_year_month_breakdown() {
    let (_repo, router) = fixture();
    let (status, body) = get_json(&router, "/api/editions/1").await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["type"], "журнал");
    assert_eq!(data["name"], "Аврора");
    assert!(data["description"].is_null());
    assert_eq!(data["url"], "/editions/1");

    let year = &data["years"]["2020"];
    assert_eq!(year["value"], 2020);
    assert_eq!(year["count"], 3);
    assert_eq!(year["url"], "/edition/1/2020");

    let months = year["months"].as_array().expect("months");
    assert_eq!(months.len(), 12);
    assert_eq!(months[0]["value"], "Январь");
    assert_eq!(months[0]["count"], 2);
    assert_eq!(months[0]["url"], "/edition/1/2020/1");
    assert_eq!(months[1]["count"], 0);
    assert!(months[1]["url"].is_null());
}

#[tokio::test]
async fn detail_route_maps_missing_editions_to_not_found() {
    let (_repo, router) = fixture();
    let (status, body) = get_json(&router, "/api/editions/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn archive_routes_serve_year_and_month_views() {
    let (_repo, router) = fixture();

    let (status, body) = get_json(&router, "/api/editions/1/2020").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["year"], 2020);
    assert!(body["data"]["month"].is_null());
    assert_eq!(body["data"]["url"], "/edition/1/2020");
    assert_eq!(body["data"]["books"].as_array().expect("books").len(), 3);

    let (status, body) = get_json(&router, "/api/editions/1/2020/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["month"], 1);
    let months = body["data"]["months"].as_array().expect("months");
    assert_eq!(months[0]["value"], "Янв");
    // Counts keep the whole-year basis even with the month filter applied.
    let total: u64 = months
        .iter()
        .map(|entry| entry["count"].as_u64().expect("count"))
        .sum();
    assert_eq!(total, 3);
    let books = body["data"]["books"].as_array().expect("books");
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["name"], "Issue 10");
    assert_eq!(books[0]["url"], "/book/10");
    assert_eq!(books[0]["image"], "/storage/book_pages/10/10.jpg");
}

#[tokio::test]
async fn repeated_reads_are_served_from_the_cache_verbatim() {
    let (repo, router) = fixture();

    let (_, first) = get_json(&router, "/api/editions").await;
    let after_first = repo.queries.load(Ordering::SeqCst);

    let (_, second) = get_json(&router, "/api/editions").await;
    assert_eq!(repo.queries.load(Ordering::SeqCst), after_first);
    assert_eq!(first, second);
}

#[tokio::test]
async fn invalidation_route_flushes_the_editions_tag() {
    let (repo, router) = fixture();

    get_json(&router, "/api/editions").await;
    let after_first = repo.queries.load(Ordering::SeqCst);
    get_json(&router, "/api/editions").await;
    assert_eq!(repo.queries.load(Ordering::SeqCst), after_first);

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/editions/cache/invalidate")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    get_json(&router, "/api/editions").await;
    assert!(repo.queries.load(Ordering::SeqCst) > after_first);
}
