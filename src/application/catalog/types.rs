//! Result shapes served to the response-formatting collaborator.
//!
//! Field names are contract; downstream components must not rename them.
//! The shapes also define the cache payload schema, so every type here
//! round-trips through serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::alphabet::AlphabetFacet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResult {
    #[serde(rename = "type")]
    pub edition_type: Option<String>,
    pub letter: Option<String>,
    pub rus_letters: Vec<AlphabetFacet>,
    pub eng_letters: Vec<AlphabetFacet>,
    pub editions: Vec<ListingEdition>,
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEdition {
    pub name: String,
    pub url: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionDetail {
    pub data: EditionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionData {
    #[serde(rename = "type")]
    pub edition_type: String,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    /// Ascending by year so serialized output is stable across invocations.
    pub years: BTreeMap<i32, YearEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearEntry {
    pub value: i32,
    pub url: String,
    pub months: Vec<MonthEntry>,
    pub count: u32,
}

/// One canonical month slot; `url` is null exactly when `count` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthEntry {
    pub value: String,
    pub url: Option<String>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveView {
    pub data: ArchiveData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveData {
    #[serde(rename = "type")]
    pub edition_type: String,
    pub name: String,
    pub year: i32,
    pub month: Option<u8>,
    pub url: String,
    pub months: Vec<MonthEntry>,
    pub books: Vec<ArchiveBook>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveBook {
    pub name: String,
    pub image: String,
    pub url: String,
}

// URL scheme kept verbatim from the upstream catalog, including its
// singular/plural split between the detail and archive paths.

pub fn edition_url(id: i64) -> String {
    format!("/editions/{id}")
}

pub fn year_url(id: i64, year: i32) -> String {
    format!("/edition/{id}/{year}")
}

pub fn month_url(id: i64, year: i32, month: u8) -> String {
    format!("/edition/{id}/{year}/{month}")
}

pub fn book_url(book_id: i64) -> String {
    format!("/book/{book_id}")
}

pub fn cover_image_url(book_id: i64, cover: &str) -> String {
    format!("/storage/book_pages/{book_id}/{cover}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_field_names_survive_serialization() {
        let result = ListingResult {
            edition_type: Some("журнал".to_string()),
            letter: None,
            rus_letters: Vec::new(),
            eng_letters: Vec::new(),
            editions: Vec::new(),
            current_page: 1,
            per_page: 32,
            total_items: 0,
            total_pages: 0,
        };
        let value = serde_json::to_value(&result).expect("serializable listing");
        assert_eq!(value["type"], "журнал");
        assert!(value["letter"].is_null());
        assert!(value.get("rus_letters").is_some());
        assert!(value.get("eng_letters").is_some());
        assert!(value.get("total_pages").is_some());
    }

    #[test]
    fn years_serialize_as_an_ordered_map() {
        let mut years = BTreeMap::new();
        for year in [2021, 2019, 2020] {
            years.insert(
                year,
                YearEntry {
                    value: year,
                    url: year_url(7, year),
                    months: Vec::new(),
                    count: 0,
                },
            );
        }
        let detail = EditionDetail {
            data: EditionData {
                edition_type: "газета".to_string(),
                name: "Аврора".to_string(),
                description: None,
                url: edition_url(7),
                years,
            },
        };
        let encoded = serde_json::to_string(&detail).expect("serializable detail");
        let y2019 = encoded.find("\"2019\"").expect("year key");
        let y2020 = encoded.find("\"2020\"").expect("year key");
        let y2021 = encoded.find("\"2021\"").expect("year key");
        assert!(y2019 < y2020 && y2020 < y2021);
    }

    #[test]
    fn url_scheme_matches_the_catalog_paths() {
        assert_eq!(edition_url(5), "/editions/5");
        assert_eq!(year_url(5, 2020), "/edition/5/2020");
        assert_eq!(month_url(5, 2020, 3), "/edition/5/2020/3");
        assert_eq!(book_url(9), "/book/9");
        assert_eq!(cover_image_url(9, "cover.jpg"), "/storage/book_pages/9/cover.jpg");
    }
}
