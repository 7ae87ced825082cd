//! Periodika catalog engine.
//!
//! Serves a read-mostly catalog of editions (periodicals) and their books
//! (dated issues): a faceted alphabetical listing, per-edition year/month
//! drill-downs, and a tag-invalidatable result cache in front of all three.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
