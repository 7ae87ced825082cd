//! Catalog read model: alphabet facets, temporal aggregation, listing
//! assembly, and the cache-fronted service tying them together.

pub mod alphabet;
pub mod archive;
pub mod listing;
pub mod service;
pub mod types;
