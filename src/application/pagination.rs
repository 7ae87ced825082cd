//! Offset pagination for the public listing.

use serde::{Deserialize, Serialize};

/// Fixed page size of the public edition listing.
pub const PER_PAGE: u32 = 32;

/// One-based page request at the fixed listing page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
}

impl PageRequest {
    /// Page zero is clamped to the first page.
    pub fn new(page: u32) -> Self {
        Self { page: page.max(1) }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        PER_PAGE
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(PER_PAGE)
    }
}

/// One page of items together with the unpaginated total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub total_items: u64,
}

/// `ceil(total_items / per_page)`; zero when there are no items.
pub fn total_pages(total_items: u64, per_page: u32) -> u64 {
    total_items.div_ceil(u64::from(per_page))
}
