//! Typed cache keys for computed catalog views.

/// Invalidation tag shared by every catalog view.
///
/// Writes are rare relative to reads, so any catalog mutation flushes this
/// one coarse tag instead of tracking per-entity dependencies. The price is
/// one guaranteed miss per key after each write.
pub const EDITIONS_TAG: &str = "editions";

/// Identifies one cached result.
///
/// Every parameter that affects a result appears in its key and nothing
/// else, so equal requests share an entry and distinct requests never
/// collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Faceted public listing.
    Listing {
        edition_type: Option<String>,
        letter: Option<String>,
        page: u32,
    },
    /// Edition detail with the year/month drill-down.
    Edition { id: i64 },
    /// Year archive, optionally narrowed to one month.
    Archive {
        id: i64,
        year: i32,
        month: Option<u8>,
    },
}

impl CacheKey {
    /// Namespace discriminator, used as a metrics label.
    pub fn namespace(&self) -> &'static str {
        match self {
            CacheKey::Listing { .. } => "editions",
            CacheKey::Edition { .. } => "edition",
            CacheKey::Archive { .. } => "edition-year-month",
        }
    }
}
