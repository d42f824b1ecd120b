//! Offset/limit to page/per-page translation.
//!
//! The engine pages results, so a record offset is rounded down to the page
//! that contains it: `page = offset / limit + 1`. When `offset` is not a
//! multiple of `limit` the first returned record is the start of that page,
//! not the record at `offset`. For `offset = 25, limit = 10` the response
//! starts at record 20.

/// A 1-based engine page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub per_page: u32,
}

impl Page {
    /// Translates a record offset and limit into an engine page.
    ///
    /// A zero limit is treated as one.
    #[must_use]
    pub const fn from_offset(offset: u32, limit: u32) -> Self {
        let per_page = if limit == 0 { 1 } else { limit };
        Self {
            page: (offset / per_page).saturating_add(1),
            per_page,
        }
    }

    /// Returns the record offset the engine will actually start from.
    #[must_use]
    pub const fn effective_offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }
}
