//! Page-number pagination used by every listing endpoint.
//!
//! Pages are 1-based. The page size always comes from configuration; clients
//! only choose which page they want.

use serde::Serialize;

/// Smallest page size accepted from configuration.
pub const MIN_PER_PAGE: i64 = 1;

/// Largest page size accepted from configuration.
pub const MAX_PER_PAGE: i64 = 500;

/// A resolved page request: which page, and how many rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Build a request from an optional client-supplied page number and the
    /// configured page size. Both are clamped into their valid ranges.
    pub fn new(page: Option<i64>, per_page: i64) -> Self {
        Self {
            page: clamp_page(page),
            per_page: clamp_per_page(per_page),
        }
    }

    /// SQL `LIMIT` for this page.
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// SQL `OFFSET` for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Clamp a user-provided page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a configured page size into `MIN_PER_PAGE..=MAX_PER_PAGE`.
pub fn clamp_per_page(per_page: i64) -> i64 {
    per_page.clamp(MIN_PER_PAGE, MAX_PER_PAGE)
}

/// Number of the last page for `total` rows. An empty set still has one page.
pub fn last_page(total: i64, per_page: i64) -> i64 {
    let per_page = clamp_per_page(per_page);
    let total = total.max(0);
    ((total + per_page - 1) / per_page).max(1)
}

/// Pagination metadata returned alongside a page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
}

/// One page of items plus its metadata, serialized as `{ data, meta }`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Serialize> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            data,
            meta: PageMeta {
                current_page: request.page,
                per_page: request.per_page,
                total,
                last_page: last_page(total, request.per_page),
            },
        }
    }

    /// Transform every item while keeping the metadata.
    pub fn map<U: Serialize>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
