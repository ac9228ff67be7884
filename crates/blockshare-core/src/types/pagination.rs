//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 30;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Calculate the SQL `OFFSET` value, capped at `i64::MAX`.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Total number of items across all pages.
    pub total_count: u64,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
    /// The items on this page.
    pub data: Vec<T>,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, page: &PageRequest, total_count: u64) -> Self {
        Self {
            total_count,
            page: page.page,
            limit: page.limit,
            data,
        }
    }

    /// Transform every item while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            total_count: self.total_count,
            page: self.page,
            limit: self.limit,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_one_indexed() {
        assert_eq!(PageRequest::new(1, 30).offset(), 0);
        assert_eq!(PageRequest::new(3, 30).offset(), 60);
    }

    #[test]
    fn test_offset_saturates_for_huge_pages() {
        assert_eq!(PageRequest::new(u64::MAX, 30).offset(), i64::MAX as u64);
        assert_eq!(PageRequest::new(u64::MAX, 1).offset(), i64::MAX as u64);
    }

    #[test]
    fn test_new_clamps_page_and_limit() {
        let page = PageRequest::new(0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);

        let page = PageRequest::new(2, 10_000);
        assert_eq!(page.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_defaults_from_empty_query() {
        let page: PageRequest = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(page, PageRequest::default());
        assert_eq!(page.limit, 30);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = PageRequest::new(2, 5);
        let resp = PageResponse::new(vec![1, 2, 3], &page, 8).map(|n| n * 10);
        assert_eq!(resp.data, vec![10, 20, 30]);
        assert_eq!(resp.total_count, 8);
        assert_eq!(resp.page, 2);
        assert_eq!(resp.limit, 5);
    }
}
