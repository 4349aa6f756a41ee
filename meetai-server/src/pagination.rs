//! Pagination utilities for list endpoints

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Page used when the client does not ask for one
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Smallest accepted page size
pub const MIN_PAGE_SIZE: i64 = 1;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Rows per page
    pub page_size: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

/// Reject page sizes outside `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`
pub fn validate_page_size(page_size: i64) -> Result<i64, ApiError> {
    if (MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        Ok(page_size)
    } else {
        Err(ApiError::BadRequest(format!(
            "page_size must be between {} and {}",
            MIN_PAGE_SIZE, MAX_PAGE_SIZE
        )))
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, total_pages]
///
/// # Examples
/// ```
/// use meetai_server::pagination::calculate_pagination;
///
/// // 25 results at 10 per page = 3 pages (10 + 10 + 5)
/// let p = calculate_pagination(25, 2, 10);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 10);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(25, 99, 10);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 20);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64, page_size: i64) -> Pagination {
    let page_size = page_size.max(MIN_PAGE_SIZE);
    let total_pages = (total_results + page_size - 1) / page_size;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        page_size,
        total_pages,
        offset,
    }
}

/// One page of a list response
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub total_pages: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: i64, pagination: Pagination) -> Self {
        Self {
            items,
            total_count,
            total_pages: pagination.total_pages,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }
}

/// Query parameters shared by list endpoints
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Case-insensitive name filter
    #[serde(default)]
    pub search: Option<String>,
}

impl ListQuery {
    /// Search term, ignoring blank input
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(25, 2, 10);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn test_pagination_out_of_bounds_high() {
        let p = calculate_pagination(15, 99, 10);
        assert_eq!(p.page, 2); // Clamped to last page
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = calculate_pagination(15, 0, 10);
        assert_eq!(p.page, 1); // Clamped to first page
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1, 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = calculate_pagination(20, 2, 10);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(validate_page_size(1).is_ok());
        assert!(validate_page_size(100).is_ok());
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(101).is_err());
    }

    #[test]
    fn test_blank_search_ignored() {
        let query = ListQuery {
            page: 1,
            page_size: 10,
            search: Some("   ".to_string()),
        };
        assert_eq!(query.search(), None);
    }
}
