//! Pagination primitives shared across all list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination query parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_PAGE_SIZE: i64 = 100;

    /// Default items per page.
    const DEFAULT_PAGE_SIZE: i64 = 10;

    pub fn limit(&self) -> i64 {
        self.page_size
            .unwrap_or(Self::DEFAULT_PAGE_SIZE)
            .clamp(1, Self::MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.current_page() - 1) * self.limit()
    }

    pub fn current_page(&self) -> i64 {
        self.page_number.unwrap_or(1).max(1)
    }
}

/// Paged result envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T: Serialize> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: i64, pagination: &Pagination) -> Self {
        let page_size = pagination.limit();
        let page_number = pagination.current_page();
        let total_pages = (total_count + page_size - 1) / page_size;
        Self {
            items,
            total_count,
            page_number,
            page_size,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = Pagination {
            page_number: None,
            page_size: None,
        };
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn pagination_clamps_page_size() {
        let p = Pagination {
            page_number: Some(1),
            page_size: Some(500),
        };
        assert_eq!(p.limit(), 100);

        let p = Pagination {
            page_number: Some(1),
            page_size: Some(0),
        };
        assert_eq!(p.limit(), 1);
    }

    #[test]
    fn pagination_offset_calculation() {
        let p = Pagination {
            page_number: Some(3),
            page_size: Some(10),
        };
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn paged_result_total_pages_and_flags() {
        let p = Pagination {
            page_number: Some(2),
            page_size: Some(10),
        };
        let result = PagedResult::new(vec![1, 2, 3], 25, &p);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total_count, 25);
        assert_eq!(result.page_number, 2);
        assert!(result.has_previous_page);
        assert!(result.has_next_page);
    }

    #[test]
    fn paged_result_last_page_has_no_next() {
        let p = Pagination {
            page_number: Some(3),
            page_size: Some(10),
        };
        let result = PagedResult::new(vec![1, 2, 3, 4, 5], 25, &p);
        assert!(result.has_previous_page);
        assert!(!result.has_next_page);
    }
}
