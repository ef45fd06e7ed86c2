//! Pagination query parameters.

use serde::Deserialize;

use renthub_core::types::pagination::PageRequest;

/// `?page=&page_size=` query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// Convert into a clamped [`PageRequest`].
    pub fn into_page_request(self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(default.page),
            self.page_size.unwrap_or(default.page_size),
        )
    }
}
