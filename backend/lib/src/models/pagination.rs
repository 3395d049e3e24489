//! Page requests and paged views over ordered result sets

use serde::Serialize;

use crate::{constants::api::MAX_PAGE_SIZE, error::Error};

// NOTE: we use i64 because the db uses i64
/// A validated, 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: i64,
    page_size: i64,
}

impl PageRequest {
    /// Validate the caller's parameters.
    ///
    /// Out-of-range values are rejected, never clamped: `page_number` and
    /// `page_size` must be at least 1 and `page_size` at most [`MAX_PAGE_SIZE`].
    pub fn new(page_number: i64, page_size: i64) -> Result<Self, Error> {
        if page_number < 1 {
            return Err(Error::InvalidPageRequest(format!(
                "pageNumber must be >= 1, got {page_number}"
            )));
        }
        if page_size < 1 {
            return Err(Error::InvalidPageRequest(format!(
                "pageSize must be >= 1, got {page_size}"
            )));
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidPageRequest(format!(
                "pageSize must be <= {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        Ok(Self {
            page_number,
            page_size,
        })
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    /// Maximum number of items on the page (the query `LIMIT`)
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Number of items preceding the page (the query `OFFSET`)
    pub fn offset(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }
}

/// One page of an ordered result set plus navigation metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedView<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedView<T> {
    /// Build the view for `request` from its slice and the total match count
    pub fn new(items: Vec<T>, total_count: i64, request: PageRequest) -> Self {
        debug_assert!(items.len() as i64 <= request.page_size());

        let page_number = request.page_number();
        let page_size = request.page_size();

        Self {
            items,
            total_count,
            page_number,
            page_size,
            total_pages: (total_count + page_size - 1) / page_size,
            has_previous_page: page_number > 1,
            has_next_page: page_number.saturating_mul(page_size) < total_count,
        }
    }
}
