use serde::{Deserialize, Serialize};

use crate::query::positive;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// A validated page number and page size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl PageRequest {
    /// Creates a request, replacing zero values with the defaults.
    pub fn new(page: usize, limit: usize) -> Self {
        PageRequest {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Builds a request from raw parameters. Anything that isn’t a
    /// positive integer falls back to the default.
    pub fn from_raw(page: &Option<String>, limit: &Option<String>) -> Self {
        PageRequest::new(
            positive(page).unwrap_or(DEFAULT_PAGE),
            positive(limit).unwrap_or(DEFAULT_LIMIT),
        )
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The half-open range of indices this page covers, before clamping.
    fn bounds(&self) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.limit);
        (start, start.saturating_add(self.limit))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Describes where a page sits within the full result set.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Selects the requested page from `items`. Pages past the end are
/// empty rather than an error. `total_pages` is 0 when there are no
/// items at all.
pub fn paginate<T>(items: &[T], request: PageRequest) -> (&[T], Pagination) {
    let total_items = items.len();
    let (start, end) = request.bounds();
    let slice = &items[start.min(total_items)..end.min(total_items)];

    let pagination = Pagination {
        current_page: request.page,
        total_pages: ceiling_division(total_items, request.limit),
        total_items,
        items_per_page: request.limit,
        has_next_page: end < total_items,
        has_prev_page: request.page > 1,
    };

    (slice, pagination)
}

fn ceiling_division(dividend: usize, divisor: usize) -> usize {
    dividend / divisor + if dividend % divisor == 0 { 0 } else { 1 }
}
