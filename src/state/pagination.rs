//! Page navigation over a server-side list.
//!
//! The page is clamped, never rejected: asking for page 0 gives page 1 and
//! asking past the end gives the last page.

use serde::{Deserialize, Serialize};

use crate::config::StateConfig;

/// Query parameters for fetching the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageParams {
    pub page: u64,
    pub page_size: u64,
    pub offset: u64,
}

impl PageParams {
    /// `(name, value)` pairs ready for a query string.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ]
    }
}

/// Pagination fields reported by a list response; absent fields are left
/// untouched by [`Paginator::update_from_response`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageUpdate {
    pub total: Option<u64>,
    pub page: Option<u64>,
}

/// Pagination state: current page, page size and total item count.
///
/// `1 <= page <= total_pages()` holds after every mutation except
/// [`set_page_size`](Paginator::set_page_size), which leaves the page where it
/// was even if it now lies past the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page: u64,
    page_size: u64,
    total: u64,
    initial_page_size: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// Start on page 1 with no items. A page size of 0 becomes 1.
    pub fn new(page_size: u64) -> Self {
        let page_size = page_size.max(1);
        Self {
            page: 1,
            page_size,
            total: 0,
            initial_page_size: page_size,
        }
    }

    /// Use the configured default page size.
    pub fn from_config(config: &StateConfig) -> Self {
        Self::new(config.page_size)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// `max(1, ceil(total / page_size))`
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.page_size).max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Go to page `page`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, page: i64) {
        let last = self.total_pages();
        self.page = if page < 1 { 1 } else { (page as u64).min(last) };
    }

    pub fn next_page(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.has_prev() {
            self.page -= 1;
        }
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    pub fn last_page(&mut self) {
        self.page = self.total_pages();
    }

    /// Change the page size (0 becomes 1). The page is not re-clamped.
    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.max(1);
    }

    /// Replace the total item count and pull the page back into range.
    pub fn set_total(&mut self, total: u64) {
        self.total = total;
        self.clamp_page();
    }

    /// Merge the fields a list response reported, then pull the page back
    /// into range.
    pub fn update_from_response(&mut self, update: PageUpdate) {
        if let Some(total) = update.total {
            self.total = total;
        }
        if let Some(page) = update.page {
            self.page = page;
        }
        self.clamp_page();
    }

    /// Page 1, no items, initial page size.
    pub fn reset(&mut self) {
        *self = Self::new(self.initial_page_size);
    }

    /// Parameters for fetching the current page.
    pub fn params(&self) -> PageParams {
        PageParams {
            page: self.page,
            page_size: self.page_size,
            offset: self.first_offset(),
        }
    }

    /// 1-based inclusive range of the items on the current page, or `None`
    /// when the page is empty.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        let start = self.first_offset().saturating_add(1);
        if start > self.total {
            return None;
        }
        let end = self.page.saturating_mul(self.page_size).min(self.total);
        Some((start, end))
    }

    /// Items before the current page, saturating for huge page sizes.
    fn first_offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }
}
