//! Pagination
//!
//! [`PageRequest`] normalizes what the client asked for; [`Page`] carries
//! one page of results plus navigation metadata.

use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Normalized page request: `page >= 1`, `1 <= size <= MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Out-of-range values fall back to defaults instead of failing:
    /// `page < 1` becomes 1, `size < 1` becomes 5, `size > 100` becomes 100.
    pub fn new(page: i64, size: i64) -> Self {
        let page = if page < 1 {
            DEFAULT_PAGE
        } else {
            u32::try_from(page).unwrap_or(u32::MAX)
        };
        let size = if size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            size.min(MAX_PAGE_SIZE as i64) as u32
        };
        Self { page, size }
    }

    /// Build from raw query-string values; absent or non-numeric means default
    pub fn from_query(page: Option<&str>, size: Option<&str>) -> Self {
        let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0);
        Self::new(parse(page), parse(size))
    }

    #[inline]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Rows to skip: `(page - 1) * size`
    #[inline]
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.size as u64
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_data: u64,
    pub total_pages: u64,
    pub current_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total_data: u64, request: PageRequest) -> Self {
        let total_pages = total_data.div_ceil(request.size() as u64);
        let current = request.page();

        Self {
            data,
            total_data,
            total_pages,
            current_page: current,
            next_page: ((current as u64) < total_pages).then(|| current + 1),
            previous_page: (current > 1).then(|| current - 1),
        }
    }
}
