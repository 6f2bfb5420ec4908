//! Keyword search and pagination.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// Page size used when none is requested.
pub const DEFAULT_PER_PAGE: u32 = 12;
/// Largest page size the storefront asks for.
pub const MAX_PER_PAGE: u32 = 100;

/// A keyword search request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Search keyword.
    pub keyword: String,
    /// Page number (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl SearchQuery {
    /// Search for `keyword`, first page, default page size.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Request a specific page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Request a page size.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Clamp page and page size into their valid ranges and trim the keyword.
    pub fn normalized(&self) -> Self {
        Self {
            keyword: self.keyword.trim().to_string(),
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Query-string pairs for the catalog endpoint.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let q = self.normalized();
        vec![
            ("keyword", q.keyword),
            ("page", q.page.to_string()),
            ("perPage", q.per_page.to_string()),
        ]
    }
}

/// Pagination info returned with a page of results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Current page (1-indexed).
    pub current: u32,
    /// Total number of pages.
    pub pages: u32,
    /// Total number of items.
    pub total: u64,
    /// Items per page.
    pub per_page: u32,
}

impl PageInfo {
    /// Build pagination info from a total count.
    pub fn new(current: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
        };
        Self {
            current: current.max(1),
            pages,
            total,
            per_page,
        }
    }

    /// Whether there's a next page.
    pub fn has_next(&self) -> bool {
        self.current < self.pages
    }

    /// Whether there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    /// Get start item number (1-indexed), 0 when there are no items.
    pub fn start_item(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            u64::from(self.current - 1) * u64::from(self.per_page) + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u64 {
        (u64::from(self.current) * u64::from(self.per_page)).min(self.total)
    }

    /// Page numbers for a pager widget (e.g., [3, 4, 5, 6, 7]).
    pub fn page_numbers(&self, max_visible: u32) -> Vec<u32> {
        let max_visible = max_visible.max(1);
        if self.pages <= max_visible {
            return (1..=self.pages).collect();
        }

        let half = max_visible / 2;
        let start = self.current.saturating_sub(half).max(1);
        let end = (start + max_visible - 1).min(self.pages);
        let start = (end + 1).saturating_sub(max_visible).max(1);

        (start..=end).collect()
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE, 0)
    }
}

/// A page of products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductPage {
    /// The products on this page.
    pub products: Vec<Product>,
    /// Pagination info.
    pub pagination: PageInfo,
}

impl ProductPage {
    /// Check if the page has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
