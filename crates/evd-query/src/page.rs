//! # Pagination
//!
//! Pages are 1-based. Page `p` of size `s` is the slice
//! `[(p-1)*s, p*s)` of the filtered list, clamped to its length; a page past
//! the end is empty. `total_pages = ceil(len / s)`, so an empty list has
//! zero pages.
//!
//! [`ListState`] carries the criteria and page position of one list view.
//! Any change to a criterion or to the page size returns to page 1.

use evd_core::{EvidenceItem, EvidenceStatus, LinkEntityType};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::filter::EvidenceFilter;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// One page of results plus the totals needed to render a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Number of pages needed for `len` items.
pub fn total_pages(len: usize, page_size: usize) -> Result<usize, QueryError> {
    if page_size == 0 {
        return Err(QueryError::InvalidPageSize(page_size));
    }
    Ok(len.div_ceil(page_size))
}

/// Cut page `page` out of `items`. A `page` of 0 is treated as 1.
///
/// # Errors
///
/// Returns [`QueryError::InvalidPageSize`] when `page_size` is zero.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Result<Page<T>, QueryError> {
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size)?;
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size);
    let items = items.into_iter().skip(start).take(page_size).collect();
    Ok(Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    })
}

/// Criteria and position of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListState {
    filter: EvidenceFilter,
    page: usize,
    page_size: usize,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            filter: EvidenceFilter::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListState {
    pub fn new(page_size: usize) -> Result<Self, QueryError> {
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            ..Self::default()
        })
    }

    pub fn filter(&self) -> &EvidenceFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_filter(&mut self, filter: EvidenceFilter) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.filter.search = search;
        self.page = 1;
    }

    pub fn set_province(&mut self, province: Option<String>) {
        self.filter.province = province;
        self.page = 1;
    }

    pub fn set_status(&mut self, status: Option<EvidenceStatus>) {
        self.filter.status = status;
        self.page = 1;
    }

    pub fn set_link_type(&mut self, link_type: Option<LinkEntityType>) {
        self.filter.link_type = link_type;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), QueryError> {
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Move to `page`, clamped to at least 1.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Filter then paginate `items` according to this state.
    pub fn view<'a>(&self, items: &'a [EvidenceItem]) -> Result<Page<&'a EvidenceItem>, QueryError> {
        paginate(self.filter.apply(items), self.page, self.page_size)
    }
}
