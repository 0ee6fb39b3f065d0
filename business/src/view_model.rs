//! Directory list view: filtering, company options and pagination.
//!
//! `compute_view` is a pure function of its inputs and is recomputed by the
//! presentation layer whenever the collection or the controls change.
//! `DirectoryState` owns the user-controlled inputs and keeps the page number
//! inside the valid range.

use std::collections::HashSet;

use crate::UserRecord;
use crate::config::DEFAULT_PAGE_SIZE;

/// Company filter. `All` is a sentinel that can never collide with a real name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CompanyFilter {
    #[default]
    All,
    Named(String),
}

impl CompanyFilter {
    pub fn matches(&self, company_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == company_name,
        }
    }
}

impl From<Option<String>> for CompanyFilter {
    fn from(name: Option<String>) -> Self {
        name.map_or(Self::All, Self::Named)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring matched against the user's name.
    pub search: String,
    pub company: CompanyFilter,
}

impl FilterState {
    pub fn matches(&self, user: &UserRecord) -> bool {
        self.company.matches(&user.company.name)
            && (self.search.is_empty()
                || user
                    .name
                    .to_lowercase()
                    .contains(&self.search.to_lowercase()))
    }
}

/// 1-indexed page plus a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    /// First page of the given size. A zero size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn at(self, page: usize) -> Self {
        Self { page, ..self }
    }
}

/// What the list view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView {
    pub visible_items: Vec<UserRecord>,
    /// Distinct company names of the unfiltered collection, first-seen order.
    pub companies: Vec<String>,
    /// `max(1, ceil(filtered / page_size))`.
    pub total_pages: usize,
    /// Number of records that passed the filter, across all pages.
    pub filtered_count: usize,
}

/// Distinct `company.name` values in first-seen order.
pub fn distinct_companies(users: &[UserRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    users
        .iter()
        .filter(|user| seen.insert(user.company.name.as_str()))
        .map(|user| user.company.name.clone())
        .collect()
}

pub fn total_pages(filtered_count: usize, page_size: usize) -> usize {
    filtered_count.div_ceil(page_size.max(1)).max(1)
}

/// Filter, then slice out `page`. Does not clamp: `page == 0` or a page past the
/// end yields no items.
pub fn compute_view(users: &[UserRecord], filters: &FilterState, page: PageState) -> DirectoryView {
    let page_size = page.page_size.max(1);
    let filtered: Vec<&UserRecord> = users.iter().filter(|user| filters.matches(user)).collect();

    let visible_items = match page.page.checked_sub(1) {
        Some(index) => filtered
            .iter()
            .skip(index.saturating_mul(page_size))
            .take(page_size)
            .map(|user| (*user).clone())
            .collect(),
        None => Vec::new(),
    };

    DirectoryView {
        visible_items,
        companies: distinct_companies(users),
        total_pages: total_pages(filtered.len(), page_size),
        filtered_count: filtered.len(),
    }
}

/// Filter and page controls owned by one directory view.
///
/// Changing the search text or the company returns to the first page, and the
/// page is clamped to `[1, total_pages]` whenever the view is computed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryState {
    filters: FilterState,
    page: PageState,
}

impl DirectoryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filters: FilterState::default(),
            page: PageState::new(page_size),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.page.page = 1;
    }

    pub fn set_company(&mut self, company: CompanyFilter) {
        self.filters.company = company;
        self.page.page = 1;
    }

    /// Jump to `page`, clamped to `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page.page = page.clamp(1, total_pages.max(1));
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.go_to_page(self.page.page.saturating_add(1), total_pages);
    }

    pub fn prev_page(&mut self, total_pages: usize) {
        self.go_to_page(self.page.page.saturating_sub(1), total_pages);
    }

    pub fn has_prev(&self) -> bool {
        self.page.page > 1
    }

    pub fn has_next(&self, total_pages: usize) -> bool {
        self.page.page < total_pages
    }

    /// Page numbers offered by the pagination control.
    pub fn page_numbers(total_pages: usize) -> impl Iterator<Item = usize> {
        1..=total_pages.max(1)
    }

    /// Compute the view for `users`, first pulling the page back into range.
    pub fn view(&mut self, users: &[UserRecord]) -> DirectoryView {
        let requested = self.page.page;
        let view = compute_view(users, &self.filters, self.page);
        self.go_to_page(requested, view.total_pages);
        if self.page.page == requested {
            view
        } else {
            compute_view(users, &self.filters, self.page)
        }
    }
}
