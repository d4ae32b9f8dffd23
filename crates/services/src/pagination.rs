//! # Pagination
//!
//! Page numbers come straight from the query string. Anything that is not an
//! integer selects the first page; an integer outside `1..=num_pages` selects
//! the last page. An empty listing still has one (empty) page.

use serde::Serialize;

pub const PROJECTS_PER_PAGE: i64 = 6;
pub const CLUBS_PER_PAGE: i64 = 6;
pub const SCHOOLS_PER_PAGE: i64 = 4;

/// The resolved slice of a listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub per_page: i64,
    pub total: i64,
}

impl PageWindow {
    pub fn resolve(requested: Option<&str>, total: i64, per_page: i64) -> Self {
        let per_page = per_page.max(1);
        let total = total.max(0);
        let num_pages = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };

        let number = match requested.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if (1..=num_pages).contains(&n) => n,
            Some(Ok(_)) => num_pages,
        };

        Self {
            number,
            num_pages,
            per_page,
            total,
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            total: self.total,
            has_previous: self.number > 1,
            has_next: self.number < self.num_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub per_page: i64,
    pub total: i64,
    pub has_previous: bool,
    pub has_next: bool,
}
