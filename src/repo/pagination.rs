use serde::Serialize;

/// Which page of a list to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub number: i64,
    pub per_page: i64,
}

/// One page of results plus what a template needs to render page links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

/// The slice of rows a page covers once the total row count is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub number: i64,
    pub num_pages: i64,
    pub offset: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(number: i64, per_page: i64) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Parses a `?page=` value; anything that is not a positive integer means page 1
    pub fn parse(raw: Option<&str>, per_page: i64) -> Self {
        let number = raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1);
        Self::new(number, per_page)
    }

    /// A single page holding every row
    pub fn all() -> Self {
        Self::new(1, i64::MAX)
    }

    /// Clamps the requested page into range. Past the end means the last page.
    pub(crate) fn window(&self, total: i64) -> Window {
        let total = total.max(0);
        let num_pages = if total == 0 {
            1
        } else {
            (total - 1) / self.per_page + 1
        };
        let number = self.number.clamp(1, num_pages);
        Window {
            number,
            num_pages,
            offset: (number - 1).saturating_mul(self.per_page),
            limit: self.per_page,
        }
    }
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, window: Window, total: i64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total,
            has_previous: window.number > 1,
            has_next: window.number < window.num_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}
