//! Page arithmetic.
//!
//! Pages are 1-indexed. A requested page of 0 is read as page 1, and there
//! is always at least one page, even for an empty result.

use std::fmt;
use std::str::FromStr;

use roster_seeker::Query;
use serde::{Deserialize, Serialize};

use crate::record::Student;

/// Page size choices offered to the user.
pub const PAGE_SIZE_CHOICES: [usize; 5] = [10, 25, 50, 100, 250];

/// Rows per page, or everything on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PageSizeRepr", into = "PageSizeRepr")]
pub enum PageSize {
    All,
    Rows(usize),
}

impl PageSize {
    pub const DEFAULT: PageSize = PageSize::Rows(25);

    /// A fixed page size; zero is raised to one.
    pub fn rows(n: usize) -> Self {
        PageSize::Rows(n.max(1))
    }

    /// The row limit, or `None` for [`PageSize::All`].
    pub fn limit(self) -> Option<usize> {
        match self {
            PageSize::All => None,
            PageSize::Rows(n) => Some(n.max(1)),
        }
    }

    /// The rows covered by `page`.
    pub fn window(self, page: usize) -> Window {
        Window {
            offset: offset(page, self),
            limit: self.limit(),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::DEFAULT
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::All => f.write_str("all"),
            PageSize::Rows(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageSize::All);
        }
        s.parse::<usize>()
            .map(PageSize::rows)
            .map_err(|_| format!("invalid page size '{s}': expected a number or 'all'"))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PageSizeRepr {
    Rows(usize),
    Keyword(String),
}

impl TryFrom<PageSizeRepr> for PageSize {
    type Error = String;

    fn try_from(repr: PageSizeRepr) -> Result<Self, Self::Error> {
        match repr {
            PageSizeRepr::Rows(n) => Ok(PageSize::rows(n)),
            PageSizeRepr::Keyword(word) => word.parse(),
        }
    }
}

impl From<PageSize> for PageSizeRepr {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::All => PageSizeRepr::Keyword("all".to_string()),
            PageSize::Rows(n) => PageSizeRepr::Rows(n),
        }
    }
}

/// An offset and an optional row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Window {
    /// Attaches this window to a query.
    pub fn apply(self, query: Query) -> Query {
        let query = query.offset(self.offset);
        match self.limit {
            Some(limit) => query.limit(limit),
            None => query,
        }
    }
}

/// Number of pages needed for `total` rows; never less than one.
pub fn total_pages(total: usize, page_size: PageSize) -> usize {
    match page_size.limit() {
        None => 1,
        Some(rows) => total.div_ceil(rows).max(1),
    }
}

/// Clamps `requested` into `1..=total_pages`.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// Index of the first row on `page`.
pub fn offset(page: usize, page_size: PageSize) -> usize {
    match page_size.limit() {
        None => 0,
        Some(rows) => (page.max(1) - 1).saturating_mul(rows),
    }
}

/// One page of matches together with the numbers needed to render a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    pub records: Vec<Student>,
    /// Matches across all pages.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: PageSize,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// 1-based positions of the first and last record on this page, if any.
    pub fn span(&self) -> Option<(usize, usize)> {
        if self.records.is_empty() {
            return None;
        }
        let first = offset(self.page, self.page_size) + 1;
        Some((first, first + self.records.len() - 1))
    }
}
