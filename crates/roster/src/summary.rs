//! Status line describing the active filters and the match count.

use std::fmt;

use serde::Serialize;

use crate::criteria::FilterCriteria;
use crate::facets::AgeBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveFilterSummary {
    pub active_filters: usize,
    pub search_active: bool,
    pub specific_filters: bool,
    pub total: usize,
}

impl ActiveFilterSummary {
    pub fn new(criteria: &FilterCriteria, bounds: AgeBounds, total: usize) -> Self {
        ActiveFilterSummary {
            active_filters: criteria.active_count(bounds),
            search_active: criteria.search_active(),
            specific_filters: criteria.has_specific_filters(bounds),
            total,
        }
    }

    /// `Showing All Records: …`, `Search Active | …` or `K Active Filters | …`.
    pub fn label(&self) -> String {
        let records = plural(self.total, "Record Found", "Records Found");
        if self.active_filters == 0 {
            format!("Showing All Records: {records}")
        } else if self.search_active && !self.specific_filters {
            format!("Search Active | {records}")
        } else {
            let filters = plural(self.active_filters, "Active Filter", "Active Filters");
            format!("{filters} | {records}")
        }
    }
}

impl fmt::Display for ActiveFilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> AgeBounds {
        AgeBounds::new(12, 18)
    }

    #[test]
    fn nothing_active() {
        let c = FilterCriteria::defaults(bounds());
        assert_eq!(
            ActiveFilterSummary::new(&c, bounds(), 120).label(),
            "Showing All Records: 120 Records Found"
        );
        assert_eq!(
            ActiveFilterSummary::new(&c, bounds(), 1).to_string(),
            "Showing All Records: 1 Record Found"
        );
    }

    #[test]
    fn search_only() {
        let mut c = FilterCriteria::defaults(bounds());
        c.search_term = "cruz".into();
        assert_eq!(
            ActiveFilterSummary::new(&c, bounds(), 0).label(),
            "Search Active | 0 Records Found"
        );
    }

    #[test]
    fn counted_filters() {
        let mut c = FilterCriteria::defaults(bounds());
        c.section = "Rizal".into();
        assert_eq!(
            ActiveFilterSummary::new(&c, bounds(), 7).label(),
            "1 Active Filter | 7 Records Found"
        );
        c.search_term = "a".into();
        c.include_male = false;
        assert_eq!(
            ActiveFilterSummary::new(&c, bounds(), 1).label(),
            "3 Active Filters | 1 Record Found"
        );
    }
}
