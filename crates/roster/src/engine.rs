//! The filter-and-paginate engine.
//!
//! [`QueryEngine`] is stateless: every call takes the criteria by reference,
//! builds one [`Query`](roster_seeker::Query) from it and hands that to the
//! source. Rows, counts and pages therefore always agree on what matches.

use std::collections::BTreeSet;

use log::{debug, warn};
use roster_seeker::Seekable;

use crate::criteria::FilterCriteria;
use crate::error::Result;
use crate::facets::{AgeBounds, FacetCatalog, FacetColumn, Facets};
use crate::pagination::{total_pages, PageResult, PageSize};
use crate::predicate::PredicateBuilder;
use crate::record::Student;
use crate::source::{FacetSource, RecordSource};

/// Answers filter, count, page and facet requests against one source.
///
/// # Example
///
/// ```
/// use roster::{FilterCriteria, MemoryStore, PageSize, QueryEngine, Sex, Student};
///
/// let store = MemoryStore::new(vec![
///     Student::new("1", "Santos", "Jose").sex(Sex::Male).age(16),
///     Student::new("2", "Reyes", "Ana").sex(Sex::Female).age(15),
/// ])
/// .unwrap();
/// let engine = QueryEngine::new(store);
///
/// let mut criteria = FilterCriteria::default();
/// engine.reset(&mut criteria).unwrap();
/// criteria.include_male = false;
///
/// let page = engine.page(&criteria, 1, PageSize::rows(10)).unwrap();
/// assert_eq!(page.total, 1);
/// assert_eq!(page.records[0].first_name, "Ana");
/// ```
#[derive(Debug, Clone)]
pub struct QueryEngine<S> {
    source: S,
}

impl<S> QueryEngine<S> {
    pub fn new(source: S) -> Self {
        QueryEngine { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Evaluates the criteria against one record without touching the source.
    pub fn matches(&self, record: &Student, criteria: &FilterCriteria) -> bool {
        PredicateBuilder::build(criteria).matches(record, Student::accessor)
    }
}

impl<S: RecordSource + FacetSource> QueryEngine<S> {
    // ========================================================================
    // Records
    // ========================================================================

    /// Matching students for one page, sorted by last name then first name.
    ///
    /// Page 0 is read as page 1; a page past the end is empty.
    pub fn query(
        &self,
        criteria: &FilterCriteria,
        page: usize,
        page_size: PageSize,
    ) -> Result<Vec<Student>> {
        let query = page_size.window(page).apply(PredicateBuilder::build(criteria));
        debug!("query page {page} ({page_size}): {}", describe(&query));
        self.source
            .fetch(&query)
            .inspect_err(|err| warn!("fetching students failed: {err}"))
    }

    /// Number of matching students across all pages.
    pub fn count(&self, criteria: &FilterCriteria) -> Result<usize> {
        let query = PredicateBuilder::build(criteria);
        self.source
            .count_matching(&query)
            .inspect_err(|err| warn!("counting students failed: {err}"))
    }

    /// One page together with the total and the page count.
    ///
    /// The page number is reported as requested (0 read as 1); clamping it
    /// to the last page is up to the caller.
    pub fn page(
        &self,
        criteria: &FilterCriteria,
        page: usize,
        page_size: PageSize,
    ) -> Result<PageResult> {
        let page = page.max(1);
        let query = page_size.window(page).apply(PredicateBuilder::build(criteria));
        let (records, total) = self
            .source
            .fetch_counted(&query)
            .inspect_err(|err| warn!("fetching page {page} failed: {err}"))?;
        debug!("page {page}: {} of {total} matches", records.len());
        Ok(PageResult {
            records,
            total,
            page,
            total_pages: total_pages(total, page_size),
            page_size,
        })
    }

    // ========================================================================
    // Facets
    // ========================================================================

    pub fn distinct_values(&self, column: FacetColumn) -> Result<BTreeSet<String>> {
        FacetCatalog::new(&self.source)
            .distinct_values(column)
            .inspect_err(|err| warn!("reading {column} values failed: {err}"))
    }

    pub fn age_bounds(&self) -> Result<AgeBounds> {
        FacetCatalog::new(&self.source)
            .age_bounds()
            .inspect_err(|err| warn!("reading age bounds failed: {err}"))
    }

    pub fn facets(&self) -> Result<Facets> {
        FacetCatalog::new(&self.source)
            .snapshot()
            .inspect_err(|err| warn!("reading facets failed: {err}"))
    }

    // ========================================================================
    // Criteria helpers
    // ========================================================================

    /// Resets `criteria` against the current dataset bounds.
    pub fn reset(&self, criteria: &mut FilterCriteria) -> Result<()> {
        criteria.reset(self.age_bounds()?);
        Ok(())
    }

    pub fn active_filter_count(&self, criteria: &FilterCriteria) -> Result<usize> {
        Ok(criteria.active_count(self.age_bounds()?))
    }
}

fn describe(query: &roster_seeker::Query) -> String {
    query
        .clauses()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" AND ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::record::Sex;

    fn engine() -> QueryEngine<MemoryStore> {
        let students = (1..=12)
            .map(|i| {
                Student::new(format!("{i:03}"), format!("Last{:02}", i % 5), format!("First{i:02}"))
                    .sex(if i % 2 == 0 { Sex::Female } else { Sex::Male })
                    .age(12 + i % 7)
                    .enrolled(format!("Grade {}", 7 + i % 3), "A", "N/A")
            })
            .collect();
        QueryEngine::new(MemoryStore::new(students).unwrap())
    }

    #[test]
    fn query_and_count_agree() {
        let engine = engine();
        let criteria = FilterCriteria {
            include_female: false,
            ..FilterCriteria::default()
        };
        let all = engine.query(&criteria, 1, PageSize::All).unwrap();
        assert_eq!(all.len(), engine.count(&criteria).unwrap());
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn page_zero_is_page_one() {
        let engine = engine();
        let criteria = FilterCriteria::default();
        assert_eq!(
            engine.query(&criteria, 0, PageSize::rows(5)).unwrap(),
            engine.query(&criteria, 1, PageSize::rows(5)).unwrap()
        );
        assert_eq!(engine.page(&criteria, 0, PageSize::rows(5)).unwrap().page, 1);
    }

    #[test]
    fn page_past_end_is_empty_not_error() {
        let engine = engine();
        let result = engine.page(&FilterCriteria::default(), 10, PageSize::rows(5)).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total, 12);
        assert_eq!(result.total_pages, 3);
    }

    #[test]
    fn results_are_sorted_by_name() {
        let engine = engine();
        let all = engine.query(&FilterCriteria::default(), 1, PageSize::All).unwrap();
        let keys: Vec<_> = all
            .iter()
            .map(|s| (s.last_name.clone(), s.first_name.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn reset_and_active_count_use_dataset_bounds() {
        let engine = engine();
        assert_eq!(engine.age_bounds().unwrap(), AgeBounds::new(12, 18));

        let mut criteria = FilterCriteria::default();
        assert_eq!(engine.active_filter_count(&criteria).unwrap(), 1);
        engine.reset(&mut criteria).unwrap();
        assert_eq!((criteria.min_age, criteria.max_age), (12, 23));
        assert_eq!(engine.active_filter_count(&criteria).unwrap(), 0);
    }

    #[test]
    fn matches_single_record() {
        let engine = engine();
        let s = Student::new("x", "Santos", "Ana").sex(Sex::Female).age(14);
        let criteria = FilterCriteria {
            search_term: "SAN".into(),
            ..FilterCriteria::default()
        };
        assert!(engine.matches(&s, &criteria));
    }
}
