//! A browsing session: the state behind one record table.
//!
//! The session owns the criteria. Editors get a copy from
//! [`Session::begin_edit`] and hand back an [`EditOutcome`]; nothing outside
//! the session mutates the live criteria.

use log::debug;
use roster_seeker::Query;

use crate::criteria::{FilterCriteria, ALL};
use crate::engine::QueryEngine;
use crate::error::Result;
use crate::facets::{AgeBounds, FacetColumn, Facets};
use crate::pagination::{clamp_page, PageResult, PageSize};
use crate::predicate::PredicateBuilder;
use crate::record::Student;
use crate::source::{FacetSource, RecordSource};
use crate::summary::ActiveFilterSummary;

/// How a filter editor was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Replace the criteria with these.
    Applied(FilterCriteria),
    /// Reset everything to the dataset defaults.
    Cleared,
    /// Leave the criteria alone.
    Cancelled,
}

pub struct Session<S> {
    engine: QueryEngine<S>,
    criteria: FilterCriteria,
    page_size: PageSize,
    facets: Facets,
    current: PageResult,
    /// Set when the criteria changed without a refresh.
    stale: bool,
}

impl<S: RecordSource + FacetSource> Session<S> {
    /// Loads facets, resets the criteria against them and fetches page 1.
    pub fn new(engine: QueryEngine<S>, page_size: PageSize) -> Result<Self> {
        let facets = engine.facets()?;
        let criteria = FilterCriteria::defaults(facets.age_bounds);
        let current = engine.page(&criteria, 1, page_size)?;
        Ok(Session {
            engine,
            criteria,
            page_size,
            facets,
            current,
            stale: false,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn engine(&self) -> &QueryEngine<S> {
        &self.engine
    }

    pub fn into_engine(self) -> QueryEngine<S> {
        self.engine
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The page shown after the last refresh.
    pub fn current(&self) -> &PageResult {
        &self.current
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn bounds(&self) -> AgeBounds {
        self.facets.age_bounds
    }

    pub fn summary(&self) -> ActiveFilterSummary {
        ActiveFilterSummary::new(&self.criteria, self.bounds(), self.current.total)
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Runs a free-text search from page 1. The per-field name filters are
    /// dropped so the two kinds of name matching do not stack.
    pub fn search(&mut self, term: &str) -> Result<&PageResult> {
        self.criteria.search_term = term.trim().to_string();
        self.criteria.clear_name_filters();
        self.goto_page(1)
    }

    /// Starts editing the detailed filters.
    ///
    /// The search term is cleared from the live criteria. The returned copy
    /// has an unknown track/strand replaced by `All` and both ages clamped to
    /// the range an editor offers.
    pub fn begin_edit(&mut self) -> FilterCriteria {
        if !self.criteria.search_term.is_empty() {
            self.criteria.search_term.clear();
            self.stale = true;
        }

        let mut draft = self.criteria.clone();
        if draft.track_and_strand != ALL
            && !self
                .facets
                .contains(FacetColumn::TrackAndStrand, &draft.track_and_strand)
        {
            draft.track_and_strand = ALL.to_string();
        }
        let (lo, hi) = editor_age_range(self.bounds());
        draft.min_age = draft.min_age.clamp(lo, hi);
        draft.max_age = draft.max_age.clamp(lo, hi);
        draft
    }

    /// Applies the result of an edit. Returns `true` if the criteria changed.
    pub fn apply_edit(&mut self, outcome: EditOutcome) -> Result<bool> {
        let changed = match outcome {
            EditOutcome::Applied(mut criteria) => {
                trim_text(&mut criteria);
                self.criteria = criteria;
                true
            }
            EditOutcome::Cleared => {
                self.criteria.reset(self.bounds());
                true
            }
            EditOutcome::Cancelled => false,
        };
        if changed {
            self.goto_page(1)?;
        } else if self.stale {
            self.refresh()?;
        }
        Ok(changed)
    }

    // ========================================================================
    // Paging
    // ========================================================================

    pub fn set_page_size(&mut self, page_size: PageSize) -> Result<&PageResult> {
        self.page_size = page_size;
        self.goto_page(1)
    }

    /// Moves to `page`, clamped to the available pages.
    pub fn goto_page(&mut self, page: usize) -> Result<&PageResult> {
        self.current.page = page;
        self.refresh()
    }

    pub fn next_page(&mut self) -> Result<&PageResult> {
        self.goto_page(self.current.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> Result<&PageResult> {
        self.goto_page(self.current.page.saturating_sub(1))
    }

    /// Fetches the current page, clamped into range.
    ///
    /// Total and page come from one read; a second read happens only when
    /// the requested page lies past the end.
    pub fn refresh(&mut self) -> Result<&PageResult> {
        let mut result = self
            .engine
            .page(&self.criteria, self.current.page, self.page_size)?;
        let page = clamp_page(result.page, result.total_pages);
        if page != result.page {
            result = self.engine.page(&self.criteria, page, self.page_size)?;
        }
        self.current = result;
        self.stale = false;
        debug!(
            "session at page {}/{} with {} matches",
            self.current.page, self.current.total_pages, self.current.total
        );
        Ok(&self.current)
    }

    /// Re-reads the facet values, for example after an import.
    pub fn reload_facets(&mut self) -> Result<&Facets> {
        self.facets = self.engine.facets()?;
        Ok(&self.facets)
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// The student with this LRN, if it matches the current criteria.
    pub fn find_by_lrn(&self, lrn: &str) -> Result<Option<Student>> {
        if let Some(found) = self.current.records.iter().find(|s| s.lrn == lrn) {
            return Ok(Some(found.clone()));
        }
        let query: Query = PredicateBuilder::build(&self.criteria)
            .and_eq(Student::LRN, lrn)
            .limit(1);
        Ok(self.engine.source().fetch(&query)?.into_iter().next())
    }

    /// `LRN: <lrn>, Name: <full name>` for each selected student that is
    /// part of the current result, in selection order.
    pub fn export_lines(&self, lrns: &[&str]) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(lrns.len());
        for lrn in lrns {
            if let Some(student) = self.find_by_lrn(lrn)? {
                lines.push(format!("LRN: {}, Name: {}", student.lrn, student.full_name()));
            }
        }
        Ok(lines)
    }
}

/// Ages an editor lets the user pick: from the dataset minimum to twenty
/// past the dataset maximum.
pub fn editor_age_range(bounds: AgeBounds) -> (u32, u32) {
    (bounds.min, bounds.min.max(bounds.max.saturating_add(20)))
}

fn trim_text(criteria: &mut FilterCriteria) {
    for text in [
        &mut criteria.search_term,
        &mut criteria.first_name,
        &mut criteria.last_name,
        &mut criteria.middle_name,
    ] {
        let trimmed = text.trim();
        if trimmed.len() != text.len() {
            *text = trimmed.to_string();
        }
    }
}
