//! Storage seams.
//!
//! The engine never talks to a database directly. It hands a compiled
//! [`Query`] to a [`RecordSource`] and asks a [`FacetSource`] for the values
//! that populate the filter choices. [`MemoryStore`](crate::MemoryStore) and
//! [`SqliteStore`](crate::SqliteStore) implement both.

use std::collections::BTreeSet;

use roster_seeker::Query;

use crate::error::Result;
use crate::facets::{FacetColumn, NumericColumn};
use crate::record::Student;

/// Produces the records matching a query.
///
/// The query carries its own ordering and window; implementations must
/// honor both and must return an empty list for an offset past the end.
pub trait RecordSource {
    fn fetch(&self, query: &Query) -> Result<Vec<Student>>;

    /// Number of matches, ignoring the query's window.
    fn count_matching(&self, query: &Query) -> Result<usize>;

    /// One page plus the total match count.
    fn fetch_counted(&self, query: &Query) -> Result<(Vec<Student>, usize)> {
        let total = self.count_matching(query)?;
        let records = self.fetch(query)?;
        Ok((records, total))
    }
}

/// Supplies the distinct values and numeric bounds shown as filter choices.
pub trait FacetSource {
    /// Distinct values of `column`, without nulls, empty strings or any value
    /// listed in `excluded`.
    fn distinct_non_empty(&self, column: FacetColumn, excluded: &[&str])
        -> Result<BTreeSet<String>>;

    /// Smallest and largest value of `column`, or `None` with no rows.
    fn min_max(&self, column: NumericColumn) -> Result<Option<(u32, u32)>>;
}

/// A backend that serves both records and facets.
pub trait Store: RecordSource + FacetSource {}

impl<S: RecordSource + FacetSource + ?Sized> Store for S {}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn fetch(&self, query: &Query) -> Result<Vec<Student>> {
        (**self).fetch(query)
    }

    fn count_matching(&self, query: &Query) -> Result<usize> {
        (**self).count_matching(query)
    }

    fn fetch_counted(&self, query: &Query) -> Result<(Vec<Student>, usize)> {
        (**self).fetch_counted(query)
    }
}

impl<S: FacetSource + ?Sized> FacetSource for Box<S> {
    fn distinct_non_empty(
        &self,
        column: FacetColumn,
        excluded: &[&str],
    ) -> Result<BTreeSet<String>> {
        (**self).distinct_non_empty(column, excluded)
    }

    fn min_max(&self, column: NumericColumn) -> Result<Option<(u32, u32)>> {
        (**self).min_max(column)
    }
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn fetch(&self, query: &Query) -> Result<Vec<Student>> {
        (**self).fetch(query)
    }

    fn count_matching(&self, query: &Query) -> Result<usize> {
        (**self).count_matching(query)
    }

    fn fetch_counted(&self, query: &Query) -> Result<(Vec<Student>, usize)> {
        (**self).fetch_counted(query)
    }
}

impl<S: FacetSource + ?Sized> FacetSource for &S {
    fn distinct_non_empty(
        &self,
        column: FacetColumn,
        excluded: &[&str],
    ) -> Result<BTreeSet<String>> {
        (**self).distinct_non_empty(column, excluded)
    }

    fn min_max(&self, column: NumericColumn) -> Result<Option<(u32, u32)>> {
        (**self).min_max(column)
    }
}
