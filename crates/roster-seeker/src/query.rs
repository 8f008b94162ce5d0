//! Query builder and in-memory executor.
//!
//! A [`Query`] is an ordered list of clauses (implicitly ANDed), a list of
//! sort keys and an optional limit/offset window. The same value can be run
//! against a slice with [`Query::filter`] or compiled for a SQL backend with
//! [`Query::to_sql`](crate::sql).

use crate::clause::{Clause, ClauseValue, Inclusion, Term};
use crate::ordering::{compare_by_orderings, Dir, OrderBy};
use crate::value::Value;

/// A filter, an ordering and a window.
///
/// # Example
///
/// ```
/// use roster_seeker::{Query, Term, Value};
///
/// struct Pupil {
///     name: String,
///     age: u32,
/// }
///
/// fn accessor<'a>(p: &'a Pupil, field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::String(&p.name),
///         "age" => Value::Int(p.age as i64),
///         _ => Value::None,
///     }
/// }
///
/// let pupils = vec![
///     Pupil { name: "Rosa".into(), age: 14 },
///     Pupil { name: "Andres".into(), age: 16 },
///     Pupil { name: "Rosalind".into(), age: 19 },
/// ];
///
/// let query = Query::new()
///     .and_contains([Term::field("name")], "ros")
///     .and_range("age", 12, 18)
///     .order_asc("name")
///     .build();
///
/// let found = query.filter(&pupils, accessor);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].name, "Rosa");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    clauses: Vec<Clause>,
    orderings: Vec<OrderBy>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl Query {
    /// An empty query matches every item.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Clause builders
    // ========================================================================

    /// Adds a clause.
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Adds a case-insensitive substring clause over one or more operands.
    pub fn and_contains(self, terms: impl IntoIterator<Item = Term>, needle: &str) -> Self {
        self.and(Clause::substring(terms, needle))
    }

    /// Adds a case-insensitive prefix clause.
    pub fn and_startswith(self, field: &str, needle: &str) -> Self {
        self.and(Clause::prefix(Term::field(field), needle))
    }

    /// Adds an equality clause.
    pub fn and_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(Clause::equals(field, value))
    }

    /// Adds an inclusive range clause.
    pub fn and_range(self, field: &str, min: i64, max: i64) -> Self {
        self.and(Clause::range(field, min, max))
    }

    /// Adds a tri-state inclusion clause over a two-valued field.
    pub fn and_pair(self, field: &str, first: Inclusion, second: Inclusion) -> Self {
        self.and(Clause::boolean_pair(field, first, second))
    }

    // ========================================================================
    // Ordering and window
    // ========================================================================

    pub fn order_by(mut self, field: &str, dir: Dir) -> Self {
        self.orderings.push(OrderBy::new(field, dir));
        self
    }

    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, Dir::Asc)
    }

    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, Dir::Desc)
    }

    /// Caps the number of returned items.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Skips the first `n` matching items.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Same clauses and ordering, with the window removed.
    pub fn unbounded(&self) -> Self {
        Query {
            clauses: self.clauses.clone(),
            orderings: self.orderings.clone(),
            limit: None,
            offset: None,
        }
    }

    /// Finalizes the builder chain.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    /// Returns `true` if no clause constrains the result.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests one item; stops at the first clause that fails.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.clauses
            .iter()
            .all(|clause| clause.matches(item, &accessor))
    }

    /// Matching items, sorted, then windowed.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        self.filter_counted(items, accessor).0
    }

    /// Matching items (sorted and windowed) together with the total number
    /// of matches before the window was applied.
    ///
    /// Both numbers come from a single pass over `items`. An offset at or
    /// past the total yields an empty page, not an error.
    pub fn filter_counted<'a, T, F>(&self, items: &'a [T], accessor: F) -> (Vec<&'a T>, usize)
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let mut matched: Vec<&'a T> = items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .collect();
        let total = matched.len();

        if !self.orderings.is_empty() {
            matched.sort_by(|a, b| compare_by_orderings(*a, *b, &self.orderings, &accessor));
        }

        let offset = self.offset.unwrap_or(0);
        if offset >= total {
            return (Vec::new(), total);
        }
        let page = matched
            .into_iter()
            .skip(offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();
        (page, total)
    }

    /// Clones the matching items.
    pub fn filter_cloned<T, F>(&self, items: &[T], accessor: F) -> Vec<T>
    where
        T: Clone,
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.filter(items, accessor).into_iter().cloned().collect()
    }

    /// Number of matching items, ignoring the window.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .count()
    }

    /// First matching item in input order.
    pub fn find<'a, T, F>(&self, items: &'a [T], accessor: F) -> Option<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items.iter().find(|item| self.matches(*item, &accessor))
    }
}
