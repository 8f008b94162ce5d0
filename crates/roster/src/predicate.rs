//! Translation of [`FilterCriteria`] into a seeker [`Query`].

use roster_seeker::{Inclusion, Query, Term};

use crate::criteria::{FilterCriteria, ALL};
use crate::record::{Sex, Student};

/// Builds the clause list shared by every backend.
pub struct PredicateBuilder;

impl PredicateBuilder {
    /// Clauses in a fixed order, implicitly ANDed, sorted by last name, then
    /// first name, then LRN. The result carries no window.
    ///
    /// ```
    /// use roster::{FilterCriteria, PredicateBuilder, Sex, Student};
    /// use roster_seeker::Seekable;
    ///
    /// let criteria = FilterCriteria {
    ///     search_term: "SANTOS".into(),
    ///     ..FilterCriteria::default()
    /// };
    /// let query = PredicateBuilder::build(&criteria);
    ///
    /// let ana = Student::new("1", "Santos", "Ana").sex(Sex::Female).age(16);
    /// assert!(query.matches(&ana, Student::accessor));
    /// ```
    pub fn build(criteria: &FilterCriteria) -> Query {
        let mut query = Query::new();

        if !criteria.search_term.is_empty() {
            query = query.and_contains(search_terms(), &criteria.search_term);
        }
        if !criteria.first_name.is_empty() {
            query = query.and_contains([Term::field(Student::FIRST_NAME)], &criteria.first_name);
        }
        if !criteria.last_name.is_empty() {
            query = query.and_contains([Term::field(Student::LAST_NAME)], &criteria.last_name);
        }
        if let Some(initial) = criteria.middle_name.chars().next() {
            query = if criteria.middle_initial_only {
                query.and_startswith(Student::MIDDLE_NAME, initial.encode_utf8(&mut [0; 4]))
            } else {
                query.and_contains([Term::field(Student::MIDDLE_NAME)], &criteria.middle_name)
            };
        }

        for (field, value) in [
            (Student::GRADE_LEVEL, &criteria.grade_level),
            (Student::SECTION, &criteria.section),
            (Student::TRACK_AND_STRAND, &criteria.track_and_strand),
        ] {
            if value != ALL {
                query = query.and_eq(field, value.as_str());
            }
        }

        query
            .and_pair(
                Student::SEX,
                Inclusion::new(Sex::Male.as_str(), criteria.include_male),
                Inclusion::new(Sex::Female.as_str(), criteria.include_female),
            )
            .and_range(
                Student::AGE,
                i64::from(criteria.min_age),
                i64::from(criteria.max_age),
            )
            .order_asc(Student::LAST_NAME)
            .order_asc(Student::FIRST_NAME)
            .order_asc(Student::LRN)
            .build()
    }
}

/// Operands of the free-text search: the LRN, each name, and the two
/// combined name forms people actually type.
fn search_terms() -> [Term; 6] {
    [
        Term::field(Student::LRN),
        Term::field(Student::FIRST_NAME),
        Term::field(Student::LAST_NAME),
        Term::field(Student::MIDDLE_NAME),
        Term::concat([
            Term::field(Student::FIRST_NAME),
            Term::literal(" "),
            Term::field(Student::LAST_NAME),
        ]),
        Term::concat([
            Term::field(Student::LAST_NAME),
            Term::literal(", "),
            Term::field(Student::FIRST_NAME),
        ]),
    ]
}
