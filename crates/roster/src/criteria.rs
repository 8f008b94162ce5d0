//! Filter criteria and their notion of "active".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::facets::AgeBounds;

/// Categorical sentinel meaning "do not filter on this column".
pub const ALL: &str = "All";

/// One independently filterable dimension of [`FilterCriteria`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Search,
    FirstName,
    LastName,
    MiddleName,
    GradeLevel,
    Section,
    TrackAndStrand,
    Sex,
    Age,
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Search => "search",
            Dimension::FirstName => "first name",
            Dimension::LastName => "last name",
            Dimension::MiddleName => "middle name",
            Dimension::GradeLevel => "grade level",
            Dimension::Section => "section",
            Dimension::TrackAndStrand => "track/strand",
            Dimension::Sex => "sex",
            Dimension::Age => "age",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user asked to see.
///
/// Every combination of values is valid. An inverted age range or an
/// unknown section just matches nothing; criteria are never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Free text matched against the LRN and every name form.
    pub search_term: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    /// Match only the first character of `middle_name` as a prefix.
    pub middle_initial_only: bool,
    pub grade_level: String,
    pub section: String,
    pub track_and_strand: String,
    pub include_male: bool,
    pub include_female: bool,
    pub min_age: u32,
    pub max_age: u32,
}

impl Default for FilterCriteria {
    /// Wide open: no text, every category, both sexes, ages 0 to 100.
    fn default() -> Self {
        FilterCriteria {
            search_term: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            middle_name: String::new(),
            middle_initial_only: false,
            grade_level: ALL.to_string(),
            section: ALL.to_string(),
            track_and_strand: ALL.to_string(),
            include_male: true,
            include_female: true,
            min_age: 0,
            max_age: 100,
        }
    }
}

impl FilterCriteria {
    /// Criteria as they are right after [`FilterCriteria::reset`].
    pub fn defaults(bounds: AgeBounds) -> Self {
        let mut criteria = FilterCriteria::default();
        criteria.reset(bounds);
        criteria
    }

    /// The age pair a reset produces: the dataset minimum, and the maximum
    /// plus five (or the minimum plus twenty when the bounds collapse).
    pub fn default_age_range(bounds: AgeBounds) -> (u32, u32) {
        let max = if bounds.max > bounds.min {
            bounds.max.saturating_add(5)
        } else {
            bounds.min.saturating_add(20)
        };
        (bounds.min, max)
    }

    pub fn reset(&mut self, bounds: AgeBounds) {
        let (min_age, max_age) = FilterCriteria::default_age_range(bounds);
        *self = FilterCriteria {
            min_age,
            max_age,
            ..FilterCriteria::default()
        };
    }

    /// Dimensions that differ from their reset state, in display order.
    ///
    /// `middle_initial_only` only modifies the middle-name filter and is
    /// never a dimension of its own.
    pub fn active_dimensions(&self, bounds: AgeBounds) -> Vec<Dimension> {
        let checks = [
            (Dimension::Search, !self.search_term.is_empty()),
            (Dimension::FirstName, !self.first_name.is_empty()),
            (Dimension::LastName, !self.last_name.is_empty()),
            (Dimension::MiddleName, !self.middle_name.is_empty()),
            (Dimension::GradeLevel, self.grade_level != ALL),
            (Dimension::Section, self.section != ALL),
            (Dimension::TrackAndStrand, self.track_and_strand != ALL),
            (Dimension::Sex, self.sex_inclusion() != (true, true)),
            (
                Dimension::Age,
                (self.min_age, self.max_age) != FilterCriteria::default_age_range(bounds),
            ),
        ];
        checks
            .into_iter()
            .filter_map(|(dimension, active)| active.then_some(dimension))
            .collect()
    }

    pub fn active_count(&self, bounds: AgeBounds) -> usize {
        self.active_dimensions(bounds).len()
    }

    pub fn is_active(&self, bounds: AgeBounds) -> bool {
        self.active_count(bounds) > 0
    }

    /// Like [`FilterCriteria::is_active`], but ignoring the search term.
    pub fn has_specific_filters(&self, bounds: AgeBounds) -> bool {
        self.active_dimensions(bounds)
            .into_iter()
            .any(|d| d != Dimension::Search)
    }

    pub fn search_active(&self) -> bool {
        !self.search_term.is_empty()
    }

    /// `(include_male, include_female)`.
    pub fn sex_inclusion(&self) -> (bool, bool) {
        (self.include_male, self.include_female)
    }

    /// Empties the per-field name filters, leaving the rest untouched.
    pub fn clear_name_filters(&mut self) {
        self.first_name.clear();
        self.last_name.clear();
        self.middle_name.clear();
        self.middle_initial_only = false;
    }
}
