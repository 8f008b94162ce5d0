//! Facet values and age bounds for populating filter choices.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::Student;
use crate::source::FacetSource;

/// Categorical columns offered as filter choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetColumn {
    GradeLevel,
    Section,
    TrackAndStrand,
}

impl FacetColumn {
    pub const ALL: [FacetColumn; 3] = [
        FacetColumn::GradeLevel,
        FacetColumn::Section,
        FacetColumn::TrackAndStrand,
    ];

    /// Record field name for this column.
    pub fn field(self) -> &'static str {
        match self {
            FacetColumn::GradeLevel => Student::GRADE_LEVEL,
            FacetColumn::Section => Student::SECTION,
            FacetColumn::TrackAndStrand => Student::TRACK_AND_STRAND,
        }
    }

    /// Placeholder values that are never offered as a choice.
    pub fn excluded(self) -> &'static [&'static str] {
        match self {
            FacetColumn::TrackAndStrand => &[Student::NO_TRACK],
            _ => &[],
        }
    }

    pub fn value_of(self, student: &Student) -> &str {
        match self {
            FacetColumn::GradeLevel => &student.grade_level,
            FacetColumn::Section => &student.section,
            FacetColumn::TrackAndStrand => &student.track_and_strand,
        }
    }
}

impl fmt::Display for FacetColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Numeric columns with dynamic bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    Age,
}

impl NumericColumn {
    pub fn field(self) -> &'static str {
        match self {
            NumericColumn::Age => Student::AGE,
        }
    }
}

/// Smallest and largest age in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBounds {
    pub min: u32,
    pub max: u32,
}

impl AgeBounds {
    /// Used when there are no students to measure.
    pub const FALLBACK: AgeBounds = AgeBounds { min: 12, max: 22 };

    pub fn new(min: u32, max: u32) -> Self {
        AgeBounds { min, max }
    }
}

impl Default for AgeBounds {
    fn default() -> Self {
        AgeBounds::FALLBACK
    }
}

impl From<(u32, u32)> for AgeBounds {
    fn from((min, max): (u32, u32)) -> Self {
        AgeBounds { min, max }
    }
}

/// Every facet at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub grade_levels: BTreeSet<String>,
    pub sections: BTreeSet<String>,
    pub tracks_and_strands: BTreeSet<String>,
    pub age_bounds: AgeBounds,
}

impl Facets {
    pub fn values(&self, column: FacetColumn) -> &BTreeSet<String> {
        match column {
            FacetColumn::GradeLevel => &self.grade_levels,
            FacetColumn::Section => &self.sections,
            FacetColumn::TrackAndStrand => &self.tracks_and_strands,
        }
    }

    /// Returns `true` if `value` is a known choice for `column`.
    pub fn contains(&self, column: FacetColumn, value: &str) -> bool {
        self.values(column).contains(value)
    }
}

/// Reads facets from a [`FacetSource`].
pub struct FacetCatalog<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: FacetSource + ?Sized> FacetCatalog<'a, S> {
    pub fn new(source: &'a S) -> Self {
        FacetCatalog { source }
    }

    /// Sorted, unique, non-empty values of `column`. Track/strand also drops
    /// the `N/A` placeholder.
    pub fn distinct_values(&self, column: FacetColumn) -> Result<BTreeSet<String>> {
        self.source.distinct_non_empty(column, column.excluded())
    }

    /// Dataset age bounds, or [`AgeBounds::FALLBACK`] when there are no rows.
    pub fn age_bounds(&self) -> Result<AgeBounds> {
        Ok(self
            .source
            .min_max(NumericColumn::Age)?
            .map_or(AgeBounds::FALLBACK, AgeBounds::from))
    }

    pub fn snapshot(&self) -> Result<Facets> {
        Ok(Facets {
            grade_levels: self.distinct_values(FacetColumn::GradeLevel)?,
            sections: self.distinct_values(FacetColumn::Section)?,
            tracks_and_strands: self.distinct_values(FacetColumn::TrackAndStrand)?,
            age_bounds: self.age_bounds()?,
        })
    }
}
