//! In-memory store over a loaded dataset.

use std::collections::{BTreeSet, HashSet};

use log::debug;
use roster_seeker::{Query, Seekable};

use crate::error::{Result, RosterError};
use crate::facets::{FacetColumn, NumericColumn};
use crate::record::Student;
use crate::source::{FacetSource, RecordSource};

/// Records held in a `Vec`, filtered with [`Query::filter_counted`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    students: Vec<Student>,
}

impl MemoryStore {
    /// Fails with [`RosterError::DuplicateKey`] on the first repeated LRN.
    pub fn new(students: Vec<Student>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(students.len());
        for student in &students {
            if !seen.insert(student.lrn.as_str()) {
                return Err(RosterError::DuplicateKey(student.lrn.clone()));
            }
        }
        Ok(MemoryStore { students })
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, lrn: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.lrn == lrn)
    }
}

impl RecordSource for MemoryStore {
    fn fetch(&self, query: &Query) -> Result<Vec<Student>> {
        Ok(query.filter_cloned(&self.students, Student::accessor))
    }

    fn count_matching(&self, query: &Query) -> Result<usize> {
        Ok(query.count(&self.students, Student::accessor))
    }

    fn fetch_counted(&self, query: &Query) -> Result<(Vec<Student>, usize)> {
        let (page, total) = query.filter_counted(&self.students, Student::accessor);
        debug!("memory store: {} of {total} matches", page.len());
        Ok((page.into_iter().cloned().collect(), total))
    }
}

impl FacetSource for MemoryStore {
    fn distinct_non_empty(
        &self,
        column: FacetColumn,
        excluded: &[&str],
    ) -> Result<BTreeSet<String>> {
        Ok(self
            .students
            .iter()
            .map(|s| column.value_of(s))
            .filter(|v| !v.is_empty() && !excluded.contains(v))
            .map(str::to_string)
            .collect())
    }

    fn min_max(&self, column: NumericColumn) -> Result<Option<(u32, u32)>> {
        let values = self.students.iter().map(|s| match column {
            NumericColumn::Age => s.age,
        });
        Ok(values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        }))
    }
}
