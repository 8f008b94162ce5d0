//! The student record.

use std::fmt;
use std::str::FromStr;

use roster_seeker::{Seekable, Value};
use serde::{Deserialize, Serialize};

/// Recorded sex of a student. Stored and displayed as `Male` / `Female`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    /// Accepts `Male`/`Female` in any case, plus `M`/`F`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(format!("unknown sex '{other}'")),
        }
    }
}

/// One row of the roster.
///
/// `lrn` (learner reference number) is the identity; everything else is
/// descriptive. A missing middle name is `None`, never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub lrn: String,
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub sex: Sex,
    pub age: u32,
    pub grade_level: String,
    pub section: String,
    pub track_and_strand: String,
}

impl Student {
    // Field names understood by the accessor and the SQL column map.
    pub const LRN: &'static str = "lrn";
    pub const LAST_NAME: &'static str = "last_name";
    pub const FIRST_NAME: &'static str = "first_name";
    pub const MIDDLE_NAME: &'static str = "middle_name";
    pub const SEX: &'static str = "sex";
    pub const AGE: &'static str = "age";
    pub const GRADE_LEVEL: &'static str = "grade_level";
    pub const SECTION: &'static str = "section";
    pub const TRACK_AND_STRAND: &'static str = "track_and_strand";

    /// Sentinel track/strand for grades that have none.
    pub const NO_TRACK: &'static str = "N/A";

    /// Starts a record with the identifying fields. The rest defaults to a
    /// male student aged 0 with no enrollment, to be filled in with the
    /// builder methods.
    pub fn new(
        lrn: impl Into<String>,
        last_name: impl Into<String>,
        first_name: impl Into<String>,
    ) -> Self {
        Student {
            lrn: lrn.into(),
            last_name: last_name.into(),
            first_name: first_name.into(),
            middle_name: None,
            sex: Sex::Male,
            age: 0,
            grade_level: String::new(),
            section: String::new(),
            track_and_strand: Student::NO_TRACK.to_string(),
        }
    }

    /// Sets the middle name; an empty or blank name clears it.
    pub fn middle(mut self, middle_name: &str) -> Self {
        self.middle_name = normalize_middle(Some(middle_name));
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn enrolled(
        mut self,
        grade_level: impl Into<String>,
        section: impl Into<String>,
        track_and_strand: impl Into<String>,
    ) -> Self {
        self.grade_level = grade_level.into();
        self.section = section.into();
        self.track_and_strand = track_and_strand.into();
        self
    }

    /// First character of the middle name, if there is one.
    pub fn middle_initial(&self) -> Option<char> {
        self.middle_name.as_deref().and_then(|m| m.chars().next())
    }

    /// `Last, First M.`, or `Last, First` without a middle name.
    pub fn full_name(&self) -> String {
        match self.middle_initial() {
            Some(initial) => format!("{}, {} {initial}.", self.last_name, self.first_name),
            None => format!("{}, {}", self.last_name, self.first_name),
        }
    }

    /// `First M. Last`, skipping any empty part.
    pub fn formatted_name(&self) -> String {
        let initial = self.middle_initial().map(|c| format!("{c}."));
        [
            Some(self.first_name.as_str()),
            initial.as_deref(),
            Some(self.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Maps blank middle names to `None` so every store sees the same value.
pub(crate) fn normalize_middle(middle: Option<&str>) -> Option<String> {
    middle
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

impl Seekable for Student {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            Student::LRN => Value::String(&self.lrn),
            Student::LAST_NAME => Value::String(&self.last_name),
            Student::FIRST_NAME => Value::String(&self.first_name),
            Student::MIDDLE_NAME => self.middle_name.as_deref().into(),
            Student::SEX => Value::String(self.sex.as_str()),
            Student::AGE => self.age.into(),
            Student::GRADE_LEVEL => Value::String(&self.grade_level),
            Student::SECTION => Value::String(&self.section),
            Student::TRACK_AND_STRAND => Value::String(&self.track_and_strand),
            _ => Value::None,
        }
    }
}
