//! Predicate clauses.
//!
//! A [`Clause`] is one independently toggleable filter condition. A query
//! ANDs its clauses together. Every variant can be evaluated against an
//! in-memory record (see [`Clause::matches`]) or compiled into a
//! parameterized SQL fragment (see [`crate::sql`]), and the two paths agree.

use std::borrow::Cow;
use std::fmt;

use crate::value::Value;

/// Text operand of a [`Clause::Substring`].
///
/// Besides plain fields, an operand can be a concatenation such as
/// `first_name + " " + last_name`, so that a search term can match across
/// field boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A record field.
    Field(String),
    /// Fixed text.
    Literal(String),
    /// The terms joined with no separator. Null if any part is null.
    Concat(Vec<Term>),
}

impl Term {
    /// A field operand.
    pub fn field(name: impl Into<String>) -> Self {
        Term::Field(name.into())
    }

    /// A fixed text operand.
    pub fn literal(text: impl Into<String>) -> Self {
        Term::Literal(text.into())
    }

    /// Concatenation of several operands.
    pub fn concat(parts: impl IntoIterator<Item = Term>) -> Self {
        Term::Concat(parts.into_iter().collect())
    }

    pub(crate) fn resolve<'a, T, F>(&self, item: &'a T, accessor: &F) -> Option<Cow<'a, str>>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        match self {
            Term::Field(name) => accessor(item, name).to_text(),
            Term::Literal(text) => Some(Cow::Owned(text.clone())),
            Term::Concat(parts) => {
                let mut joined = String::new();
                for part in parts {
                    joined.push_str(&part.resolve(item, accessor)?);
                }
                Some(Cow::Owned(joined))
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Field(name) => f.write_str(name),
            Term::Literal(text) => write!(f, "{text:?}"),
            Term::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

/// Where a substring needle has to occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Anywhere in the text.
    #[default]
    Anywhere,
    /// At the start of the text.
    Prefix,
}

/// Owned comparison value for [`Clause::Equals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseValue {
    Text(String),
    Int(i64),
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::Text(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::Text(s.to_string())
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Int(n)
    }
}

impl From<u32> for ClauseValue {
    fn from(n: u32) -> Self {
        ClauseValue::Int(n as i64)
    }
}

impl fmt::Display for ClauseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseValue::Text(s) => write!(f, "{s:?}"),
            ClauseValue::Int(n) => write!(f, "{n}"),
        }
    }
}

/// One side of a [`Clause::BooleanPairInclusion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    /// The categorical value this flag stands for.
    pub value: String,
    /// Whether records carrying `value` are wanted.
    pub included: bool,
}

impl Inclusion {
    pub fn new(value: impl Into<String>, included: bool) -> Self {
        Inclusion {
            value: value.into(),
            included,
        }
    }
}

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use roster_seeker::{Clause, Term, Value};
///
/// fn whole<'a>(s: &'a String, _field: &str) -> Value<'a> {
///     Value::String(s)
/// }
///
/// let clause = Clause::substring([Term::field("name")], "ANA");
/// assert!(clause.matches(&String::from("Mariana"), &whole));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Case-insensitive match of `needle` against any of `terms`.
    ///
    /// `needle` is stored lowercased.
    Substring {
        terms: Vec<Term>,
        needle: String,
        anchor: Anchor,
    },
    /// Exact, case-sensitive equality.
    Equals { field: String, value: ClauseValue },
    /// Inclusive integer range. An inverted range matches nothing.
    Range { field: String, min: i64, max: i64 },
    /// Two-valued categorical field guarded by one flag per value.
    ///
    /// Both flags set imposes no constraint, one flag set requires that
    /// value, and no flag set matches nothing.
    BooleanPairInclusion {
        field: String,
        first: Inclusion,
        second: Inclusion,
    },
}

impl Clause {
    /// Case-insensitive "contains" over one or more operands (OR group).
    pub fn substring(terms: impl IntoIterator<Item = Term>, needle: &str) -> Self {
        Clause::Substring {
            terms: terms.into_iter().collect(),
            needle: needle.to_lowercase(),
            anchor: Anchor::Anywhere,
        }
    }

    /// Case-insensitive "starts with" on a single operand.
    pub fn prefix(term: Term, needle: &str) -> Self {
        Clause::Substring {
            terms: vec![term],
            needle: needle.to_lowercase(),
            anchor: Anchor::Prefix,
        }
    }

    /// Exact equality.
    pub fn equals(field: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Clause::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Inclusive range `min <= field <= max`.
    pub fn range(field: impl Into<String>, min: i64, max: i64) -> Self {
        Clause::Range {
            field: field.into(),
            min,
            max,
        }
    }

    /// Tri-state inclusion over a two-valued field.
    pub fn boolean_pair(field: impl Into<String>, first: Inclusion, second: Inclusion) -> Self {
        Clause::BooleanPairInclusion {
            field: field.into(),
            first,
            second,
        }
    }

    /// Evaluates this clause against one record.
    ///
    /// Total over all inputs: nulls and type mismatches simply fail to match.
    pub fn matches<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        match self {
            Clause::Substring {
                terms,
                needle,
                anchor,
            } => terms.iter().any(|term| {
                term.resolve(item, accessor).is_some_and(|text| {
                    let folded = text.to_lowercase();
                    match anchor {
                        Anchor::Anywhere => folded.contains(needle.as_str()),
                        Anchor::Prefix => folded.starts_with(needle.as_str()),
                    }
                })
            }),
            Clause::Equals { field, value } => match (value, accessor(item, field)) {
                (ClauseValue::Text(expected), Value::String(actual)) => actual == expected,
                (ClauseValue::Int(expected), Value::Int(actual)) => actual == *expected,
                _ => false,
            },
            Clause::Range { field, min, max } => match accessor(item, field) {
                Value::Int(n) => *min <= n && n <= *max,
                _ => false,
            },
            Clause::BooleanPairInclusion {
                field,
                first,
                second,
            } => match (first.included, second.included) {
                (true, true) => true,
                (false, false) => false,
                (true, false) => accessor(item, field).as_str() == Some(first.value.as_str()),
                (false, true) => accessor(item, field).as_str() == Some(second.value.as_str()),
            },
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Substring {
                terms,
                needle,
                anchor,
            } => {
                let verb = match anchor {
                    Anchor::Anywhere => "contains",
                    Anchor::Prefix => "startswith",
                };
                f.write_str("(")?;
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{term}")?;
                }
                write!(f, ") {verb} {needle:?}")
            }
            Clause::Equals { field, value } => write!(f, "{field} = {value}"),
            Clause::Range { field, min, max } => write!(f, "{field} in [{min}, {max}]"),
            Clause::BooleanPairInclusion {
                field,
                first,
                second,
            } => write!(
                f,
                "{field} includes {}={} {}={}",
                first.value, first.included, second.value, second.included
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        first: String,
        last: String,
        middle: Option<String>,
        kind: String,
        age: i64,
    }

    fn row(first: &str, last: &str, middle: Option<&str>, kind: &str, age: i64) -> Row {
        Row {
            first: first.to_string(),
            last: last.to_string(),
            middle: middle.map(str::to_string),
            kind: kind.to_string(),
            age,
        }
    }

    fn accessor<'a>(r: &'a Row, field: &str) -> Value<'a> {
        match field {
            "first" => Value::String(&r.first),
            "last" => Value::String(&r.last),
            "middle" => r.middle.as_deref().into(),
            "kind" => Value::String(&r.kind),
            "age" => Value::Int(r.age),
            _ => Value::None,
        }
    }

    #[test]
    fn substring_is_case_insensitive() {
        let clause = Clause::substring([Term::field("last")], "SANTOS");
        assert!(clause.matches(&row("Juan", "Santos", None, "a", 1), &accessor));
        assert!(!clause.matches(&row("Juan", "Cruz", None, "a", 1), &accessor));
    }

    #[test]
    fn substring_any_term_matches() {
        let clause = Clause::substring([Term::field("first"), Term::field("last")], "mar");
        assert!(clause.matches(&row("Maria", "Cruz", None, "a", 1), &accessor));
        assert!(clause.matches(&row("Juan", "Marquez", None, "a", 1), &accessor));
        assert!(!clause.matches(&row("Juan", "Cruz", None, "a", 1), &accessor));
    }

    #[test]
    fn substring_over_concatenation() {
        let full = Term::concat([
            Term::field("last"),
            Term::literal(", "),
            Term::field("first"),
        ]);
        let clause = Clause::substring([full], "cruz, ana");
        assert!(clause.matches(&row("Ana", "Cruz", None, "a", 1), &accessor));
        assert!(!clause.matches(&row("Ana", "Cruzado", None, "a", 1), &accessor));
    }

    #[test]
    fn null_operand_never_matches() {
        let clause = Clause::substring([Term::field("middle")], "");
        assert!(!clause.matches(&row("A", "B", None, "a", 1), &accessor));
        assert!(clause.matches(&row("A", "B", Some(""), "a", 1), &accessor));
    }

    #[test]
    fn prefix_anchor() {
        let clause = Clause::prefix(Term::field("middle"), "r");
        assert!(clause.matches(&row("A", "B", Some("Reyes"), "a", 1), &accessor));
        assert!(!clause.matches(&row("A", "B", Some("Santos"), "a", 1), &accessor));
        assert!(!clause.matches(&row("A", "B", Some("Torres"), "a", 1), &accessor));
        assert!(!clause.matches(&row("A", "B", None, "a", 1), &accessor));
    }

    #[test]
    fn equals_is_exact() {
        let clause = Clause::equals("kind", "Grade 11");
        assert!(clause.matches(&row("A", "B", None, "Grade 11", 1), &accessor));
        assert!(!clause.matches(&row("A", "B", None, "grade 11", 1), &accessor));
        assert!(!clause.matches(&row("A", "B", None, "Grade 12", 1), &accessor));
    }

    #[test]
    fn equals_type_mismatch() {
        let clause = Clause::equals("age", "16");
        assert!(!clause.matches(&row("A", "B", None, "a", 16), &accessor));
        let clause = Clause::equals("age", 16i64);
        assert!(clause.matches(&row("A", "B", None, "a", 16), &accessor));
    }

    #[test]
    fn range_is_inclusive() {
        let clause = Clause::range("age", 12, 18);
        assert!(clause.matches(&row("A", "B", None, "a", 12), &accessor));
        assert!(clause.matches(&row("A", "B", None, "a", 18), &accessor));
        assert!(!clause.matches(&row("A", "B", None, "a", 11), &accessor));
        assert!(!clause.matches(&row("A", "B", None, "a", 19), &accessor));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let clause = Clause::range("age", 20, 10);
        for age in 0..30 {
            assert!(!clause.matches(&row("A", "B", None, "a", age), &accessor));
        }
    }

    #[test]
    fn boolean_pair_tri_state() {
        let male = row("A", "B", None, "Male", 1);
        let female = row("A", "B", None, "Female", 1);
        let pair = |m, f| {
            Clause::boolean_pair(
                "kind",
                Inclusion::new("Male", m),
                Inclusion::new("Female", f),
            )
        };

        assert!(pair(true, true).matches(&male, &accessor));
        assert!(pair(true, true).matches(&female, &accessor));

        assert!(pair(true, false).matches(&male, &accessor));
        assert!(!pair(true, false).matches(&female, &accessor));

        assert!(!pair(false, true).matches(&male, &accessor));
        assert!(pair(false, true).matches(&female, &accessor));

        assert!(!pair(false, false).matches(&male, &accessor));
        assert!(!pair(false, false).matches(&female, &accessor));
    }

    #[test]
    fn display() {
        assert_eq!(Clause::range("age", 1, 2).to_string(), "age in [1, 2]");
        assert_eq!(Clause::equals("kind", "x").to_string(), "kind = \"x\"");
        let clause = Clause::substring(
            [Term::field("a"), Term::concat([Term::field("b"), Term::literal(" ")])],
            "Q",
        );
        assert_eq!(clause.to_string(), "(a | b + \" \") contains \"q\"");
    }
}
