//! Roster seeker: one predicate, two execution paths.
//!
//! A [`Query`] describes a filter as a flat list of [`Clause`]s joined by
//! AND, plus sort keys and an optional limit/offset window. The same query
//! value can be
//!
//! - evaluated directly against a slice of records through an accessor
//!   function ([`Query::filter`], [`Query::count`], [`Query::filter_counted`]), or
//! - compiled into a parameterized SQL fragment ([`Query::to_sql`]) for a
//!   relational backend.
//!
//! Keeping a single description of the clauses means an in-memory store and
//! a database store cannot drift apart in what they consider a match.
//!
//! # Clause variants
//!
//! | Variant | Meaning | SQL form |
//! |---------|---------|----------|
//! | `Substring` | case-insensitive contains / starts-with over one or more operands | `LOWER(expr) LIKE ? ESCAPE '\'` ORed |
//! | `Equals` | exact equality | `col = ?` |
//! | `Range` | inclusive integer range | `col BETWEEN ? AND ?` |
//! | `BooleanPairInclusion` | one include flag per value of a two-valued field | nothing, `col = ?`, or `1 = 0` |
//!
//! # Quick Start
//!
//! ```rust
//! use roster_seeker::{Inclusion, Query, Term, Value};
//!
//! struct Pupil {
//!     last: String,
//!     sex: &'static str,
//!     age: u32,
//! }
//!
//! fn accessor<'a>(p: &'a Pupil, field: &str) -> Value<'a> {
//!     match field {
//!         "last" => Value::String(&p.last),
//!         "sex" => Value::String(p.sex),
//!         "age" => Value::Int(p.age as i64),
//!         _ => Value::None,
//!     }
//! }
//!
//! let pupils = vec![
//!     Pupil { last: "Santos".into(), sex: "Male", age: 15 },
//!     Pupil { last: "Reyes".into(), sex: "Female", age: 16 },
//! ];
//!
//! let query = Query::new()
//!     .and_contains([Term::field("last")], "SAN")
//!     .and_pair("sex", Inclusion::new("Male", true), Inclusion::new("Female", false))
//!     .and_range("age", 12, 18)
//!     .order_asc("last")
//!     .build();
//!
//! assert_eq!(query.count(&pupils, accessor), 1);
//!
//! let sql = query
//!     .to_sql(&[("last", "LAST"), ("sex", "SEX"), ("age", "AGE")])
//!     .unwrap();
//! assert_eq!(
//!     sql.filter,
//!     "LOWER(LAST) LIKE ? ESCAPE '\\' AND SEX = ? AND AGE BETWEEN ? AND ?"
//! );
//! ```

mod clause;
mod error;
mod ordering;
mod query;
mod sql;
mod traits;
mod value;

pub use clause::{Anchor, Clause, ClauseValue, Inclusion, Term};
pub use error::{Result, SeekerError};
pub use ordering::{compare_by_orderings, compare_values, Dir, OrderBy};
pub use query::Query;
pub use sql::{escape_like, ColumnMap, SqlParam, SqlQuery};
pub use traits::Seekable;
pub use value::Value;
