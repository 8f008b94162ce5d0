//! Result ordering.

use std::cmp::Ordering;

use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// Applies the direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// SQL keyword for this direction.
    pub fn sql_keyword(self) -> &'static str {
        match self {
            Dir::Asc => "ASC",
            Dir::Desc => "DESC",
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub dir: Dir,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }
}

/// Compares two field values in ascending order.
///
/// Strings compare bytewise, which is the same order as SQLite's default
/// `BINARY` collation. Nulls sort first, as they do in SQLite. Mismatched
/// types compare equal so that the next sort key decides.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Less,
        (_, Value::None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Compares two records key by key; later keys only break ties.
pub fn compare_by_orderings<T, F>(a: &T, b: &T, orderings: &[OrderBy], accessor: &F) -> Ordering
where
    for<'x> F: Fn(&'x T, &str) -> Value<'x>,
{
    orderings
        .iter()
        .map(|key| {
            key.dir.apply(compare_values(
                &accessor(a, &key.field),
                &accessor(b, &key.field),
            ))
        })
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Name {
        last: &'static str,
        first: &'static str,
    }

    fn accessor<'a>(n: &'a Name, field: &str) -> Value<'a> {
        match field {
            "last" => Value::String(n.last),
            "first" => Value::String(n.first),
            _ => Value::None,
        }
    }

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn strings_compare_case_sensitively() {
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(
            compare_values(&Value::String("Zamora"), &Value::String("de la Cruz")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::String("Abad"), &Value::String("Abella")),
            Ordering::Less
        );
    }

    #[test]
    fn nulls_sort_first() {
        assert_eq!(
            compare_values(&Value::None, &Value::String("a")),
            Ordering::Less
        );
        assert_eq!(compare_values(&Value::Int(1), &Value::None), Ordering::Greater);
        assert_eq!(compare_values(&Value::None, &Value::None), Ordering::Equal);
    }

    #[test]
    fn later_keys_break_ties() {
        let keys = [OrderBy::asc("last"), OrderBy::asc("first")];
        let a = Name {
            last: "Cruz",
            first: "Ana",
        };
        let b = Name {
            last: "Cruz",
            first: "Ben",
        };
        let c = Name {
            last: "Abad",
            first: "Zed",
        };
        assert_eq!(compare_by_orderings(&a, &b, &keys, &accessor), Ordering::Less);
        assert_eq!(compare_by_orderings(&a, &c, &keys, &accessor), Ordering::Greater);
        assert_eq!(compare_by_orderings(&a, &a, &keys, &accessor), Ordering::Equal);
    }

    #[test]
    fn descending_key() {
        let keys = [OrderBy::desc("last")];
        let a = Name {
            last: "Abad",
            first: "",
        };
        let b = Name {
            last: "Cruz",
            first: "",
        };
        assert_eq!(compare_by_orderings(&a, &b, &keys, &accessor), Ordering::Greater);
    }
}
