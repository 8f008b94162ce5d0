//! Runtime field values.
//!
//! A [`Value`] is what an accessor hands back for one field of one record.
//! It borrows text from the record so evaluating a clause never clones the
//! underlying data.

use std::borrow::Cow;

/// Field value borrowed from a record at evaluation time.
///
/// # Example
///
/// ```
/// use roster_seeker::Value;
///
/// struct Pupil {
///     name: String,
///     age: u32,
///     nickname: Option<String>,
/// }
///
/// fn accessor<'a>(p: &'a Pupil, field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::String(&p.name),
///         "age" => Value::Int(p.age as i64),
///         "nickname" => p.nickname.as_deref().map_or(Value::None, Value::String),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    /// Text value.
    String(&'a str),
    /// Integer value.
    Int(i64),
    /// Null, absent, or unknown field.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` for [`Value::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns the text, if this is a string value.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Renders the value as text for string matching.
    ///
    /// Integers are formatted in decimal; `None` stays `None` so that a null
    /// never satisfies a text predicate.
    pub fn to_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Int(n) => Some(Cow::Owned(n.to_string())),
            Value::None => None,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}

impl<'a> From<Option<&'a str>> for Value<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Value::None, Value::String)
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value<'_> {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extractors() {
        assert_eq!(Value::String("abc").as_str(), Some("abc"));
        assert_eq!(Value::String("abc").as_int(), None);
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Int(7).as_str(), None);
        assert!(Value::None.is_none());
        assert!(!Value::Int(0).is_none());
    }

    #[test]
    fn text_rendering() {
        assert_eq!(Value::String("x").to_text().as_deref(), Some("x"));
        assert_eq!(Value::Int(42).to_text().as_deref(), Some("42"));
        assert_eq!(Value::None.to_text(), None);
    }

    #[test]
    fn optional_text_conversion() {
        assert_eq!(Value::from(Some("m")), Value::String("m"));
        assert_eq!(Value::from(None::<&str>), Value::None);
        assert_eq!(Value::from(16u32), Value::Int(16));
    }
}
