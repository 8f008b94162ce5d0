//! Field access for record types.

use crate::value::Value;

/// A record type that can be filtered and sorted by field name.
///
/// # Example
///
/// ```
/// use roster_seeker::{Query, Seekable, Value};
///
/// struct Pupil {
///     name: String,
///     age: u32,
/// }
///
/// impl Seekable for Pupil {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "age" => Value::Int(self.age as i64),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let pupils = vec![Pupil { name: "Lea".into(), age: 12 }];
/// let query = Query::new().and_range("age", 10, 12);
/// assert_eq!(query.count(&pupils, Pupil::accessor), 1);
/// ```
pub trait Seekable {
    /// Value of `field`, or [`Value::None`] if the field is unknown or null.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Function-pointer form of [`Seekable::field_value`] for the query
    /// execution methods.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}
