//! Compilation of queries into parameterized SQL.
//!
//! Every user-supplied value, including the literal separators inside a
//! [`Term::Concat`], travels as a bound [`SqlParam`]; the generated text only
//! ever contains column expressions taken from a [`ColumnMap`], operators and
//! `?` placeholders.
//!
//! LIKE wildcards in user text are escaped with `\` so that a SQL backend
//! agrees with [`Clause::matches`] on which records contain a needle.

use crate::clause::{Anchor, Clause, ClauseValue, Term};
use crate::error::{Result, SeekerError};
use crate::query::Query;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl From<&ClauseValue> for SqlParam {
    fn from(value: &ClauseValue) -> Self {
        match value {
            ClauseValue::Text(s) => SqlParam::Text(s.clone()),
            ClauseValue::Int(n) => SqlParam::Int(*n),
        }
    }
}

/// Resolves logical field names to SQL column expressions.
pub trait ColumnMap {
    /// The column expression for `field`, or `None` if the field is unknown.
    fn column(&self, field: &str) -> Option<&str>;

    /// SQL function that lowercases text for case-insensitive matching.
    ///
    /// Must fold the same characters as [`str::to_lowercase`] for a backend
    /// to agree with [`Clause::matches`]. The built-in `LOWER` of SQLite only
    /// folds ASCII, so a backend holding non-ASCII text registers its own.
    fn lowercase_function(&self) -> &str {
        "LOWER"
    }
}

impl ColumnMap for [(&str, &str)] {
    fn column(&self, field: &str) -> Option<&str> {
        self.iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }
}

impl<const N: usize> ColumnMap for [(&str, &str); N] {
    fn column(&self, field: &str) -> Option<&str> {
        self.as_slice().column(field)
    }
}

/// A compiled query: filter, ordering and window, ready to be appended to a
/// `SELECT ... FROM ...` head.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SqlQuery {
    /// Conditions joined by `AND`, without the `WHERE` keyword. Empty when
    /// nothing constrains the result.
    pub filter: String,
    /// Parameters for the placeholders in `filter`, in order.
    pub params: Vec<SqlParam>,
    /// Sort keys without the `ORDER BY` keyword.
    pub order_by: String,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl SqlQuery {
    /// `" WHERE <filter>"`, or an empty string.
    pub fn where_clause(&self) -> String {
        if self.filter.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.filter)
        }
    }

    /// Full row query: head, filter, ordering and window.
    pub fn select(&self, head: &str) -> (String, Vec<SqlParam>) {
        let mut sql = format!("{head}{}", self.where_clause());
        let mut params = self.params.clone();
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by);
        }
        match self.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                params.push(SqlParam::Int(to_i64(limit)));
                params.push(SqlParam::Int(to_i64(self.offset)));
            }
            // SQLite needs a LIMIT before it accepts an OFFSET; -1 means none.
            None if self.offset > 0 => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                params.push(SqlParam::Int(to_i64(self.offset)));
            }
            None => {}
        }
        (sql, params)
    }

    /// Count query: head and filter only.
    pub fn count(&self, head: &str) -> (String, Vec<SqlParam>) {
        (format!("{head}{}", self.where_clause()), self.params.clone())
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Escapes LIKE wildcards using `\` as the escape character.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Query {
    /// Compiles this query against a column mapping.
    ///
    /// Fails with [`SeekerError::UnknownField`] if a clause or sort key names
    /// a field the mapping does not know.
    pub fn to_sql(&self, columns: &(impl ColumnMap + ?Sized)) -> Result<SqlQuery> {
        let mut conditions = Vec::new();
        let mut params = Vec::new();
        for clause in self.clauses() {
            if let Some(condition) = compile_clause(clause, columns, &mut params)? {
                conditions.push(condition);
            }
        }

        let order_by = self
            .orderings()
            .iter()
            .map(|key| {
                lookup(columns, &key.field)
                    .map(|column| format!("{column} {}", key.dir.sql_keyword()))
            })
            .collect::<Result<Vec<_>>>()?
            .join(", ");

        Ok(SqlQuery {
            filter: conditions.join(" AND "),
            params,
            order_by,
            limit: self.get_limit(),
            offset: self.get_offset().unwrap_or(0),
        })
    }
}

fn lookup<'c>(columns: &'c (impl ColumnMap + ?Sized), field: &str) -> Result<&'c str> {
    columns
        .column(field)
        .ok_or_else(|| SeekerError::UnknownField(field.to_string()))
}

/// Returns `None` for a clause that imposes no constraint.
fn compile_clause(
    clause: &Clause,
    columns: &(impl ColumnMap + ?Sized),
    params: &mut Vec<SqlParam>,
) -> Result<Option<String>> {
    let condition = match clause {
        Clause::Substring {
            terms,
            needle,
            anchor,
        } => {
            let pattern = match anchor {
                Anchor::Anywhere => format!("%{}%", escape_like(needle)),
                Anchor::Prefix => format!("{}%", escape_like(needle)),
            };
            let lower = columns.lowercase_function();
            let mut alternatives = Vec::with_capacity(terms.len());
            for term in terms {
                let expr = compile_term(term, columns, params)?;
                alternatives.push(format!("{lower}({expr}) LIKE ? ESCAPE '\\'"));
                params.push(SqlParam::Text(pattern.clone()));
            }
            match alternatives.len() {
                0 => "1 = 0".to_string(),
                1 => alternatives.remove(0),
                _ => format!("({})", alternatives.join(" OR ")),
            }
        }
        Clause::Equals { field, value } => {
            let column = lookup(columns, field)?;
            params.push(value.into());
            format!("{column} = ?")
        }
        Clause::Range { field, min, max } => {
            let column = lookup(columns, field)?;
            params.push(SqlParam::Int(*min));
            params.push(SqlParam::Int(*max));
            format!("{column} BETWEEN ? AND ?")
        }
        Clause::BooleanPairInclusion {
            field,
            first,
            second,
        } => {
            let column = lookup(columns, field)?;
            match (first.included, second.included) {
                (true, true) => return Ok(None),
                (false, false) => "1 = 0".to_string(),
                (true, false) => {
                    params.push(SqlParam::Text(first.value.clone()));
                    format!("{column} = ?")
                }
                (false, true) => {
                    params.push(SqlParam::Text(second.value.clone()));
                    format!("{column} = ?")
                }
            }
        }
    };
    Ok(Some(condition))
}

fn compile_term(
    term: &Term,
    columns: &(impl ColumnMap + ?Sized),
    params: &mut Vec<SqlParam>,
) -> Result<String> {
    match term {
        Term::Field(name) => lookup(columns, name).map(str::to_string),
        Term::Literal(text) => {
            params.push(SqlParam::Text(text.clone()));
            Ok("?".to_string())
        }
        Term::Concat(parts) => {
            let compiled = parts
                .iter()
                .map(|part| compile_term(part, columns, params))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("({})", compiled.join(" || ")))
        }
    }
}
