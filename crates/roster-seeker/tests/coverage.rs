//! Behavior checks across the public API surface.

use roster_seeker::{
    compare_values, Anchor, Clause, ClauseValue, Dir, Inclusion, OrderBy, Query, SeekerError,
    Seekable, SqlParam, Term, Value,
};

struct Learner {
    lrn: String,
    last: String,
    first: String,
    middle: Option<String>,
    sex: &'static str,
    age: u32,
}

impl Seekable for Learner {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "lrn" => Value::String(&self.lrn),
            "last" => Value::String(&self.last),
            "first" => Value::String(&self.first),
            "middle" => self.middle.as_deref().into(),
            "sex" => Value::String(self.sex),
            "age" => self.age.into(),
            _ => Value::None,
        }
    }
}

fn learner(lrn: &str, last: &str, first: &str, middle: Option<&str>, sex: &'static str, age: u32) -> Learner {
    Learner {
        lrn: lrn.to_string(),
        last: last.to_string(),
        first: first.to_string(),
        middle: middle.map(str::to_string),
        sex,
        age,
    }
}

fn roster() -> Vec<Learner> {
    vec![
        learner("100", "Dela Cruz", "Juan", Some("Santos"), "Male", 15),
        learner("101", "Reyes", "Maria", None, "Female", 16),
        learner("102", "Santos", "Ana", Some("Lim"), "Female", 17),
        learner("103", "Bautista", "Jose", Some("Reyes"), "Male", 14),
    ]
}

const COLUMNS: [(&str, &str); 6] = [
    ("lrn", "s.LRN"),
    ("last", "s.LAST"),
    ("first", "s.FIRST"),
    ("middle", "s.MIDDLE"),
    ("sex", "s.SEX"),
    ("age", "s.AGE"),
];

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn full_name_concat_search() {
    let items = roster();
    let query = Query::new()
        .and_contains(
            [Term::concat([
                Term::field("first"),
                Term::literal(" "),
                Term::field("last"),
            ])],
            "juan dela",
        )
        .build();
    let found = query.filter(&items, Learner::accessor);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].lrn, "100");
}

#[test]
fn concat_with_null_part_never_matches() {
    let items = roster();
    let query = Query::new().and_contains(
        [Term::concat([Term::field("first"), Term::literal(" "), Term::field("middle")])],
        "maria",
    );
    assert_eq!(query.count(&items, Learner::accessor), 0);
}

#[test]
fn middle_initial_prefix() {
    let items = roster();
    let query = Query::new().and_startswith("middle", "s");
    let found = query.filter(&items, Learner::accessor);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first, "Juan");
}

#[test]
fn search_across_identifier_and_names() {
    let items = roster();
    let query = Query::new().and_contains(
        [Term::field("lrn"), Term::field("last"), Term::field("middle")],
        "reyes",
    );
    let lrns: Vec<_> = query
        .order_asc("lrn")
        .filter(&items, Learner::accessor)
        .into_iter()
        .map(|l| l.lrn.as_str())
        .collect();
    assert_eq!(lrns, vec!["101", "103"]);
}

#[test]
fn pair_clause_single_side() {
    let items = roster();
    let query = Query::new().and_pair(
        "sex",
        Inclusion::new("Male", false),
        Inclusion::new("Female", true),
    );
    assert!(query
        .filter(&items, Learner::accessor)
        .iter()
        .all(|l| l.sex == "Female"));
    assert_eq!(query.count(&items, Learner::accessor), 2);
}

#[test]
fn equality_is_case_sensitive() {
    let items = roster();
    assert_eq!(Query::new().and_eq("last", "reyes").count(&items, Learner::accessor), 0);
    assert_eq!(Query::new().and_eq("last", "Reyes").count(&items, Learner::accessor), 1);
    assert_eq!(Query::new().and_eq("age", 14u32).count(&items, Learner::accessor), 1);
}

#[test]
fn unknown_field_reads_as_null() {
    let items = roster();
    assert_eq!(Query::new().and_eq("grade", "7").count(&items, Learner::accessor), 0);
    assert_eq!(
        Query::new().and_contains([Term::field("grade")], "").count(&items, Learner::accessor),
        0
    );
}

#[test]
fn descending_order() {
    let items = roster();
    let found = Query::new().order_desc("age").filter(&items, Learner::accessor);
    let ages: Vec<_> = found.iter().map(|l| l.age).collect();
    assert_eq!(ages, vec![17, 16, 15, 14]);
}

// ============================================================================
// SQL compilation
// ============================================================================

#[test]
fn compiled_query_shape() {
    let query = Query::new()
        .and_contains([Term::field("last")], "o'brien")
        .and_range("age", 12, 18)
        .order_asc("last")
        .order_asc("first")
        .limit(25)
        .offset(50)
        .build();
    let sql = query.to_sql(&COLUMNS).unwrap();
    let (text, params) = sql.select("SELECT s.LRN FROM STUDENT s");
    assert_eq!(
        text,
        "SELECT s.LRN FROM STUDENT s WHERE LOWER(s.LAST) LIKE ? ESCAPE '\\' \
         AND s.AGE BETWEEN ? AND ? ORDER BY s.LAST ASC, s.FIRST ASC LIMIT ? OFFSET ?"
    );
    assert_eq!(
        params,
        vec![
            SqlParam::Text("%o'brien%".to_string()),
            SqlParam::Int(12),
            SqlParam::Int(18),
            SqlParam::Int(25),
            SqlParam::Int(50),
        ]
    );
}

#[test]
fn empty_query_compiles_to_nothing() {
    let sql = Query::new().to_sql(&COLUMNS).unwrap();
    assert_eq!(sql.where_clause(), "");
    let (text, params) = sql.count("SELECT COUNT(*) FROM STUDENT s");
    assert_eq!(text, "SELECT COUNT(*) FROM STUDENT s");
    assert!(params.is_empty());
}

#[test]
fn unknown_sort_key_is_an_error() {
    let err = Query::new().order_asc("grade").to_sql(&COLUMNS).unwrap_err();
    assert_eq!(err, SeekerError::UnknownField("grade".to_string()));
    assert_eq!(err.to_string(), "unknown field 'grade'");
}

// ============================================================================
// Small types
// ============================================================================

#[test]
fn small_type_accessors() {
    assert_eq!(Anchor::default(), Anchor::Anywhere);
    assert_eq!(Dir::default(), Dir::Asc);
    assert_eq!(OrderBy::desc("age").dir, Dir::Desc);
    assert_eq!(ClauseValue::from(7u32), ClauseValue::Int(7));
    assert_eq!(ClauseValue::from("x"), ClauseValue::Text("x".to_string()));
    assert_eq!(
        compare_values(&Value::Int(3), &Value::Int(9)),
        std::cmp::Ordering::Less
    );
}

#[test]
fn clause_needles_are_lowercased() {
    match Clause::substring([Term::field("last")], "CRUZ") {
        Clause::Substring { needle, anchor, .. } => {
            assert_eq!(needle, "cruz");
            assert_eq!(anchor, Anchor::Anywhere);
        }
        other => panic!("unexpected clause {other:?}"),
    }
}
