//! SQLite store: students joined to the school form they are enrolled in.

use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, info};
use roster_seeker::{ColumnMap, Query, SqlParam};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};

use crate::error::{Result, RosterError};
use crate::facets::{FacetColumn, NumericColumn};
use crate::record::{normalize_middle, Sex, Student};
use crate::source::{FacetSource, RecordSource};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS SCHOOL_FORM (
        SF_ID INTEGER PRIMARY KEY,
        SF_GRADE_LEVEL TEXT NOT NULL,
        SF_SECTION TEXT NOT NULL,
        SF_TRACK_AND_STRAND TEXT NOT NULL,
        UNIQUE (SF_GRADE_LEVEL, SF_SECTION, SF_TRACK_AND_STRAND)
    );

    CREATE TABLE IF NOT EXISTS STUDENT (
        STUDENT_LRN TEXT PRIMARY KEY,
        STUDENT_LASTNAME TEXT NOT NULL,
        STUDENT_FIRSTNAME TEXT NOT NULL,
        STUDENT_MIDDLENAME TEXT,
        STUDENT_SEX TEXT NOT NULL,
        STUDENT_AGE INTEGER NOT NULL,
        SF_ID INTEGER NOT NULL REFERENCES SCHOOL_FORM (SF_ID)
    );

    CREATE INDEX IF NOT EXISTS idx_student_name
        ON STUDENT (STUDENT_LASTNAME, STUDENT_FIRSTNAME);
"#;

const FROM: &str = "FROM STUDENT s JOIN SCHOOL_FORM sf ON s.SF_ID = sf.SF_ID";

const SELECT_COLUMNS: &str = "SELECT s.STUDENT_LRN, s.STUDENT_LASTNAME, s.STUDENT_FIRSTNAME, \
     s.STUDENT_MIDDLENAME, s.STUDENT_SEX, s.STUDENT_AGE, \
     sf.SF_GRADE_LEVEL, sf.SF_SECTION, sf.SF_TRACK_AND_STRAND";

/// Record fields to column expressions over the joined tables.
const COLUMNS: [(&str, &str); 9] = [
    (Student::LRN, "s.STUDENT_LRN"),
    (Student::LAST_NAME, "s.STUDENT_LASTNAME"),
    (Student::FIRST_NAME, "s.STUDENT_FIRSTNAME"),
    (Student::MIDDLE_NAME, "s.STUDENT_MIDDLENAME"),
    (Student::SEX, "s.STUDENT_SEX"),
    (Student::AGE, "s.STUDENT_AGE"),
    (Student::GRADE_LEVEL, "sf.SF_GRADE_LEVEL"),
    (Student::SECTION, "sf.SF_SECTION"),
    (Student::TRACK_AND_STRAND, "sf.SF_TRACK_AND_STRAND"),
];

/// Unicode-aware replacement for `LOWER`, registered on every connection.
const LOWER_FN: &str = "roster_lower";

struct StudentColumns;

impl ColumnMap for StudentColumns {
    fn column(&self, field: &str) -> Option<&str> {
        let columns: &'static [(&str, &str)] = &COLUMNS;
        columns.column(field)
    }

    fn lowercase_function(&self) -> &str {
        LOWER_FN
    }
}

/// Students and school forms in a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file and ensures the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let store = SqliteStore::from_connection(Connection::open(path)?)?;
        info!("opened roster database {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        SqliteStore::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.create_scalar_function(
            LOWER_FN,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Inserts students in one transaction, creating a school form for each
    /// new (grade, section, track) combination and reusing existing ones.
    ///
    /// A repeated LRN aborts the whole batch with
    /// [`RosterError::DuplicateKey`].
    pub fn insert_students(&mut self, students: &[Student]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut insert_form = tx.prepare(
                "INSERT OR IGNORE INTO SCHOOL_FORM \
                 (SF_GRADE_LEVEL, SF_SECTION, SF_TRACK_AND_STRAND) VALUES (?1, ?2, ?3)",
            )?;
            let mut find_form = tx.prepare(
                "SELECT SF_ID FROM SCHOOL_FORM \
                 WHERE SF_GRADE_LEVEL = ?1 AND SF_SECTION = ?2 AND SF_TRACK_AND_STRAND = ?3",
            )?;
            let mut insert_student = tx.prepare(
                "INSERT INTO STUDENT (STUDENT_LRN, STUDENT_LASTNAME, STUDENT_FIRSTNAME, \
                 STUDENT_MIDDLENAME, STUDENT_SEX, STUDENT_AGE, SF_ID) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            for s in students {
                let form = (&s.grade_level, &s.section, &s.track_and_strand);
                insert_form.execute(form)?;
                let form_id: i64 = find_form.query_row(form, |row| row.get(0))?;
                insert_student
                    .execute(params![
                        s.lrn,
                        s.last_name,
                        s.first_name,
                        s.middle_name,
                        s.sex.as_str(),
                        s.age,
                        form_id
                    ])
                    .map_err(|err| duplicate_or_backend(err, &s.lrn))?;
            }
        }
        tx.commit()?;
        info!("inserted {} students", students.len());
        Ok(students.len())
    }

    /// Number of stored students.
    pub fn len(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM STUDENT", [], |row| row.get(0))?;
        Ok(to_count(n))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl RecordSource for SqliteStore {
    fn fetch(&self, query: &Query) -> Result<Vec<Student>> {
        let (sql, params) = query.to_sql(&StudentColumns)?.select(&format!("{SELECT_COLUMNS} {FROM}"));
        debug!("sqlite fetch: {sql}");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind(params)), student_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn count_matching(&self, query: &Query) -> Result<usize> {
        let (sql, params) = query
            .to_sql(&StudentColumns)?
            .count(&format!("SELECT COUNT(DISTINCT s.STUDENT_LRN) {FROM}"));
        debug!("sqlite count: {sql}");
        let n: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind(params)), |row| row.get(0))?;
        Ok(to_count(n))
    }
}

impl FacetSource for SqliteStore {
    fn distinct_non_empty(
        &self,
        column: FacetColumn,
        excluded: &[&str],
    ) -> Result<BTreeSet<String>> {
        // Only forms someone is enrolled in, as the memory store sees them.
        let col = format!("sf.{}", form_column(column));
        let mut sql = format!(
            "SELECT DISTINCT {col} {FROM} WHERE {col} IS NOT NULL AND {col} != ''"
        );
        if !excluded.is_empty() {
            let placeholders = vec!["?"; excluded.len()].join(", ");
            sql.push_str(&format!(" AND {col} NOT IN ({placeholders})"));
        }
        sql.push_str(&format!(" ORDER BY {col} ASC"));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(excluded.iter()), |row| {
            row.get::<_, String>(0)
        })?;
        Ok(rows.collect::<rusqlite::Result<BTreeSet<_>>>()?)
    }

    fn min_max(&self, column: NumericColumn) -> Result<Option<(u32, u32)>> {
        let sql = match column {
            NumericColumn::Age => "SELECT MIN(STUDENT_AGE), MAX(STUDENT_AGE) FROM STUDENT",
        };
        let (min, max): (Option<u32>, Option<u32>) = self
            .conn
            .query_row(sql, [], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(min.zip(max))
    }
}

fn form_column(column: FacetColumn) -> &'static str {
    match column {
        FacetColumn::GradeLevel => "SF_GRADE_LEVEL",
        FacetColumn::Section => "SF_SECTION",
        FacetColumn::TrackAndStrand => "SF_TRACK_AND_STRAND",
    }
}

fn bind(params: Vec<SqlParam>) -> Vec<SqlValue> {
    params
        .into_iter()
        .map(|p| match p {
            SqlParam::Text(s) => SqlValue::Text(s),
            SqlParam::Int(n) => SqlValue::Integer(n),
        })
        .collect()
}

fn to_count(n: i64) -> usize {
    usize::try_from(n).unwrap_or_default()
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    let sex: String = row.get(4)?;
    let sex = sex
        .parse::<Sex>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into()))?;
    Ok(Student {
        lrn: row.get(0)?,
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        middle_name: normalize_middle(row.get::<_, Option<String>>(3)?.as_deref()),
        sex,
        age: row.get(5)?,
        grade_level: row.get(6)?,
        section: row.get(7)?,
        track_and_strand: row.get(8)?,
    })
}

fn duplicate_or_backend(err: rusqlite::Error, lrn: &str) -> RosterError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => RosterError::DuplicateKey(lrn.to_string()),
        _ => RosterError::Backend(err),
    }
}
