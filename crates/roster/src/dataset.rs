//! Loading and producing datasets: CSV files and a deterministic sample.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::{Result, RosterError};
use crate::record::{Sex, Student};

/// Column order of roster CSV files.
pub const CSV_HEADER: [&str; 9] = [
    "lrn",
    "last_name",
    "first_name",
    "middle_name",
    "sex",
    "age",
    "grade_level",
    "section",
    "track_and_strand",
];

#[derive(Debug, Deserialize)]
struct CsvRow {
    lrn: String,
    last_name: String,
    first_name: String,
    #[serde(default)]
    middle_name: Option<String>,
    sex: String,
    age: String,
    grade_level: String,
    section: String,
    #[serde(default)]
    track_and_strand: Option<String>,
}

impl CsvRow {
    fn into_student(self, line: u64) -> Result<Student> {
        if self.lrn.is_empty() {
            return Err(RosterError::invalid_record(line, "missing lrn"));
        }
        let sex: Sex = self
            .sex
            .parse()
            .map_err(|reason: String| RosterError::invalid_record(line, reason))?;
        let age: u32 = self.age.parse().map_err(|_| {
            RosterError::invalid_record(line, format!("age '{}' is not a number", self.age))
        })?;
        let track = self
            .track_and_strand
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| Student::NO_TRACK.to_string());

        let student = Student::new(self.lrn, self.last_name, self.first_name)
            .sex(sex)
            .age(age)
            .enrolled(self.grade_level, self.section, track);
        Ok(match self.middle_name {
            Some(middle) => student.middle(&middle),
            None => student,
        })
    }
}

/// Reads students from CSV with a header row. Cells are trimmed; an empty
/// middle name is no middle name and an empty track is `N/A`.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Student>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut students = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let row: CsvRow = record.deserialize(Some(&headers))?;
        students.push(row.into_student(line)?);
    }
    Ok(students)
}

pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<Student>> {
    let path = path.as_ref();
    let students = read_csv(File::open(path)?)?;
    info!("read {} students from {}", students.len(), path.display());
    Ok(students)
}

/// Writes students as CSV, header first.
pub fn write_csv<W: Write>(writer: W, students: &[Student]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for student in students {
        wtr.serialize(student)?;
    }
    wtr.flush()?;
    Ok(())
}

// ============================================================================
// Sample data
// ============================================================================

const LAST_NAMES: &[&str] = &[
    "Santos", "Reyes", "Cruz", "Bautista", "Ocampo", "Garcia", "Mendoza", "Torres", "Tomas",
    "Andrada", "Castillo", "Flores", "Villanueva", "Ramos", "Castro", "Rivera", "Aquino",
    "Navarro", "Salazar", "Mercado", "Dela Cruz", "De Leon",
];

const MALE_NAMES: &[&str] = &[
    "Jose", "Juan", "Mark", "John Paul", "Christian", "Angelo", "Carlo", "Miguel", "Paolo",
    "Rafael", "Gabriel", "Joshua", "Kenneth", "Adrian",
];

const FEMALE_NAMES: &[&str] = &[
    "Maria", "Ana", "Angel", "Mary Joy", "Kristine", "Jasmine", "Nicole", "Patricia", "Andrea",
    "Camille", "Bea", "Sofia", "Janella", "Trisha",
];

const SECTIONS: &[&str] = &[
    "Rizal", "Bonifacio", "Mabini", "Luna", "Silang", "Aguinaldo", "Del Pilar", "Jacinto",
];

const TRACKS: &[&str] = &["STEM", "ABM", "HUMSS", "GAS", "TVL-ICT", "TVL-HE"];

/// Small xorshift generator; the sample only needs to be repeatable.
struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift.
        XorShift(seed ^ 0x9E37_79B9_7F4A_7C15)
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next() % 100 < percent
    }
}

/// `count` synthetic students, the same for the same `seed`.
///
/// Grades 7 to 12 with ages that fit the grade; grades 11 and 12 get a
/// senior high track, the rest `N/A`. LRNs are unique.
pub fn generate(count: usize, seed: u64) -> Vec<Student> {
    let mut rng = XorShift::new(seed);
    (0..count)
        .map(|i| {
            let sex = if rng.chance(50) { Sex::Male } else { Sex::Female };
            let first = match sex {
                Sex::Male => rng.pick(MALE_NAMES),
                Sex::Female => rng.pick(FEMALE_NAMES),
            };
            let grade = 7 + rng.below(6) as u32;
            let age = grade + 5 + rng.below(3) as u32;
            let track = if grade >= 11 {
                rng.pick(TRACKS)
            } else {
                Student::NO_TRACK
            };

            let student = Student::new(
                format!("136514{:06}", i + 1),
                rng.pick(LAST_NAMES),
                first,
            )
            .sex(sex)
            .age(age)
            .enrolled(format!("Grade {grade}"), rng.pick(SECTIONS), track);

            if rng.chance(85) {
                student.middle(rng.pick(LAST_NAMES))
            } else {
                student
            }
        })
        .collect()
}
