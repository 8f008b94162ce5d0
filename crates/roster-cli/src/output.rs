//! Rendering command results.
//!
//! Structured formats (JSON, YAML, CSV) serialize the result value as is.
//! The text format renders a fixed-width table and a status line.

use std::fmt::Write as _;

use clap::ValueEnum;
use roster::{ActiveFilterSummary, Facets, PageResult, Student};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
    Csv,
}

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(String),

    #[error("Not a structured output format")]
    NotStructured,
}

impl From<csv::Error> for SerializeError {
    fn from(err: csv::Error) -> Self {
        SerializeError::Csv(err.to_string())
    }
}

/// Serializes data to the given structured format.
pub fn serialize_structured<T: Serialize>(
    data: &T,
    format: OutputFormat,
) -> Result<String, SerializeError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Csv => serialize_csv(data),
        OutputFormat::Text => Err(SerializeError::NotStructured),
    }
}

/// Serializes data to CSV by way of its JSON form.
///
/// An array of objects becomes one row per object, a single object becomes
/// `key,value` rows, and anything else a single `value` column.
pub fn serialize_csv<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    let json_value = serde_json::to_value(data)?;
    flatten_json_to_csv(&json_value)
}

fn flatten_json_to_csv(value: &serde_json::Value) -> Result<String, SerializeError> {
    use serde_json::Value;

    let mut wtr = csv::Writer::from_writer(vec![]);

    match value {
        Value::Array(arr) => match arr.first() {
            Some(Value::Object(first)) => {
                let headers: Vec<String> = first.keys().cloned().collect();
                wtr.write_record(&headers)?;
                for item in arr {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| obj.get(h).map(value_to_string).unwrap_or_default())
                            .collect();
                        wtr.write_record(&row)?;
                    }
                }
            }
            _ => {
                wtr.write_record(["value"])?;
                for item in arr {
                    wtr.write_record([value_to_string(item)])?;
                }
            }
        },
        Value::Object(obj) => {
            wtr.write_record(["key", "value"])?;
            for (k, v) in obj {
                wtr.write_record([k.clone(), value_to_string(v)])?;
            }
        }
        _ => {
            wtr.write_record(["value"])?;
            wtr.write_record([value_to_string(value)])?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| SerializeError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SerializeError::Csv(e.to_string()))
}

fn value_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// Text rendering
// ============================================================================

const COLUMNS: [&str; 7] = ["LRN", "Full Name", "Sex", "Age", "Grade Level", "Section", "Track/Strand"];

fn row(student: &Student) -> [String; 7] {
    [
        student.lrn.clone(),
        student.full_name(),
        student.sex.to_string(),
        student.age.to_string(),
        student.grade_level.clone(),
        student.section.clone(),
        student.track_and_strand.clone(),
    ]
}

/// Left-aligned table with a header row; columns are as wide as their
/// widest cell.
pub fn render_table(students: &[Student]) -> String {
    let rows: Vec<[String; 7]> = students.iter().map(row).collect();
    let mut widths = COLUMNS.map(|c| c.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = COLUMNS.map(str::to_string);
    for cells in std::iter::once(&header).chain(&rows) {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

/// Table, pager line and status label for one page.
pub fn render_page(page: &PageResult, summary: &ActiveFilterSummary) -> String {
    let mut out = if page.is_empty() {
        "No students match.\n".to_string()
    } else {
        render_table(&page.records)
    };
    let _ = writeln!(out);
    match page.span() {
        Some((first, last)) => {
            let _ = writeln!(
                out,
                "Page {} of {} (rows {first}-{last} of {})",
                page.page, page.total_pages, page.total
            );
        }
        None => {
            let _ = writeln!(out, "Page {} of {}", page.page, page.total_pages);
        }
    }
    let _ = writeln!(out, "{summary}");
    out
}

pub fn render_details(student: &Student) -> String {
    let fields = [
        ("LRN", student.lrn.clone()),
        ("Full Name", student.full_name()),
        ("Formatted Name", student.formatted_name()),
        ("Sex", student.sex.to_string()),
        ("Age", student.age.to_string()),
        ("Grade Level", student.grade_level.clone()),
        ("Section", student.section.clone()),
        ("Track/Strand", student.track_and_strand.clone()),
    ];
    let mut out = String::new();
    for (label, value) in fields {
        let _ = writeln!(out, "{:<15} {value}", format!("{label}:"));
    }
    out
}

pub fn render_facets(facets: &Facets) -> String {
    let list = |values: &std::collections::BTreeSet<String>| {
        if values.is_empty() {
            "-".to_string()
        } else {
            values.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };
    format!(
        "Grade levels:   {}\nSections:       {}\nTracks/strands: {}\nAges:           {}-{}\n",
        list(&facets.grade_levels),
        list(&facets.sections),
        list(&facets.tracks_and_strands),
        facets.age_bounds.min,
        facets.age_bounds.max
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster::{AgeBounds, FilterCriteria, PageSize, Sex};
    use serde_json::json;

    fn ana() -> Student {
        Student::new("1001", "Cruz", "Ana")
            .middle("Lim")
            .sex(Sex::Female)
            .age(16)
            .enrolled("Grade 10", "Rizal", "N/A")
    }

    #[test]
    fn text_is_not_structured() {
        let result = serialize_structured(&json!({"a": 1}), OutputFormat::Text);
        assert!(matches!(result, Err(SerializeError::NotStructured)));
    }

    #[test]
    fn json_and_yaml() {
        let json = serialize_structured(&ana(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"lrn\": \"1001\""));
        let yaml = serialize_structured(&ana(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("sex: Female"));
    }

    #[test]
    fn csv_array_of_objects() {
        let csv = serialize_csv(&vec![ana()]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 9);
        let record = reader.records().next().unwrap().unwrap();
        let cell = |name: &str| {
            let idx = headers.iter().position(|h| h == name).unwrap();
            record[idx].to_string()
        };
        assert_eq!(cell("lrn"), "1001");
        assert_eq!(cell("middle_name"), "Lim");
        assert_eq!(cell("sex"), "Female");
        assert_eq!(cell("age"), "16");
    }

    #[test]
    fn csv_single_object() {
        let csv = serialize_csv(&json!({"total": 3})).unwrap();
        assert!(csv.contains("key,value"));
        assert!(csv.contains("total,3"));
    }

    #[test]
    fn table_aligns_columns() {
        let table = render_table(&[ana()]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("LRN   Full Name"));
        assert!(lines[1].starts_with("1001  Cruz, Ana L."));
    }

    #[test]
    fn page_footer() {
        let bounds = AgeBounds::new(12, 18);
        let page = PageResult {
            records: vec![ana()],
            total: 1,
            page: 1,
            total_pages: 1,
            page_size: PageSize::default(),
        };
        let summary = ActiveFilterSummary::new(&FilterCriteria::defaults(bounds), bounds, 1);
        let text = render_page(&page, &summary);
        assert!(text.contains("Page 1 of 1 (rows 1-1 of 1)"));
        assert!(text.ends_with("Showing All Records: 1 Record Found\n"));
    }

    #[test]
    fn details_lists_both_name_forms() {
        let text = render_details(&ana());
        assert!(text.contains("Full Name:      Cruz, Ana L."));
        assert!(text.contains("Formatted Name: Ana L. Cruz"));
    }
}
