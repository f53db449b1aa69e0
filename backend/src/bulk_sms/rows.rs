//! Turns an uploaded attendance spreadsheet (CSV export) into typed rows.
//!
//! Column headers are matched loosely: case, spaces and punctuation are
//! ignored and common aliases are accepted, so "Roll No.", "roll_no" and
//! "ROLL NUMBER" all land in [`StudentRow::roll_no`]. Every field has a
//! documented default, applied once here so later stages never re-check.
//!
//! Cells are decoded leniently: bytes that are not UTF-8 (Windows-1252 exports)
//! become U+FFFD instead of failing the whole sheet.

use csv::{ByteRecord, ReaderBuilder, Trim};
use std::borrow::Cow;
use thiserror::Error;

/// One student line of the spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRow {
    /// Defaults to an empty string.
    pub name: String,
    /// `None` when the cell is missing or blank.
    pub roll_no: Option<String>,
    /// Raw guardian phone cell, defaults to an empty string.
    pub phone: String,
    /// Percentage, coerced; missing or unparseable values become `0.0`.
    pub attendance: f64,
    pub section: Option<String>,
}

#[derive(Debug, Error)]
pub enum RowsError {
    #[error("failed to read spreadsheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet is empty")]
    Empty,
    #[error("spreadsheet has no phone column")]
    MissingPhoneColumn,
}

const NAME_ALIASES: &[&str] = &["name", "studentname", "student"];
const ROLL_ALIASES: &[&str] = &[
    "rollno",
    "rollnumber",
    "roll",
    "regno",
    "registerno",
    "registernumber",
];
const PHONE_ALIASES: &[&str] = &[
    "phone",
    "parentphone",
    "phoneno",
    "phonenumber",
    "mobile",
    "mobileno",
    "parentmobile",
    "guardianphone",
    "contact",
    "parentcontact",
];
const ATTENDANCE_ALIASES: &[&str] = &[
    "attendance",
    "attendancepercentage",
    "attendancepercent",
    "percentage",
    "percent",
];
const SECTION_ALIASES: &[&str] = &["section", "class"];

fn header_key(cell: &str) -> String {
    cell.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Picks the delimiter that occurs most often in the header line.
fn detect_delimiter(header_line: &str) -> u8 {
    [b',', b';', b'\t', b'|']
        .into_iter()
        .max_by_key(|d| header_line.bytes().filter(|b| b == d).count())
        .unwrap_or(b',')
}

#[derive(Debug, Default)]
struct ColumnMap {
    name: Option<usize>,
    roll_no: Option<usize>,
    phone: usize,
    attendance: Option<usize>,
    section: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &ByteRecord) -> Result<Self, RowsError> {
        let keys: Vec<String> = headers.iter().map(|h| header_key(&decode(h))).collect();
        let find = |aliases: &[&str]| keys.iter().position(|k| aliases.contains(&k.as_str()));

        Ok(ColumnMap {
            name: find(NAME_ALIASES),
            roll_no: find(ROLL_ALIASES),
            phone: find(PHONE_ALIASES).ok_or(RowsError::MissingPhoneColumn)?,
            attendance: find(ATTENDANCE_ALIASES),
            section: find(SECTION_ALIASES),
        })
    }

    fn extract(&self, record: &ByteRecord) -> StudentRow {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|raw| decode(raw).trim().to_string())
                .filter(|s| !s.is_empty())
        };

        StudentRow {
            name: cell(self.name).unwrap_or_default(),
            roll_no: cell(self.roll_no),
            phone: cell(Some(self.phone)).unwrap_or_default(),
            attendance: cell(self.attendance)
                .map(|a| parse_attendance(&a))
                .unwrap_or(0.0),
            section: cell(self.section),
        }
    }
}

fn decode(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

/// Coerces an attendance cell such as `"72.5"`, `"72.5 %"` or `"abc"`.
pub fn parse_attendance(raw: &str) -> f64 {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

/// Reads all student rows from CSV bytes, in file order.
///
/// Lines whose cells are all blank are dropped.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<StudentRow>, RowsError> {
    let header_line = bytes
        .split(|b| *b == b'\n')
        .next()
        .map(String::from_utf8_lossy)
        .unwrap_or_default();
    if header_line.trim().is_empty() {
        return Err(RowsError::Empty);
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(detect_delimiter(&header_line))
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let columns = ColumnMap::from_headers(reader.byte_headers()?)?;

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        if record.iter().all(|c| c.trim_ascii().is_empty()) {
            continue;
        }
        rows.push(columns.extract(&record));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_with_aliased_headers() {
        let csv = "Student Name,Roll No.,Parent Phone,Attendance %,Section\n\
                   Asha,21CS001,9876543210,72.5,A\n\
                   Ravi,21CS002,09123456789,80,\n";
        let rows = read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            StudentRow {
                name: "Asha".to_string(),
                roll_no: Some("21CS001".to_string()),
                phone: "9876543210".to_string(),
                attendance: 72.5,
                section: Some("A".to_string()),
            }
        );
        assert_eq!(rows[1].section, None);
        assert_eq!(rows[1].attendance, 80.0);
    }

    #[test]
    fn missing_and_unparseable_cells_take_defaults() {
        let csv = "name;roll no;mobile;attendance\n\
                   ;;;\n\
                   Kiran;;98765 43210;absent\n\
                   Meena;R7;9876543210;-4\n";
        let rows = read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2, "blank line is dropped");
        assert_eq!(rows[0].name, "Kiran");
        assert_eq!(rows[0].roll_no, None);
        assert_eq!(rows[0].attendance, 0.0);
        assert_eq!(rows[1].attendance, 0.0);
    }

    #[test]
    fn short_records_do_not_fail() {
        let csv = "Name,Phone,Attendance\nAsha,9876543210\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].attendance, 0.0);
        assert_eq!(rows[0].phone, "9876543210");
    }

    #[test]
    fn phone_column_is_required() {
        let err = read_rows(b"Name,Attendance\nAsha,40\n").unwrap_err();
        assert!(matches!(err, RowsError::MissingPhoneColumn));
    }

    #[test]
    fn empty_upload_is_rejected() {
        assert!(matches!(read_rows(b"").unwrap_err(), RowsError::Empty));
    }

    #[test]
    fn non_utf8_cells_do_not_drop_the_sheet() {
        let csv = b"Name,Roll No,Phone,Attendance\n\
                    Asha,R1,9876543210,40\n\
                    Jos\xe9,R2,9876543211,40\n";
        let rows = read_rows(csv).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Asha");
        assert_eq!(rows[1].name, "Jos\u{fffd}");
        assert_eq!(rows[1].roll_no.as_deref(), Some("R2"));
        assert_eq!(rows[1].phone, "9876543211");
    }

    #[test]
    fn attendance_accepts_percent_suffix() {
        assert_eq!(parse_attendance("64.5 %"), 64.5);
        assert_eq!(parse_attendance("NaN"), 0.0);
    }
}
