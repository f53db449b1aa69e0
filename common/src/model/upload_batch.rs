use serde::{Deserialize, Serialize};

/// Audit record of one processed spreadsheet row.
///
/// Written before the phone number is validated and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadBatch {
    pub id: i64,
    pub student_name: String,
    pub roll_no: String,
    pub parent_phone: String,
    pub section: Option<String>,
    pub attendance: f64,
    pub from_date: String,
    pub to_date: String,
    pub department: String,
    pub year: String,
    pub source_filename: String,
    pub uploaded_by: String,
    pub created_at: String,
}
