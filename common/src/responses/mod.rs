use crate::model::user::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub department: Option<String>,
    pub expires_in: u64,
}

/// A spreadsheet row that did not produce a sent SMS, with the reason why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub name: String,
    pub phone: String,
    pub reason: String,
}

/// A spreadsheet row whose guardian SMS was accepted by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentRow {
    pub name: String,
    pub phone: String,
}

/// Response body of the bulk send endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSendSummary {
    pub success: bool,
    pub sent: usize,
    pub skipped: usize,
    pub skipped_list: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}
