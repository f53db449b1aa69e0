use serde::{Deserialize, Serialize};

/// Delivery lifecycle of a guardian notification.
///
/// A notification starts as `Pending` when it is persisted and moves exactly
/// once to `Sent` or `Failed` after the gateway call. Both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(NotificationStatus::Pending),
            "sent" => Some(NotificationStatus::Sent),
            "failed" => Some(NotificationStatus::Failed),
            _ => None,
        }
    }
}

/// One SMS sent (or attempted) to a student's guardian.
///
/// `message` is the rendered body without the acknowledgment link; the text
/// handed to the gateway is `message` followed by `ack_link`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub student_name: String,
    pub roll_no: String,
    pub parent_phone: String,
    pub department: String,
    pub year: String,
    pub message: String,
    pub attendance: f64,
    pub status: NotificationStatus,
    pub sms_sid: Option<String>,
    pub sms_status: Option<String>,
    pub delivered: bool,
    pub seen: bool,
    pub seen_at: Option<String>,
    pub ack_link: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
