//! Message rendering and the gateway call for one notification.

use super::rows::StudentRow;
use super::{writer, BatchRequest, DispatchSettings, SkipReason};
use crate::gateway::{GatewayError, SentMessage, SmsGateway};
use log::{error, warn};
use rusqlite::Connection;

pub struct Dispatcher<'a> {
    gateway: &'a dyn SmsGateway,
    settings: &'a DispatchSettings,
}

impl<'a> Dispatcher<'a> {
    pub fn new(gateway: &'a dyn SmsGateway, settings: &'a DispatchSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn settings(&self) -> &DispatchSettings {
        self.settings
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.provider_name()
    }

    /// Renders the stored message body. The acknowledgment link is not part of it.
    pub fn render_message(&self, row: &StudentRow, req: &BatchRequest) -> String {
        let class = match row.section.as_deref() {
            Some(section) => format!("{} - {}", req.department, section),
            None => req.department.clone(),
        };
        format!(
            "Dear Parent, your ward {name} (Roll No: {roll}), {year}, {class}, has {attendance}% \
             attendance for the period {from} to {to}. Please ensure regular attendance. {contact}",
            name = row.name,
            roll = row.roll_no.as_deref().unwrap_or_default(),
            year = year_label(&req.year),
            class = class,
            attendance = format_percent(row.attendance),
            from = req.from_date,
            to = req.to_date,
            contact = self.settings.contact_line,
        )
    }

    /// Sends `message` plus the link and records the outcome on the notification.
    ///
    /// A gateway error marks the notification `failed` and becomes the row's skip reason.
    pub async fn dispatch(
        &self,
        conn: &Connection,
        id: i64,
        message: &str,
        link: &str,
        to: &str,
    ) -> Result<SentMessage, SkipReason> {
        let text = outgoing_text(message, link);
        match self
            .gateway
            .send(&text, to, &self.settings.from_number)
            .await
        {
            Ok(sent) => {
                if let Err(e) = writer::mark_sent(conn, id, &sent) {
                    error!("SMS {} sent as {} but status update failed: {}", id, sent.id, e);
                }
                Ok(sent)
            }
            Err(e) => {
                if let GatewayError::Rejected { status, .. } = &e {
                    warn!("Gateway rejected SMS {} with HTTP {}", id, status);
                }
                let reason = e.to_string();
                if let Err(db_err) = writer::mark_failed(conn, id, &reason) {
                    error!("SMS {} failed and status update failed too: {}", id, db_err);
                }
                Err(SkipReason::new(reason))
            }
        }
    }
}

pub fn outgoing_text(message: &str, link: &str) -> String {
    format!("{}\nPlease acknowledge: {}", message, link)
}

/// `"1"` → `"I Year"`; anything else is shown as given.
pub fn year_label(year: &str) -> String {
    let roman = match year.trim() {
        "1" => "I",
        "2" => "II",
        "3" => "III",
        "4" => "IV",
        other => return other.to_string(),
    };
    format!("{} Year", roman)
}

fn format_percent(value: f64) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
