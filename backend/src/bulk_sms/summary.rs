use super::rows::StudentRow;
use super::SkipReason;
use common::responses::{BulkSendSummary, SentRow, SkippedRow};

/// Sent and skipped rows of one batch, in spreadsheet order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    sent: Vec<SentRow>,
    skipped: Vec<SkippedRow>,
}

impl BatchOutcome {
    pub fn record_sent(&mut self, row: &StudentRow, normalized_phone: String) {
        self.sent.push(SentRow {
            name: row.name.clone(),
            phone: normalized_phone,
        });
    }

    /// Keeps the phone exactly as it appeared in the spreadsheet.
    pub fn record_skipped(&mut self, row: &StudentRow, reason: SkipReason) {
        self.skipped.push(SkippedRow {
            name: row.name.clone(),
            phone: row.phone.clone(),
            reason: reason.into_inner(),
        });
    }

    pub fn sent(&self) -> &[SentRow] {
        &self.sent
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn total(&self) -> usize {
        self.sent.len() + self.skipped.len()
    }

    pub fn into_summary(self) -> BulkSendSummary {
        BulkSendSummary {
            success: true,
            sent: self.sent.len(),
            skipped: self.skipped.len(),
            skipped_list: self.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, phone: &str) -> StudentRow {
        StudentRow {
            name: name.to_string(),
            roll_no: None,
            phone: phone.to_string(),
            attendance: 0.0,
            section: None,
        }
    }

    #[test]
    fn summary_counts_and_keeps_order() {
        let mut outcome = BatchOutcome::default();
        outcome.record_skipped(&row("A", "123"), SkipReason::new("Invalid phone number"));
        outcome.record_sent(&row("B", "9876543210"), "+919876543210".to_string());
        outcome.record_skipped(&row("C", "x"), SkipReason::new("Attendance >= 75%"));
        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.sent()[0].phone, "+919876543210");

        let summary = outcome.into_summary();
        assert!(summary.success);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.skipped, 2);
        let names: Vec<_> = summary.skipped_list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(summary.skipped_list[0].phone, "123");
    }
}
