use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{total_pages, PageSize, Pages, PrinterId, StudentId};

pub type PrintingLogId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrintStatus {
    /// Recorded and paid for, waiting on the printer
    Pending,
    Completed,
    Cancelled,
}

impl PrintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintStatus::Pending => "PENDING",
            PrintStatus::Completed => "COMPLETED",
            PrintStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(PrintStatus::Pending),
            "COMPLETED" => Some(PrintStatus::Completed),
            "CANCELLED" => Some(PrintStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to print one document, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintJobRequest {
    pub student_id: StudentId,
    pub printer_id: PrinterId,
    #[serde(default)]
    pub document_name: Option<String>,
    pub document_pages: Pages,
    #[serde(default = "default_copies")]
    pub copies: Pages,
    #[serde(default)]
    pub duplex: bool,
    #[serde(default)]
    pub color: bool,
    #[serde(default)]
    pub page_size: PageSize,
}

fn default_copies() -> Pages {
    1
}

impl PrintJobRequest {
    /// `None` when the total overflows.
    pub fn total_pages(&self) -> Option<Pages> {
        total_pages(self.document_pages, self.copies, self.duplex)
    }
}

/// A recorded print job. The student and printer are referenced by id only;
/// a student's history is a query over this table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintingLog {
    pub id: PrintingLogId,
    pub student_id: StudentId,
    pub printer_id: PrinterId,
    pub document_name: Option<String>,
    pub document_pages: Pages,
    pub copies: Pages,
    pub duplex: bool,
    pub color: bool,
    pub page_size: PageSize,
    /// Pages actually consumed, after duplex and copies
    pub total_pages: Pages,
    pub status: PrintStatus,
    pub created_at: DateTime<Utc>,
}

impl PrintingLog {
    /// Build a pending log from a validated request and its computed total.
    pub fn from_request(request: &PrintJobRequest, total_pages: Pages) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id: request.student_id,
            printer_id: request.printer_id,
            document_name: request.document_name.clone(),
            document_pages: request.document_pages,
            copies: request.copies,
            duplex: request.duplex,
            color: request.color,
            page_size: request.page_size,
            total_pages,
            status: PrintStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            PrintStatus::Pending,
            PrintStatus::Completed,
            PrintStatus::Cancelled,
        ] {
            assert_eq!(PrintStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(PrintStatus::from_str("printing"), None);
    }

    #[test]
    fn test_log_from_request_is_pending_with_total() {
        let request = PrintJobRequest {
            student_id: Uuid::new_v4(),
            printer_id: Uuid::new_v4(),
            document_name: Some("thesis.pdf".into()),
            document_pages: 5,
            copies: 3,
            duplex: true,
            color: false,
            page_size: PageSize::A3,
        };

        let log = PrintingLog::from_request(&request, 9);
        assert_eq!(log.status, PrintStatus::Pending);
        assert_eq!(log.total_pages, 9);
        assert_eq!(log.student_id, request.student_id);
        assert_eq!(log.printer_id, request.printer_id);
        assert_eq!(log.page_size, PageSize::A3);
        assert_eq!(log.document_name.as_deref(), Some("thesis.pdf"));
    }

    #[test]
    fn test_request_defaults_from_json() {
        let json = format!(
            r#"{{"student_id":"{}","printer_id":"{}","document_pages":3}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let request: PrintJobRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.copies, 1);
        assert!(!request.duplex);
        assert!(!request.color);
        assert_eq!(request.page_size, PageSize::A4);
        assert_eq!(request.document_name, None);
    }
}
