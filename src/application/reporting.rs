use serde::{Deserialize, Serialize};

use crate::domain::{Pages, PrintingLog, Student};

use super::Rejection;

/// Result of submitting a batch of print jobs.
///
/// `logs` holds every job committed before processing stopped. A batch that
/// stops at job N keeps jobs 1..N-1 committed; later jobs are never attempted.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub logs: Vec<PrintingLog>,
    #[serde(skip)]
    pub rejection: Option<Rejection>,
    pub message: String,
}

impl SubmitOutcome {
    pub const SUCCESS_MESSAGE: &'static str = "Printing information saved successfully.";

    pub(crate) fn completed(logs: Vec<PrintingLog>) -> Self {
        Self {
            logs,
            rejection: None,
            message: Self::SUCCESS_MESSAGE.to_string(),
        }
    }

    pub(crate) fn rejected(logs: Vec<PrintingLog>, rejection: Rejection) -> Self {
        Self {
            logs,
            message: rejection.to_string(),
            rejection: Some(rejection),
        }
    }

    /// True when every request in the batch was recorded.
    pub fn is_complete(&self) -> bool {
        self.rejection.is_none()
    }
}

/// A student's printing history, derived from the log table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentUsage {
    pub student: Student,
    pub job_count: i64,
    pub pages_printed: Pages,
    pub logs: Vec<PrintingLog>,
}
