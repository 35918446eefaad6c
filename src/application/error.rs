use thiserror::Error;

use crate::domain::{PageSize, Pages, PrinterId, StudentId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Student already exists: {0}")]
    StudentAlreadyExists(String),

    #[error("Printer not found: {0}")]
    PrinterNotFound(String),

    #[error("Printing log not found: {0}")]
    PrintingLogNotFound(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

/// Business-rule violation that stops a print batch.
/// Reported inside [`super::SubmitOutcome`], never as an `Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Invalid print request: {0}")]
    InvalidRequest(String),

    #[error("Student not found for the given ID: {0}")]
    StudentNotFound(StudentId),

    #[error("Insufficient paper quantity for the student: balance {balance}, required {required}")]
    InsufficientStudentPaper {
        student_id: StudentId,
        balance: Pages,
        required: Pages,
    },

    #[error("Printer not found for the given ID: {0}")]
    PrinterNotFound(PrinterId),

    #[error("Insufficient {page_size} paper for the printer: left {left}, required {required}")]
    InsufficientPrinterPaper {
        printer_id: PrinterId,
        page_size: PageSize,
        left: Pages,
        required: Pages,
    },
}
