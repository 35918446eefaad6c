// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use printledger::application::PrintingService;
use printledger::domain::{PageSize, PaperStock, PrintJobRequest, Printer, Student};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(PrintingService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = PrintingService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Test fixture: one student and one printer
pub struct Campus {
    pub student: Student,
    pub printer: Printer,
}

impl Campus {
    /// Student with 100 pages; printer with 10 A1, 20 A2, 30 A3, 500 A4 sheets
    pub async fn create(service: &PrintingService) -> Result<Self> {
        Self::create_with(service, 100, PaperStock::new(10, 20, 30, 500)).await
    }

    pub async fn create_with(
        service: &PrintingService,
        student_pages: i64,
        stock: PaperStock,
    ) -> Result<Self> {
        let student = service
            .register_student("An Nguyen".into(), "2212345".into(), student_pages)
            .await?;
        let printer = service
            .register_printer("H6-101".into(), Some("Building H6".into()), stock)
            .await?;
        Ok(Self { student, printer })
    }

    /// A simplex, monochrome request for this student and printer
    pub fn request(&self, pages: i64, copies: i64, page_size: PageSize) -> PrintJobRequest {
        PrintJobRequest {
            student_id: self.student.id,
            printer_id: self.printer.id,
            document_name: None,
            document_pages: pages,
            copies,
            duplex: false,
            color: false,
            page_size,
        }
    }

    /// Reload the student and printer from the database
    pub async fn reload(&self, service: &PrintingService) -> Result<(Student, Printer)> {
        Ok((
            service.get_student(self.student.id).await?,
            service.get_printer(self.printer.id).await?,
        ))
    }
}
