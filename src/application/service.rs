use tracing::{info, warn};

use crate::domain::{
    PageSize, Pages, PaperStock, PrintJobRequest, Printer, PrinterId, PrintingLog, PrintingLogId,
    Student, StudentId,
};
use crate::storage::Repository;

use super::{AppError, Rejection, StudentUsage, SubmitOutcome};

/// Application service for print-job accounting.
/// This is the primary interface for any client (CLI, API, etc.).
pub struct PrintingService {
    repo: Repository,
}

impl PrintingService {
    /// Create a new printing service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Student operations
    // ========================

    /// Register a new student with an initial page budget.
    pub async fn register_student(
        &self,
        name: String,
        code: String,
        paper_quantity: Pages,
    ) -> Result<Student, AppError> {
        if paper_quantity < 0 {
            return Err(AppError::InvalidQuantity(
                "Paper quantity cannot be negative".to_string(),
            ));
        }
        if self.repo.get_student_by_code(&code).await?.is_some() {
            return Err(AppError::StudentAlreadyExists(code));
        }

        let student = Student::new(name, code, paper_quantity);
        self.repo.save_student(&student).await?;
        info!(student_id = %student.id, code = %student.code, "registered student");
        Ok(student)
    }

    /// Get a student by ID.
    pub async fn get_student(&self, id: StudentId) -> Result<Student, AppError> {
        self.repo
            .get_student(id)
            .await?
            .ok_or_else(|| AppError::StudentNotFound(id.to_string()))
    }

    /// Get a student by student code.
    pub async fn get_student_by_code(&self, code: &str) -> Result<Student, AppError> {
        self.repo
            .get_student_by_code(code)
            .await?
            .ok_or_else(|| AppError::StudentNotFound(code.to_string()))
    }

    /// List all students.
    pub async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        Ok(self.repo.list_students().await?)
    }

    /// Add purchased pages to a student's budget.
    pub async fn add_paper(&self, student_id: StudentId, pages: Pages) -> Result<Student, AppError> {
        if pages <= 0 {
            return Err(AppError::InvalidQuantity(
                "Pages to add must be positive".to_string(),
            ));
        }

        let mut student = self.get_student(student_id).await?;
        if student.add_paper(pages).is_none() {
            return Err(AppError::InvalidQuantity(format!(
                "Adding {} pages would overflow the balance of {}",
                pages, student.paper_quantity
            )));
        }
        self.repo.save_student(&student).await?;
        info!(student_id = %student.id, pages, balance = student.paper_quantity, "added paper");
        Ok(student)
    }

    // ========================
    // Printer operations
    // ========================

    /// Register a new printer with its initial paper stock.
    pub async fn register_printer(
        &self,
        name: String,
        location: Option<String>,
        stock: PaperStock,
    ) -> Result<Printer, AppError> {
        if PageSize::ALL.iter().any(|size| stock.available(*size) < 0) {
            return Err(AppError::InvalidQuantity(
                "Paper stock cannot be negative".to_string(),
            ));
        }

        let mut printer = Printer::new(name, stock);
        if let Some(location) = location {
            printer = printer.with_location(location);
        }

        self.repo.save_printer(&printer).await?;
        info!(printer_id = %printer.id, name = %printer.name, "registered printer");
        Ok(printer)
    }

    /// Get a printer by ID.
    pub async fn get_printer(&self, id: PrinterId) -> Result<Printer, AppError> {
        self.repo
            .get_printer(id)
            .await?
            .ok_or_else(|| AppError::PrinterNotFound(id.to_string()))
    }

    /// List all printers.
    pub async fn list_printers(&self) -> Result<Vec<Printer>, AppError> {
        Ok(self.repo.list_printers().await?)
    }

    /// Load sheets of one size into a printer.
    pub async fn restock_printer(
        &self,
        printer_id: PrinterId,
        size: PageSize,
        sheets: Pages,
    ) -> Result<Printer, AppError> {
        if sheets <= 0 {
            return Err(AppError::InvalidQuantity(
                "Sheets to add must be positive".to_string(),
            ));
        }

        let mut printer = self.get_printer(printer_id).await?;
        if printer.stock.credit(size, sheets).is_none() {
            return Err(AppError::InvalidQuantity(format!(
                "Adding {} {} sheets would overflow the printer's stock of {}",
                sheets,
                size,
                printer.stock.available(size)
            )));
        }
        self.repo.save_printer(&printer).await?;
        info!(printer_id = %printer.id, %size, sheets, "restocked printer");
        Ok(printer)
    }

    /// Remove printers by ID. Unknown IDs and printers with printing history
    /// are skipped. Returns how many printers were removed.
    pub async fn delete_printers(&self, ids: &[PrinterId]) -> Result<u64, AppError> {
        let removed = self.repo.delete_printers(ids).await?;
        info!(requested = ids.len(), removed, "deleted printers");
        Ok(removed)
    }

    // ========================
    // Printing log operations
    // ========================

    /// List every printing log.
    pub async fn list_logs(&self) -> Result<Vec<PrintingLog>, AppError> {
        Ok(self.repo.list_logs().await?)
    }

    /// List the printing logs of one student. Empty if the student has none.
    pub async fn list_logs_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<PrintingLog>, AppError> {
        Ok(self.repo.list_logs_for_student(student_id).await?)
    }

    /// Get a printing log by ID.
    pub async fn get_log(&self, id: PrintingLogId) -> Result<PrintingLog, AppError> {
        self.repo
            .get_log(id)
            .await?
            .ok_or_else(|| AppError::PrintingLogNotFound(id.to_string()))
    }

    /// Record a batch of print jobs in order.
    ///
    /// Each job that passes validation is committed on its own before the next
    /// one is looked at. The first rejected job stops the batch: earlier jobs
    /// stay committed and later ones are never attempted. Rejections are
    /// reported in the outcome; only storage failures return `Err`.
    pub async fn submit(&self, requests: &[PrintJobRequest]) -> Result<SubmitOutcome, AppError> {
        let mut logs = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            match self.record_job(request).await? {
                Ok(log) => logs.push(log),
                Err(rejection) => {
                    warn!(
                        position = index + 1,
                        batch_size = requests.len(),
                        committed = logs.len(),
                        %rejection,
                        "print batch stopped"
                    );
                    return Ok(SubmitOutcome::rejected(logs, rejection));
                }
            }
        }

        info!(count = logs.len(), "print batch recorded");
        Ok(SubmitOutcome::completed(logs))
    }

    /// Validate and commit a single print job.
    async fn record_job(
        &self,
        request: &PrintJobRequest,
    ) -> Result<Result<PrintingLog, Rejection>, AppError> {
        if request.document_pages < 1 || request.copies < 1 {
            return Ok(Err(Rejection::InvalidRequest(format!(
                "document pages and copies must be at least 1 (got {} pages, {} copies)",
                request.document_pages, request.copies
            ))));
        }

        let Some(required) = request.total_pages() else {
            return Ok(Err(Rejection::InvalidRequest(format!(
                "job too large to account for ({} pages, {} copies)",
                request.document_pages, request.copies
            ))));
        };

        let Some(mut student) = self.repo.get_student(request.student_id).await? else {
            return Ok(Err(Rejection::StudentNotFound(request.student_id)));
        };

        if !student.can_afford(required) {
            return Ok(Err(Rejection::InsufficientStudentPaper {
                student_id: student.id,
                balance: student.paper_quantity,
                required,
            }));
        }

        let Some(mut printer) = self.repo.get_printer(request.printer_id).await? else {
            return Ok(Err(Rejection::PrinterNotFound(request.printer_id)));
        };

        if !printer.has_paper(request.page_size, required) {
            return Ok(Err(Rejection::InsufficientPrinterPaper {
                printer_id: printer.id,
                page_size: request.page_size,
                left: printer.stock.available(request.page_size),
                required,
            }));
        }

        let log = PrintingLog::from_request(request, required);
        student.charge(request, required);
        printer.stock.debit(request.page_size, required);

        self.repo.record_print_job(&student, &printer, &log).await?;
        info!(
            log_id = %log.id,
            student_id = %student.id,
            printer_id = %printer.id,
            total_pages = required,
            "recorded print job"
        );

        Ok(Ok(log))
    }

    /// Delete printing logs by ID. Unknown IDs are ignored.
    /// Returns how many logs were removed.
    pub async fn delete_logs(&self, ids: &[PrintingLogId]) -> Result<u64, AppError> {
        let removed = self.repo.delete_logs(ids).await?;
        info!(requested = ids.len(), removed, "deleted printing logs");
        Ok(removed)
    }

    // ========================
    // Reporting
    // ========================

    /// Summarize a student's printing history.
    pub async fn student_usage(&self, student_id: StudentId) -> Result<StudentUsage, AppError> {
        let student = self.get_student(student_id).await?;
        let (job_count, pages_printed) = self.repo.student_usage_totals(student_id).await?;
        let logs = self.repo.list_logs_for_student(student_id).await?;

        Ok(StudentUsage {
            student,
            job_count,
            pages_printed,
            logs,
        })
    }
}
