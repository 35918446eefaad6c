use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{Executor, Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    PageSize, Pages, PaperStock, PrintSettings, PrintStatus, Printer, PrinterId, PrintingLog,
    PrintingLogId, Student, StudentId,
};

use super::MIGRATION_001_INITIAL;

const STUDENT_COLUMNS: &str = "id, name, code, paper_quantity, duplex, color, page_size";

const PRINTER_COLUMNS: &str =
    "id, name, location, paper_a1_left, paper_a2_left, paper_a3_left, paper_a4_left";

const LOG_COLUMNS: &str = "id, student_id, printer_id, document_name, document_pages, copies, duplex, color, page_size, total_pages, status, created_at";

/// Repository for persisting and querying students, printers and printing logs.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run more than once.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Student operations
    // ========================

    /// Insert or update a student.
    pub async fn save_student(&self, student: &Student) -> Result<()> {
        upsert_student(&self.pool, student).await
    }

    /// Get a student by ID.
    pub async fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
        debug!(student_id = %id, "loading student");
        let row = sqlx::query(&format!(
            "SELECT {} FROM students WHERE id = ?",
            STUDENT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch student")?;

        row.as_ref().map(Self::row_to_student).transpose()
    }

    /// Get a student by student code.
    pub async fn get_student_by_code(&self, code: &str) -> Result<Option<Student>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM students WHERE code = ?",
            STUDENT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch student by code")?;

        row.as_ref().map(Self::row_to_student).transpose()
    }

    /// List all students, ordered by code.
    pub async fn list_students(&self) -> Result<Vec<Student>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM students ORDER BY code",
            STUDENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list students")?;

        rows.iter().map(Self::row_to_student).collect()
    }

    fn row_to_student(row: &SqliteRow) -> Result<Student> {
        let id_str: String = row.get("id");
        let page_size_str: String = row.get("page_size");

        Ok(Student {
            id: Uuid::parse_str(&id_str).context("Invalid student ID")?,
            name: row.get("name"),
            code: row.get("code"),
            paper_quantity: row.get("paper_quantity"),
            last_settings: PrintSettings {
                duplex: row.get::<i32, _>("duplex") != 0,
                color: row.get::<i32, _>("color") != 0,
                page_size: parse_page_size(&page_size_str)?,
            },
        })
    }

    // ========================
    // Printer operations
    // ========================

    /// Insert or update a printer.
    pub async fn save_printer(&self, printer: &Printer) -> Result<()> {
        upsert_printer(&self.pool, printer).await
    }

    /// Get a printer by ID.
    pub async fn get_printer(&self, id: PrinterId) -> Result<Option<Printer>> {
        debug!(printer_id = %id, "loading printer");
        let row = sqlx::query(&format!(
            "SELECT {} FROM printers WHERE id = ?",
            PRINTER_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch printer")?;

        row.as_ref().map(Self::row_to_printer).transpose()
    }

    /// List all printers, ordered by name.
    pub async fn list_printers(&self) -> Result<Vec<Printer>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM printers ORDER BY name",
            PRINTER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list printers")?;

        rows.iter().map(Self::row_to_printer).collect()
    }

    fn row_to_printer(row: &SqliteRow) -> Result<Printer> {
        let id_str: String = row.get("id");

        Ok(Printer {
            id: Uuid::parse_str(&id_str).context("Invalid printer ID")?,
            name: row.get("name"),
            location: row.get("location"),
            stock: PaperStock {
                a1: row.get("paper_a1_left"),
                a2: row.get("paper_a2_left"),
                a3: row.get("paper_a3_left"),
                a4: row.get("paper_a4_left"),
            },
        })
    }

    // ========================
    // Printing log operations
    // ========================

    /// Save a printing log on its own, outside a print job.
    /// This is the store's plain write path for logs, e.g. a status change made
    /// after printing; the print flow itself goes through `record_print_job`.
    pub async fn save_log(&self, log: &PrintingLog) -> Result<()> {
        insert_log(&self.pool, log).await
    }

    /// Persist the outcome of one print job: the charged student, the debited
    /// printer and the new log, all in a single transaction.
    pub async fn record_print_job(
        &self,
        student: &Student,
        printer: &Printer,
        log: &PrintingLog,
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin print job transaction")?;

        upsert_student(&mut *tx, student).await?;
        upsert_printer(&mut *tx, printer).await?;
        insert_log(&mut *tx, log).await?;

        tx.commit()
            .await
            .context("Failed to commit print job transaction")?;
        Ok(())
    }

    /// Get a printing log by ID.
    pub async fn get_log(&self, id: PrintingLogId) -> Result<Option<PrintingLog>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM printing_logs WHERE id = ?",
            LOG_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch printing log")?;

        row.as_ref().map(Self::row_to_log).transpose()
    }

    /// List all printing logs in insertion order.
    pub async fn list_logs(&self) -> Result<Vec<PrintingLog>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM printing_logs ORDER BY rowid",
            LOG_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list printing logs")?;

        rows.iter().map(Self::row_to_log).collect()
    }

    /// List printing logs belonging to one student, in insertion order.
    pub async fn list_logs_for_student(&self, student_id: StudentId) -> Result<Vec<PrintingLog>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM printing_logs WHERE student_id = ? ORDER BY rowid",
            LOG_COLUMNS
        ))
        .bind(student_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list printing logs for student")?;

        rows.iter().map(Self::row_to_log).collect()
    }

    /// Delete every log whose ID is in `ids`. Unknown IDs are ignored.
    /// Returns the number of rows removed.
    pub async fn delete_logs(&self, ids: &[PrintingLogId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!("DELETE FROM printing_logs WHERE id IN ({})", placeholders);

        let mut sql_query = sqlx::query(&query);
        for id in ids {
            sql_query = sql_query.bind(id.to_string());
        }

        let result = sql_query
            .execute(&self.pool)
            .await
            .context("Failed to delete printing logs")?;

        Ok(result.rows_affected())
    }

    /// Delete printers by ID. Unknown IDs are ignored, and so are printers
    /// that still have printing logs pointing at them.
    pub async fn delete_printers(&self, ids: &[PrinterId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            r#"
            DELETE FROM printers
            WHERE id IN ({})
              AND NOT EXISTS (SELECT 1 FROM printing_logs WHERE printer_id = printers.id)
            "#,
            placeholders
        );

        let mut sql_query = sqlx::query(&query);
        for id in ids {
            sql_query = sql_query.bind(id.to_string());
        }

        let result = sql_query
            .execute(&self.pool)
            .await
            .context("Failed to delete printers")?;

        Ok(result.rows_affected())
    }

    /// Count a student's jobs and the pages they consumed, via SQL aggregation.
    pub async fn student_usage_totals(&self, student_id: StudentId) -> Result<(i64, Pages)> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as job_count,
                COALESCE(SUM(total_pages), 0) as pages_printed
            FROM printing_logs
            WHERE student_id = ?
            "#,
        )
        .bind(student_id.to_string())
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute student usage")?;

        Ok((row.get("job_count"), row.get("pages_printed")))
    }

    fn row_to_log(row: &SqliteRow) -> Result<PrintingLog> {
        let id_str: String = row.get("id");
        let student_str: String = row.get("student_id");
        let printer_str: String = row.get("printer_id");
        let page_size_str: String = row.get("page_size");
        let status_str: String = row.get("status");
        let created_at_str: String = row.get("created_at");

        Ok(PrintingLog {
            id: Uuid::parse_str(&id_str).context("Invalid printing log ID")?,
            student_id: Uuid::parse_str(&student_str).context("Invalid student ID")?,
            printer_id: Uuid::parse_str(&printer_str).context("Invalid printer ID")?,
            document_name: row.get("document_name"),
            document_pages: row.get("document_pages"),
            copies: row.get("copies"),
            duplex: row.get::<i32, _>("duplex") != 0,
            color: row.get::<i32, _>("color") != 0,
            page_size: parse_page_size(&page_size_str)?,
            total_pages: row.get("total_pages"),
            status: PrintStatus::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid print status: {}", status_str))?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

fn parse_page_size(s: &str) -> Result<PageSize> {
    PageSize::from_str(s).ok_or_else(|| anyhow::anyhow!("Invalid page size: {}", s))
}

// Writers are generic over the executor so the same statements run against
// the pool or inside a transaction.

async fn upsert_student<'c, E>(executor: E, student: &Student) -> Result<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO students (id, name, code, paper_quantity, duplex, color, page_size)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            code = excluded.code,
            paper_quantity = excluded.paper_quantity,
            duplex = excluded.duplex,
            color = excluded.color,
            page_size = excluded.page_size
        "#,
    )
    .bind(student.id.to_string())
    .bind(&student.name)
    .bind(&student.code)
    .bind(student.paper_quantity)
    .bind(student.last_settings.duplex)
    .bind(student.last_settings.color)
    .bind(student.last_settings.page_size.as_str())
    .execute(executor)
    .await
    .context("Failed to save student")?;
    Ok(())
}

async fn upsert_printer<'c, E>(executor: E, printer: &Printer) -> Result<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO printers (id, name, location, paper_a1_left, paper_a2_left, paper_a3_left, paper_a4_left)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            location = excluded.location,
            paper_a1_left = excluded.paper_a1_left,
            paper_a2_left = excluded.paper_a2_left,
            paper_a3_left = excluded.paper_a3_left,
            paper_a4_left = excluded.paper_a4_left
        "#,
    )
    .bind(printer.id.to_string())
    .bind(&printer.name)
    .bind(&printer.location)
    .bind(printer.stock.a1)
    .bind(printer.stock.a2)
    .bind(printer.stock.a3)
    .bind(printer.stock.a4)
    .execute(executor)
    .await
    .context("Failed to save printer")?;
    Ok(())
}

async fn insert_log<'c, E>(executor: E, log: &PrintingLog) -> Result<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO printing_logs (id, student_id, printer_id, document_name, document_pages, copies, duplex, color, page_size, total_pages, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(log.id.to_string())
    .bind(log.student_id.to_string())
    .bind(log.printer_id.to_string())
    .bind(&log.document_name)
    .bind(log.document_pages)
    .bind(log.copies)
    .bind(log.duplex)
    .bind(log.color)
    .bind(log.page_size.as_str())
    .bind(log.total_pages)
    .bind(log.status.as_str())
    .bind(log.created_at.to_rfc3339())
    .execute(executor)
    .await
    .context("Failed to save printing log")?;
    Ok(())
}
