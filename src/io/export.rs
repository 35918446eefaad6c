use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;

use crate::application::PrintingService;
use crate::domain::{Printer, PrintingLog, Student};

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub students: Vec<Student>,
    pub printers: Vec<Printer>,
    pub logs: Vec<PrintingLog>,
}

/// Exporter for converting printing data to various formats
pub struct Exporter<'a> {
    service: &'a PrintingService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a PrintingService) -> Self {
        Self { service }
    }

    /// Export printing logs to CSV format
    pub async fn export_logs_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let logs = self.service.list_logs().await?;

        // Resolve references once instead of per row
        let student_codes: HashMap<_, _> = self
            .service
            .list_students()
            .await?
            .into_iter()
            .map(|s| (s.id, s.code))
            .collect();
        let printer_names: HashMap<_, _> = self
            .service
            .list_printers()
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "created_at",
            "student_code",
            "printer_name",
            "document_name",
            "document_pages",
            "copies",
            "duplex",
            "color",
            "page_size",
            "total_pages",
            "status",
        ])?;

        let mut count = 0;
        for log in &logs {
            csv_writer.write_record(&[
                log.id.to_string(),
                log.created_at.to_rfc3339(),
                student_codes.get(&log.student_id).cloned().unwrap_or_default(),
                printer_names.get(&log.printer_id).cloned().unwrap_or_default(),
                log.document_name.clone().unwrap_or_default(),
                log.document_pages.to_string(),
                log.copies.to_string(),
                log.duplex.to_string(),
                log.color.to_string(),
                log.page_size.to_string(),
                log.total_pages.to_string(),
                log.status.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export full database as JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<Snapshot> {
        let snapshot = Snapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            students: self.service.list_students().await?,
            printers: self.service.list_printers().await?,
            logs: self.service.list_logs().await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
