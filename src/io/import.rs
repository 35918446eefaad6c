use anyhow::{Context, Result};
use std::io::Read;

use crate::domain::PrintJobRequest;

/// Read a print batch from a JSON array of requests.
pub fn read_batch_json<R: Read>(reader: R) -> Result<Vec<PrintJobRequest>> {
    serde_json::from_reader(reader).context("Invalid print batch JSON")
}

/// Read a print batch from CSV, one request per row.
/// Columns follow the request field names; `copies`, `duplex`, `color` and
/// `page_size` columns may be omitted, `document_name` may also be empty.
pub fn read_batch_csv<R: Read>(reader: R) -> Result<Vec<PrintJobRequest>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize()
        .enumerate()
        .map(|(line_num, record)| {
            // +2 for header and 0-indexing
            record.with_context(|| format!("Invalid print request on line {}", line_num + 2))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageSize;

    #[test]
    fn test_read_batch_json() {
        let json = r#"[
            {"student_id":"7f1c7a4e-0d64-4e7c-9f2e-2b7a1d5f9a10","printer_id":"1b2c3d4e-5f60-4718-8293-a4b5c6d7e8f9","document_pages":5,"copies":3,"duplex":true,"page_size":"A3"},
            {"student_id":"7f1c7a4e-0d64-4e7c-9f2e-2b7a1d5f9a10","printer_id":"1b2c3d4e-5f60-4718-8293-a4b5c6d7e8f9","document_pages":2}
        ]"#;

        let batch = read_batch_json(json.as_bytes()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].total_pages(), Some(9));
        assert_eq!(batch[0].page_size, PageSize::A3);
        assert_eq!(batch[1].copies, 1);
        assert_eq!(batch[1].page_size, PageSize::A4);
    }

    #[test]
    fn test_read_batch_json_rejects_garbage() {
        assert!(read_batch_json("{not json".as_bytes()).is_err());
    }

    #[test]
    fn test_read_batch_csv() {
        let csv = "student_id,printer_id,document_name,document_pages,copies,duplex,color,page_size\n\
                   7f1c7a4e-0d64-4e7c-9f2e-2b7a1d5f9a10,1b2c3d4e-5f60-4718-8293-a4b5c6d7e8f9,notes.pdf,10,2,true,false,A4\n";

        let batch = read_batch_csv(csv.as_bytes()).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].document_name.as_deref(), Some("notes.pdf"));
        assert_eq!(batch[0].total_pages(), Some(10));
    }

    #[test]
    fn test_read_batch_csv_reports_line() {
        let csv = "student_id,printer_id,document_pages\nnot-a-uuid,also-not,3\n";
        let err = read_batch_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
