//! Streaming CSV reader
//!
//! Turns any async byte source into validated rows without loading the
//! whole file; the task yields to the runtime between reads.

use csv_async::{AsyncReaderBuilder, ByteRecord, ErrorKind, StringRecord};
use tokio::io::AsyncRead;
use tracing::{debug, warn};

use super::{IngestionBatch, RejectedRow, ValidationOutcome};
use crate::error::{Error, Result};
use crate::models::PersonRow;

/// Line number of the first data row; line 1 is the header
pub const FIRST_DATA_LINE: u64 = 2;

/// Everything collected from one pass over a source
#[derive(Debug, Default)]
pub struct Collected {
    pub batch: IngestionBatch,
    pub rejected: Vec<RejectedRow>,
    pub rows_read: usize,
}

/// Map a record onto the known columns using the header row
///
/// Header names are matched after trimming; unknown columns are ignored.
pub fn row_from_record(headers: &StringRecord, record: &StringRecord) -> PersonRow {
    let mut row = PersonRow::default();
    for (name, value) in headers.iter().zip(record.iter()) {
        let slot = match name.trim() {
            "first_name" => &mut row.first_name,
            "last_name" => &mut row.last_name,
            "email" => &mut row.email,
            "age" => &mut row.age,
            _ => continue,
        };
        *slot = Some(value.to_string());
    }
    row
}

/// Validate one decoded record
pub fn classify(headers: &StringRecord, record: &StringRecord, line: u64) -> ValidationOutcome {
    match row_from_record(headers, record).validate() {
        Ok(person) => ValidationOutcome::Accepted(person),
        Err(e) => ValidationOutcome::Rejected(RejectedRow {
            line,
            raw: record.iter().map(str::to_string).collect(),
            field: Some(e.field),
            reason: e.to_string(),
        }),
    }
}

/// Read every row of `reader`, keeping accepted records in order
///
/// Row-level problems never fail the call. An `Err` means the source itself
/// could not be read (unreadable header, or an IO failure mid-stream).
pub async fn collect_batch<R>(reader: R) -> Result<Collected>
where
    R: AsyncRead + Unpin + Send,
{
    let mut rdr = AsyncReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .create_reader(reader);

    let headers = rdr
        .headers()
        .await
        .map_err(|e| Error::resource_open(format!("Failed to read CSV header: {}", e)))?
        .clone();

    debug!(headers = ?headers, "CSV header read");

    let mut collected = Collected::default();
    let mut line = FIRST_DATA_LINE;
    // byte records so a bad encoding drops one row instead of the reader
    let mut record = ByteRecord::new();

    loop {
        let outcome = match rdr.read_byte_record(&mut record).await {
            Ok(false) => break,
            Ok(true) => match StringRecord::from_byte_record(record.clone()) {
                Ok(decoded) => classify(&headers, &decoded, line),
                Err(e) => ValidationOutcome::Rejected(RejectedRow {
                    line,
                    raw: lossy_fields(&record),
                    field: None,
                    reason: format!("Row is not valid UTF-8: {}", e),
                }),
            },
            Err(e) if matches!(e.kind(), ErrorKind::Io(_)) => {
                return Err(Error::resource_open(format!(
                    "Failed to read CSV at line {}: {}",
                    line, e
                )));
            },
            Err(e) => ValidationOutcome::Rejected(RejectedRow {
                line,
                raw: lossy_fields(&record),
                field: None,
                reason: format!("Unreadable row: {}", e),
            }),
        };

        collected.rows_read += 1;
        match outcome {
            ValidationOutcome::Accepted(person) => collected.batch.push(person),
            ValidationOutcome::Rejected(row) => {
                warn!(
                    line = row.line,
                    row = %row.raw.join(","),
                    field = row.field.map(|f| f.as_str()).unwrap_or("-"),
                    reason = %row.reason,
                    "Dropping invalid CSV row"
                );
                collected.rejected.push(row);
            },
        }
        line += 1;
    }

    Ok(collected)
}

fn lossy_fields(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;

    fn record(values: &[&str]) -> StringRecord {
        StringRecord::from(values.to_vec())
    }

    #[test]
    fn test_row_from_record_uses_header_order() {
        let headers = record(&["age", "email", " last_name", "first_name", "notes"]);
        let row = row_from_record(&headers, &record(&["40", "sean@ex.com", "Obrien", "Sean", "x"]));

        assert_eq!(row.first_name.as_deref(), Some("Sean"));
        assert_eq!(row.last_name.as_deref(), Some("Obrien"));
        assert_eq!(row.email.as_deref(), Some("sean@ex.com"));
        assert_eq!(row.age.as_deref(), Some("40"));
    }

    #[test]
    fn test_row_from_short_record() {
        let headers = record(&["first_name", "last_name", "email", "age"]);
        let row = row_from_record(&headers, &record(&["Sean", "Obrien"]));
        assert!(row.email.is_none());
        assert!(row.age.is_none());
    }

    #[test]
    fn test_classify() {
        let headers = record(&["first_name", "last_name", "email", "age"]);

        let outcome = classify(&headers, &record(&["Sean", "Obrien", "sean@ex.com", "40"]), 2);
        assert!(matches!(outcome, ValidationOutcome::Accepted(_)));

        let outcome = classify(&headers, &record(&["Sean", "O'Brien", "sean@ex.com", "40"]), 7);
        match outcome {
            ValidationOutcome::Rejected(row) => {
                assert_eq!(row.line, 7);
                assert_eq!(row.field, Some(Field::LastName));
                assert_eq!(row.raw[1], "O'Brien");
            },
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_collect_batch_partitions_rows() {
        let csv = "first_name,last_name,email,age\n\
                   Ann,Lee,ann@ex.com,30\n\
                   Sean,O'Brien,sean@ex.com,40\n\
                   Bob,Ray,bob@ex.com,151\n\
                   Sean,Obrien,sean@ex.com,40\n";

        let collected = collect_batch(csv.as_bytes()).await.unwrap();

        assert_eq!(collected.rows_read, 4);
        assert_eq!(collected.batch.len(), 2);
        assert_eq!(collected.batch.records()[0].first_name(), "Ann");
        assert_eq!(collected.batch.records()[1].last_name(), "Obrien");

        let lines: Vec<u64> = collected.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_collect_batch_header_only() {
        let collected = collect_batch("first_name,last_name,email,age\n".as_bytes())
            .await
            .unwrap();
        assert_eq!(collected.rows_read, 0);
        assert!(collected.batch.is_empty());
        assert!(collected.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_collect_batch_handles_quoted_fields() {
        let csv = "first_name,last_name,email,age\n\"Ann\",\"Lee\",\"ann@ex.com\",\"30\"\n";
        let collected = collect_batch(csv.as_bytes()).await.unwrap();
        assert_eq!(collected.batch.len(), 1);
        assert_eq!(collected.batch.records()[0].age(), 30);
    }

    #[tokio::test]
    async fn test_collect_batch_rejects_invalid_utf8_row() {
        let mut csv = b"first_name,last_name,email,age\n".to_vec();
        csv.extend_from_slice(b"Ann,L\xffe,ann@ex.com,30\n");
        csv.extend_from_slice(b"Bob,Ray,bob@ex.com,31\n");

        let collected = collect_batch(csv.as_slice()).await.unwrap();
        assert_eq!(collected.rows_read, 2);
        assert_eq!(collected.batch.len(), 1);
        assert_eq!(collected.rejected.len(), 1);
        assert_eq!(collected.rejected[0].line, 2);
        assert!(collected.rejected[0].field.is_none());
        assert_eq!(
            collected.rejected[0].raw,
            vec!["Ann", "L\u{FFFD}e", "ann@ex.com", "30"]
        );
    }
}
