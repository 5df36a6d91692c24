use api::domain::envelope::ResponseStatus;
use api::domain::history::OperationRecord;
use api::domain::operation::Operation;
use api::utilities::export::{export_history, history_to_csv, ExportOutcome, HISTORY_CSV_HEADER};
use serde_json::json;

fn power_record() -> OperationRecord {
    OperationRecord {
        id: 7,
        operation: Operation::Power,
        inputs: json!({"base": 2.0, "exponent": 8.0})
            .as_object()
            .cloned()
            .unwrap(),
        result: 256.0,
        timestamp: String::from("2026-08-01T09:15:00Z"),
        execution_time: 3,
        status: ResponseStatus::Success,
    }
}

#[test]
fn csv_round_trips_through_a_standard_parser() {
    // The serialized inputs cell contains commas and quotes, the worst case
    // for RFC 4180 escaping.
    let csv = history_to_csv(&[power_record()]).expect("could not build csv");

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().expect("missing headers").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), HISTORY_CSV_HEADER);

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("csv did not re-parse");
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "7");
    assert_eq!(&rows[0][1], "power");
    assert_eq!(&rows[0][2], r#"{"base":2.0,"exponent":8.0}"#);
    assert_eq!(&rows[0][3], "256");
    assert_eq!(&rows[0][5], "3");
    assert_eq!(&rows[0][6], "success");
}

#[test]
fn timestamps_are_normalized_to_rfc3339_utc() {
    let mut record = power_record();
    record.timestamp = String::from("2026-08-01T09:15:00");
    let csv = history_to_csv(&[record]).expect("could not build csv");
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("csv did not re-parse");
    assert_eq!(&rows[0][4], "2026-08-01T09:15:00+00:00");
}

#[test]
fn empty_history_export_writes_no_file() {
    let dir = tempfile::tempdir().expect("could not create temp dir");
    let path = dir.path().join("operation_history.csv");

    let outcome = export_history(&[], &path).expect("export failed");
    assert_eq!(outcome, ExportOutcome::Skipped);
    assert!(!path.exists());
}

#[test]
fn export_writes_one_row_per_record() {
    let dir = tempfile::tempdir().expect("could not create temp dir");
    let path = dir.path().join("operation_history.csv");

    let outcome = export_history(&[power_record()], &path).expect("export failed");
    assert_eq!(
        outcome,
        ExportOutcome::Written {
            path: path.clone(),
            rows: 1
        }
    );
    let contents = std::fs::read_to_string(&path).expect("could not read export");
    assert!(contents.starts_with(r#""ID","Operation","Inputs","Result","Timestamp""#));
    assert_eq!(contents.lines().count(), 2);
}
