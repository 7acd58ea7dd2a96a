//! CSV row model
//!
//! Rows read back from disk are plain text cells keyed by header name, in
//! header order. Records written out may carry any scalar JSON value, which is
//! rendered as cell text.

use super::error::{FileError, FileResult};
use indexmap::IndexMap;
use serde_json::Value;
use std::io::{Read, Write};

/// A decoded CSV record: column name to cell text
pub type Row = IndexMap<String, String>;

/// A record to be encoded as CSV: column name to value
pub type Record = IndexMap<String, Value>;

/// Render a JSON value as CSV cell text
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Column order used when the caller supplies no fieldnames
pub fn default_fieldnames(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default()
}

/// Decode CSV using the first row as header.
///
/// Short rows are padded with empty cells; cells past the header width are dropped.
pub fn decode_rows<R: Read>(reader: R) -> FileResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                (header.to_string(), record.get(i).unwrap_or_default().to_string())
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Fail with [`FileError::UnknownField`] on the first record key that is not
/// one of `fieldnames`
pub fn check_fields(records: &[Record], fieldnames: &[String]) -> FileResult<()> {
    match records
        .iter()
        .flat_map(|record| record.keys())
        .find(|key| !fieldnames.contains(key))
    {
        Some(field) => Err(FileError::UnknownField {
            field: field.clone(),
        }),
        None => Ok(()),
    }
}

/// Encode records under `fieldnames`, writing the header first.
///
/// Records are checked with [`check_fields`] before anything is written; a
/// fieldname the record lacks becomes an empty cell.
pub fn encode_rows<W: Write>(writer: W, records: &[Record], fieldnames: &[String]) -> FileResult<()> {
    check_fields(records, fieldnames)?;

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(fieldnames)?;

    for record in records {
        let cells = fieldnames
            .iter()
            .map(|name| record.get(name).map(cell_text).unwrap_or_default());
        writer.write_record(cells)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
