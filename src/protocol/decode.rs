//! JSON row decoding.
//!
//! With `OutputFormat: json` the server answers with an array of rows, each row an
//! array of cells. When the query named no columns the first row holds the column
//! names; otherwise every row is data and the query's columns name the cells.
use crate::{Error, Record, Result, Value};

/// Decodes a response body into records. `columns` is empty when the server is
/// expected to send a header row.
pub fn decode_rows(body: &[u8], columns: &[String]) -> Result<Vec<Record>> {
    let rows: Vec<Vec<serde_json::Value>> =
        serde_json::from_slice(body).map_err(|e| Error::Decode {
            reason: e.to_string(),
            raw: body.to_vec(),
        })?;

    let mut rows = rows.into_iter();
    let header;
    let columns = if columns.is_empty() {
        // Only a header row, or nothing at all, means no data.
        let Some(first) = rows.next() else {
            return Ok(Vec::new());
        };
        if rows.as_slice().is_empty() {
            return Ok(Vec::new());
        }
        header = column_names(first, body)?;
        &header[..]
    } else {
        columns
    };

    rows.map(|row| decode_row(columns, row, body)).collect()
}

fn column_names(row: Vec<serde_json::Value>, body: &[u8]) -> Result<Vec<String>> {
    row.into_iter()
        .map(|cell| match cell {
            serde_json::Value::String(name) => Ok(name),
            other => Err(Error::Decode {
                reason: format!("header row holds non-string column name {other}"),
                raw: body.to_vec(),
            }),
        })
        .collect()
}

fn decode_row(columns: &[String], row: Vec<serde_json::Value>, body: &[u8]) -> Result<Record> {
    if row.len() != columns.len() {
        return Err(Error::Decode {
            reason: format!(
                "row has {} values but {} columns were expected",
                row.len(),
                columns.len()
            ),
            raw: body.to_vec(),
        });
    }

    Ok(columns
        .iter()
        .cloned()
        .zip(row.into_iter().map(Value::from))
        .collect())
}
