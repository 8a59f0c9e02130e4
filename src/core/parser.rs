use crate::domain::model::Dataset;
use crate::utils::error::{DashboardError, Result};
use csv::ReaderBuilder;
use std::collections::HashSet;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses CSV bytes into a [`Dataset`].
///
/// The first record is the header. Empty fields become nulls, short rows are
/// padded with nulls, and rows wider than the header are rejected. Duplicate
/// header names get `.1`, `.2`, ... suffixes; blank ones become `Unnamed: <i>`.
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    // csv 對未關閉的引號很寬鬆，這裡先自行檢查
    check_quotes(bytes)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    let header = match records.next() {
        Some(result) => result?,
        None => return Err(DashboardError::EmptyInputError),
    };
    let columns = header_names(header.iter());

    let mut rows = Vec::new();
    for result in records {
        let record = result?;

        if record.len() > columns.len() {
            return Err(DashboardError::RaggedRowError {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: columns.len(),
                found: record.len(),
            });
        }

        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        row.resize(columns.len(), None);
        rows.push(row);
    }

    tracing::debug!("Parsed CSV with {} rows and {} columns", rows.len(), columns.len());
    Dataset::new(columns, rows)
}

/// Fails if a quoted field is still open at end of input.
///
/// A quote only opens a field when it is the field's first byte; inside a
/// quoted field `""` is an escaped quote.
fn check_quotes(bytes: &[u8]) -> Result<()> {
    let mut line: u64 = 1;
    let mut field_start = true;
    let mut open_since: Option<u64> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if open_since.is_some() {
            match b {
                b'"' if bytes.get(i + 1) == Some(&b'"') => i += 1,
                b'"' => {
                    open_since = None;
                    field_start = false;
                }
                b'\n' => line += 1,
                _ => {}
            }
        } else {
            match b {
                b'"' if field_start => open_since = Some(line),
                b',' | b'\r' => field_start = true,
                b'\n' => {
                    line += 1;
                    field_start = true;
                }
                _ => field_start = false,
            }
        }
        i += 1;
    }

    match open_since {
        Some(line) => Err(DashboardError::UnterminatedQuoteError { line }),
        None => Ok(()),
    }
}

fn header_names<'a>(fields: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for (index, field) in fields.enumerate() {
        let base = if field.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            field.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        columns.push(name);
    }

    columns
}
