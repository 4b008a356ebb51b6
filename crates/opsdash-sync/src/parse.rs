//! CSV text → [`Dataset`].

use opsdash_core::{Dataset, HeaderMatch, SchemaError};
use tracing::info;

use crate::LoadError;

/// Parse a CSV document whose first row is the header.
///
/// A leading UTF-8 byte-order mark is ignored, ragged rows are accepted,
/// and rows with unusable coordinates are dropped (see [`Dataset::from_rows`]).
pub fn parse_csv(text: &str, header_match: HeaderMatch) -> Result<Dataset, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| header_match.canonicalize(h))
        .collect();
    if headers.is_empty() {
        return Err(SchemaError::EmptyDocument.into());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let dataset = Dataset::from_rows(headers, rows)?;
    info!(
        rows = dataset.len(),
        dropped = dataset.dropped_rows(),
        columns = dataset.columns().len(),
        "parsed dataset"
    );
    Ok(dataset)
}
