//! Column names recognised in job-record exports, and the Arrow schema used
//! when a set of records is materialised as a `RecordBatch`.

use std::collections::HashSet;

use arrow::datatypes::{DataType, Field, Schema};
use thiserror::Error;

/// Column names as they appear in the operations spreadsheet export.
pub mod columns {
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const JOB_ORDER: &str = "Job Order No.";
    pub const JOB_STATUS: &str = "Job Status";
    pub const FLOOR: &str = "Floor Description";
    pub const LINK: &str = "CAFM LINK";
    pub const IMPACT: &str = "Impact";
    pub const TRADE: &str = "Trade";
    pub const REQUEST_DATE: &str = "Request Date";
    pub const LOCATION: &str = "Location Description";
    pub const PROBLEM: &str = "Problem Description";

    /// Columns without which nothing can be plotted.
    pub const REQUIRED: &[&str] = &[LATITUDE, LONGITUDE];

    /// Every column name the pipeline knows by name.
    pub const RECOGNISED: &[&str] = &[
        LATITUDE,
        LONGITUDE,
        JOB_ORDER,
        JOB_STATUS,
        FLOOR,
        LINK,
        IMPACT,
        TRADE,
        REQUEST_DATE,
        LOCATION,
        PROBLEM,
    ];

    /// Whether `name` holds a coordinate rather than descriptive text.
    pub fn is_coordinate(name: &str) -> bool {
        name == LATITUDE || name == LONGITUDE
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingRequiredColumns(Vec<String>),

    #[error("document has no header row")]
    EmptyDocument,
}

/// How header cells are matched against [`columns::RECOGNISED`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderMatch {
    /// Header text must equal the recognised name byte for byte.
    #[default]
    Exact,
    /// Headers are trimmed and compared ignoring ASCII case; matches are
    /// rewritten to the canonical spelling.
    CaseInsensitive,
}

impl HeaderMatch {
    /// Map a raw header cell to the name the dataset will use for it.
    pub fn canonicalize(self, raw: &str) -> String {
        match self {
            Self::Exact => raw.to_string(),
            Self::CaseInsensitive => {
                let trimmed = raw.trim();
                columns::RECOGNISED
                    .iter()
                    .find(|known| known.eq_ignore_ascii_case(trimmed))
                    .map(|known| known.to_string())
                    .unwrap_or_else(|| raw.to_string())
            }
        }
    }
}

/// Fail unless every required column is present in `headers`.
pub fn check_required<S: AsRef<str>>(headers: &[S]) -> Result<(), SchemaError> {
    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|req| !headers.iter().any(|h| h.as_ref() == **req))
        .map(|req| req.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingRequiredColumns(missing))
    }
}

/// Make header names unique so every column can be addressed by name.
///
/// The first occurrence keeps its name; later repeats get `_2`, `_3`, ...
/// Blank headers become `Column_{n}` (1-based position).
pub fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    headers
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let base = if name.trim().is_empty() {
                format!("Column_{}", i + 1)
            } else {
                name
            };
            let mut candidate = base.clone();
            let mut n = 2;
            while seen.contains(&candidate) {
                candidate = format!("{base}_{n}");
                n += 1;
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Arrow schema for a dataset with the given column order.
///
/// Coordinates are non-nullable `Float64`; every other column is nullable
/// `Utf8` since optional cells may be absent on short rows.
pub fn dataset_schema<S: AsRef<str>>(column_names: &[S]) -> Schema {
    Schema::new(
        column_names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                if columns::is_coordinate(name) {
                    Field::new(name, DataType::Float64, false)
                } else {
                    Field::new(name, DataType::Utf8, true)
                }
            })
            .collect::<Vec<_>>(),
    )
}
