//! Job records and the in-memory dataset built from one spreadsheet fetch.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::coords::normalize_pair;
use crate::schema::{SchemaError, check_required, columns, unique_headers};
use crate::status::{Status, classify_status};

/// One job/work-order observation with valid coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical status derived from the `Job Status` cell.
    pub status: Status,
    /// Column name → cell text for every non-coordinate column.
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new(latitude: f64, longitude: f64, fields: HashMap<String, String>) -> Self {
        let status = fields
            .get(columns::JOB_STATUS)
            .map(|s| classify_status(s))
            .unwrap_or(Status::Unknown);
        Self {
            latitude,
            longitude,
            status,
            fields,
        }
    }

    /// Raw cell text for a column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|s| s.as_str())
    }

    /// Trimmed, non-empty cell text.
    fn non_blank(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Job order number.
    pub fn identifier(&self) -> Option<&str> {
        self.non_blank(columns::JOB_ORDER)
    }

    /// Floor / zone the job is located in.
    pub fn zone(&self) -> Option<&str> {
        self.non_blank(columns::FLOOR)
    }

    /// External CAFM link, only when it is an http(s) URL.
    pub fn link(&self) -> Option<&str> {
        self.non_blank(columns::LINK)
            .filter(|l| l.starts_with("http://") || l.starts_with("https://"))
    }
}

/// Ordered records sharing one header row.
///
/// Immutable once built; a refresh produces a whole new dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
    dropped_rows: usize,
}

impl Dataset {
    /// Build a dataset from a header row and raw text rows.
    ///
    /// Rows whose latitude or longitude don't normalise are dropped and
    /// counted; short rows are padded with empty cells. Repeated or blank
    /// header names are made unique first (see [`unique_headers`]).
    pub fn from_rows<I>(headers: Vec<String>, rows: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let headers = unique_headers(headers);
        check_required(&headers)?;
        let lat_idx = column_index(&headers, columns::LATITUDE)?;
        let lon_idx = column_index(&headers, columns::LONGITUDE)?;

        let mut records = Vec::new();
        let mut dropped_rows = 0usize;

        for (row_no, row) in rows.into_iter().enumerate() {
            let cell = |i: usize| row.get(i).map(|s| s.as_str()).unwrap_or("");
            let Some((lat, lon)) = normalize_pair(cell(lat_idx), cell(lon_idx)) else {
                debug!(
                    row = row_no + 1,
                    latitude = cell(lat_idx),
                    longitude = cell(lon_idx),
                    "dropping row with invalid coordinates"
                );
                dropped_rows += 1;
                continue;
            };

            let fields = headers
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != lat_idx && *i != lon_idx)
                .map(|(i, name)| (name.clone(), cell(i).to_string()))
                .collect();
            records.push(Record::new(lat, lon, fields));
        }

        Ok(Self {
            columns: headers,
            records,
            dropped_rows,
        })
    }

    /// Header names in source order, coordinates included.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of source rows excluded for invalid coordinates.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Distinct non-blank zones, sorted. Empty if the dataset has no zone column.
    pub fn zones(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.records.iter().filter_map(|r| r.zone()).collect();
        set.into_iter().collect()
    }

    /// Canonical statuses present in the data, in display order.
    pub fn statuses(&self) -> Vec<Status> {
        let set: BTreeSet<Status> = self.records.iter().map(|r| r.status).collect();
        set.into_iter().collect()
    }
}

fn column_index(headers: &[String], name: &str) -> Result<usize, SchemaError> {
    headers
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| SchemaError::MissingRequiredColumns(vec![name.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<String> {
        ["Job Order No.", "Job Status", "Floor Description", "Latitude", "Longitude", "CAFM LINK"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_rows_with_invalid_coordinates() {
        let rows = vec![
            row(&["J1", "Open", "L1", "24.71", "46.67", ""]),
            row(&["J2", "Closed", "L1", "", "46.67", ""]),
            row(&["J3", "Closed", "L2", "24,70", "x", ""]),
            row(&["J4", "In Progress", "L2", "24٫72", "46٫68", ""]),
        ];
        let ds = Dataset::from_rows(header(), rows).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows(), 2);
        assert_eq!(ds.records()[1].latitude, 24.72);
        assert_eq!(ds.records()[1].status, Status::Attended);
    }

    #[test]
    fn never_grows() {
        let rows: Vec<_> = (0..10)
            .map(|i| row(&[&format!("J{i}"), "Open", "L", &format!("{}.5", i * 20), "10", ""]))
            .collect();
        let ds = Dataset::from_rows(header(), rows.clone()).unwrap();
        assert!(ds.len() <= rows.len());
        assert_eq!(ds.len() + ds.dropped_rows(), rows.len());
    }

    #[test]
    fn missing_coordinates_column_is_schema_error() {
        let cols = vec!["Job Order No.".to_string(), "Latitude".to_string()];
        let err = Dataset::from_rows(cols, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingRequiredColumns(vec!["Longitude".into()])
        );
    }

    #[test]
    fn short_rows_are_padded() {
        let cols = vec!["Latitude".to_string(), "Longitude".to_string(), "Trade".to_string()];
        let ds = Dataset::from_rows(cols, vec![row(&["1", "2"])]).unwrap();
        assert_eq!(ds.records()[0].get("Trade"), Some(""));
        assert_eq!(ds.records()[0].status, Status::Unknown);
    }

    #[test]
    fn optional_accessors() {
        let ds = Dataset::from_rows(
            header(),
            vec![
                row(&[" J-7 ", "open", "Ground", "1", "2", "https://cafm.example/7"]),
                row(&["", "", "  ", "1", "2", "not a url"]),
            ],
        )
        .unwrap();
        let (a, b) = (&ds.records()[0], &ds.records()[1]);
        assert_eq!(a.identifier(), Some("J-7"));
        assert_eq!(a.zone(), Some("Ground"));
        assert_eq!(a.link(), Some("https://cafm.example/7"));
        assert_eq!(b.identifier(), None);
        assert_eq!(b.zone(), None);
        assert_eq!(b.link(), None);
        assert_eq!(b.get("CAFM LINK"), Some("not a url"));
    }

    #[test]
    fn repeated_headers_keep_every_cell() {
        let cols = ["Latitude", "Longitude", "Note", "Note"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ds = Dataset::from_rows(cols, vec![row(&["1", "2", "first", "second"])]).unwrap();
        assert_eq!(ds.columns(), ["Latitude", "Longitude", "Note", "Note_2"]);
        assert_eq!(ds.records()[0].get("Note"), Some("first"));
        assert_eq!(ds.records()[0].get("Note_2"), Some("second"));
    }

    #[test]
    fn facet_options() {
        let ds = Dataset::from_rows(
            header(),
            vec![
                row(&["J1", "Closed", "B", "1", "2", ""]),
                row(&["J2", "Open", "A", "1", "2", ""]),
                row(&["J3", "Open", "B", "1", "2", ""]),
            ],
        )
        .unwrap();
        assert_eq!(ds.zones(), vec!["A", "B"]);
        assert_eq!(ds.statuses(), vec![Status::Open, Status::Closed]);
    }
}
