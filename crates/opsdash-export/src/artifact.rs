use std::fmt;
use std::str::FromStr;

use opsdash_core::{FilterSpec, FilteredView};
use tracing::info;

use crate::ExportError;
use crate::csv::write_csv;
use crate::naming::file_stem;
use crate::xlsx::write_xlsx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Xlsx];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// A ready-to-save download: bytes plus the name and MIME type to offer it under.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialise the rows of `view`, naming the file after `spec`.
pub fn build(
    view: &FilteredView<'_>,
    spec: &FilterSpec,
    format: ExportFormat,
) -> Result<ExportArtifact, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => write_csv(view)?,
        ExportFormat::Xlsx => write_xlsx(view)?,
    };
    let filename = format!("{}.{}", file_stem(spec), format.extension());

    info!(%filename, rows = view.len(), bytes = bytes.len(), "built export");

    Ok(ExportArtifact {
        format,
        filename,
        mime_type: format.mime_type(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdash_core::{Dataset, Status, filter};

    fn dataset() -> Dataset {
        let header = ["Job Order No.", "Job Status", "Floor Description", "Latitude", "Longitude"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = [
            ["JO-1", "Open", "North Wing", "24.7", "46.6"],
            ["JO-2", "Closed", "South Wing", "24.8", "46.7"],
        ]
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect::<Vec<_>>();
        Dataset::from_rows(header, rows).unwrap()
    }

    #[test]
    fn csv_artifact_named_after_filters() {
        let ds = dataset();
        let spec = FilterSpec::default().with_zones(["North Wing"]);
        let artifact = build(&filter(&ds, &spec), &spec, ExportFormat::Csv).unwrap();
        assert_eq!(artifact.filename, "Operations_North_Wing_AllStatus.csv");
        assert_eq!(artifact.mime_type, "text/csv; charset=utf-8");
    }

    #[test]
    fn xlsx_artifact_for_unfiltered_view() {
        let ds = dataset();
        let spec = FilterSpec::default();
        let artifact = build(&filter(&ds, &spec), &spec, ExportFormat::Xlsx).unwrap();
        assert_eq!(artifact.filename, "Operations_AllFloors_AllStatus.xlsx");
        assert!(artifact.bytes.starts_with(b"PK"));
    }

    #[test]
    fn status_token_in_name() {
        let ds = dataset();
        let spec = FilterSpec::default().with_statuses([Status::Closed]);
        let artifact = build(&filter(&ds, &spec), &spec, ExportFormat::Csv).unwrap();
        assert_eq!(artifact.filename, "Operations_AllFloors_Closed.csv");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(f)) if f == "pdf"
        ));
    }
}
