//! Export layer: the filtered view as downloadable CSV or XLSX bytes.

mod artifact;
pub mod csv;
mod error;
pub mod naming;
pub mod xlsx;

pub use artifact::{ExportArtifact, ExportFormat, build};
pub use error::ExportError;
pub use naming::file_stem;
