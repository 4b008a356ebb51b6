//! Data source layer: HTTP fetch of the CSV export, parsing, and a short-lived cache.

pub mod cache;
pub mod http;
pub mod loader;
pub mod parse;

pub use cache::{CacheEntry, DatasetCache};
pub use http::{CsvSource, FetchError, HttpSource};
pub use loader::{DatasetLoader, Freshness, LoadError, Snapshot};
pub use parse::parse_csv;
