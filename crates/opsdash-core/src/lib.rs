pub mod config;
pub mod coords;
pub mod filter;
pub mod kpi;
pub mod record;
pub mod schema;
pub mod status;

pub use config::{ConfigError, ConfigSource, DashboardConfig};
pub use coords::normalize_coordinate;
pub use filter::{FilterMode, FilterSpec, FilteredView, filter};
pub use kpi::Kpis;
pub use record::{Dataset, Record};
pub use schema::{HeaderMatch, SchemaError, columns};
pub use status::{Color, Status, classify};
