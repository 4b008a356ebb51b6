//! Download file names derived from the active filters.
//!
//! `Operations_{zone}_{status}.{ext}`, where each part is the single selected
//! value or a fixed "all" token when zero or several are selected.

use opsdash_core::FilterSpec;

pub const FILE_PREFIX: &str = "Operations";
pub const ALL_ZONES: &str = "AllFloors";
pub const ALL_STATUSES: &str = "AllStatus";

/// Make a cell value safe to embed in a file name.
///
/// Path separators become `-`, spaces become `_`. Blank input yields `fallback`.
pub fn sanitize(part: &str, fallback: &str) -> String {
    let part = part.trim();
    if part.is_empty() {
        return fallback.to_string();
    }
    part.chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            ' ' => '_',
            other => other,
        })
        .collect()
}

/// File name without extension.
pub fn file_stem(spec: &FilterSpec) -> String {
    let zone = spec
        .single_zone()
        .map(|z| sanitize(z, ALL_ZONES))
        .unwrap_or_else(|| ALL_ZONES.to_string());
    let status = spec
        .single_status()
        .map(|s| sanitize(s.label(), ALL_STATUSES))
        .unwrap_or_else(|| ALL_STATUSES.to_string());
    format!("{FILE_PREFIX}_{zone}_{status}")
}
