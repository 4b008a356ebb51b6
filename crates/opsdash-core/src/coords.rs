//! Coordinate normalisation for spreadsheet-sourced latitude/longitude cells.
//!
//! Sheets maintained in Arabic locales export decimals with either the Arabic
//! decimal separator (`٫`, U+066B) or a comma, so "24٫7136", "24,7136" and
//! "24.7136" must all read as the same number.

/// Arabic decimal separator.
pub const ARABIC_DECIMAL_SEPARATOR: char = '\u{066B}';

/// Parse a raw coordinate cell into a float.
///
/// # Algorithm
///
/// 1. Trim surrounding whitespace
/// 2. Replace `٫` and `,` with `.`
/// 3. Parse as `f64`; reject anything that fails or is not finite
///
/// Returns `None` for invalid input; never panics.
pub fn normalize_coordinate(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let s: String = s
        .chars()
        .map(|c| match c {
            ARABIC_DECIMAL_SEPARATOR | ',' => '.',
            other => other,
        })
        .collect();

    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether a latitude/longitude pair lies on the globe.
pub fn valid_lat_lon(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Normalise both cells of a row; `None` if either is unusable.
pub fn normalize_pair(lat: &str, lon: &str) -> Option<(f64, f64)> {
    let lat = normalize_coordinate(lat)?;
    let lon = normalize_coordinate(lon)?;
    valid_lat_lon(lat, lon).then_some((lat, lon))
}
