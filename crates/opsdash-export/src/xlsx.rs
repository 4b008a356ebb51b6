//! Single-sheet workbook export, built in memory.

use opsdash_core::{FilteredView, columns};
use rust_xlsxwriter::{Format, Workbook};

use crate::ExportError;

pub const SHEET_NAME: &str = "Filtered";

/// Worksheet limits of the XLSX format.
pub const MAX_COLUMNS: usize = 16_384;
pub const MAX_ROWS: usize = 1_048_576;

/// Header row in bold, coordinates as numbers, every other column as text.
pub fn write_xlsx(view: &FilteredView<'_>) -> Result<Vec<u8>, ExportError> {
    let names = view.dataset().columns();
    if names.len() > MAX_COLUMNS {
        return Err(ExportError::TooManyColumns(names.len()));
    }
    if view.len() >= MAX_ROWS {
        return Err(ExportError::TooManyRows(view.len()));
    }
    let column = |i: usize| u16::try_from(i).map_err(|_| ExportError::TooManyColumns(names.len()));
    let bold = Format::new().set_bold();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (i, name) in names.iter().enumerate() {
        sheet.write_string_with_format(0, column(i)?, name.as_str(), &bold)?;
    }

    for (i, record) in view.records().enumerate() {
        let row = u32::try_from(i + 1).map_err(|_| ExportError::TooManyRows(view.len()))?;
        for (j, name) in names.iter().enumerate() {
            let col = column(j)?;
            match name.as_str() {
                columns::LATITUDE => {
                    sheet.write_number(row, col, record.latitude)?;
                }
                columns::LONGITUDE => {
                    sheet.write_number(row, col, record.longitude)?;
                }
                other => {
                    if let Some(value) = record.get(other) {
                        sheet.write_string(row, col, value)?;
                    }
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use opsdash_core::{Dataset, FilterSpec, Status, filter};
    use std::io::Cursor;

    fn dataset() -> Dataset {
        let header = ["Job Order No.", "Job Status", "Floor Description", "Latitude", "Longitude"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = [
            ["JO-1", "Open", "North Wing", "24.7", "46.6"],
            ["JO-2", "Closed", "North Wing", "24.8", "46.7"],
            ["JO-3", "Open", "الطابق الأرضي", "24٫9", "46,8"],
        ]
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect::<Vec<_>>();
        Dataset::from_rows(header, rows).unwrap()
    }

    fn read_back(bytes: Vec<u8>) -> (Vec<String>, calamine::Range<Data>) {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        (names, range)
    }

    #[test]
    fn produces_zip_container() {
        let ds = dataset();
        let bytes = write_xlsx(&filter(&ds, &FilterSpec::default())).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn sheet_holds_header_and_filtered_rows() {
        let ds = dataset();
        let view = filter(&ds, &FilterSpec::default().with_statuses([Status::Open]));
        let (sheets, range) = read_back(write_xlsx(&view).unwrap());

        assert_eq!(sheets, vec![SHEET_NAME.to_string()]);
        assert_eq!(range.height(), 3);

        let header: Vec<String> = range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(
            header,
            vec!["Job Order No.", "Job Status", "Floor Description", "Latitude", "Longitude"]
        );

        assert_eq!(range.get((1, 0)), Some(&Data::String("JO-1".into())));
        assert_eq!(range.get((2, 0)), Some(&Data::String("JO-3".into())));
        assert_eq!(range.get((2, 2)), Some(&Data::String("الطابق الأرضي".into())));
    }

    #[test]
    fn coordinates_are_numeric_cells() {
        let ds = dataset();
        let (_, range) = read_back(write_xlsx(&filter(&ds, &FilterSpec::default())).unwrap());
        assert_eq!(range.get((1, 3)), Some(&Data::Float(24.7)));
        assert_eq!(range.get((1, 4)), Some(&Data::Float(46.6)));
        assert_eq!(range.get((3, 3)), Some(&Data::Float(24.9)));
        assert_eq!(range.get((3, 4)), Some(&Data::Float(46.8)));
    }

    #[test]
    fn too_many_columns_is_an_error() {
        let mut header = vec!["Latitude".to_string(), "Longitude".to_string()];
        header.extend((0..MAX_COLUMNS - 1).map(|i| format!("Extra {i}")));
        let ds = Dataset::from_rows(header, Vec::new()).unwrap();
        let err = write_xlsx(&filter(&ds, &FilterSpec::default())).unwrap_err();
        assert!(matches!(err, ExportError::TooManyColumns(n) if n == MAX_COLUMNS + 1));
    }
}
