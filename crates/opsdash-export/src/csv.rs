//! Comma-separated export, written through the Arrow CSV writer.

use arrow::csv::WriterBuilder;
use opsdash_core::FilteredView;

use crate::ExportError;

/// Prepended so spreadsheet tools detect UTF-8 and keep Arabic text intact.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row plus one line per record, in dataset column order.
pub fn write_csv(view: &FilteredView<'_>) -> Result<Vec<u8>, ExportError> {
    let batch = view.to_record_batch()?;
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut writer = WriterBuilder::new().with_header(true).build(&mut buf);
        writer.write(&batch)?;
    }
    Ok(buf)
}
