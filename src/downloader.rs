use crate::cell::CellSnapshot;
use std::borrow::Cow;

/// Byte-order mark written ahead of CSV output so spreadsheet tools detect UTF-8.
pub const UTF8_BOM: char = '\u{feff}';

/// Convert a grid snapshot to CSV format
///
/// Every row of the grid becomes one newline-terminated line with exactly
/// `cols` fields, empty cells included. There is no header row.
///
/// # Arguments
/// * `cells` - Snapshot of the grid to export
///
/// # Returns
/// * `String` - CSV content prefixed with a UTF-8 byte-order mark
///
/// # Examples
/// ```
/// use robodesk_grid::cell::CellStore;
/// use robodesk_grid::downloader::to_csv;
///
/// let mut store = CellStore::new(2, 2);
/// store.set(0, 1, "B,C").unwrap();
/// assert_eq!(to_csv(&store.snapshot()), "\u{feff},\"B,C\"\n,\n");
/// ```
pub fn to_csv(cells: &CellSnapshot) -> String {
    let mut csv_content = String::new();
    csv_content.push(UTF8_BOM);

    for r in 0..cells.rows() {
        for c in 0..cells.cols() {
            if c > 0 {
                csv_content.push(',');
            }
            csv_content.push_str(&csv_field(cells.text(r, c)));
        }
        csv_content.push('\n');
    }

    csv_content
}

/// Quote a field if it holds a comma, quote or line break; internal quotes are doubled.
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        let escaped = value.replace('"', "\"\"");
        Cow::Owned(format!("\"{}\"", escaped))
    } else {
        Cow::Borrowed(value)
    }
}

/// Convert a grid snapshot to XLSX format
///
/// Writes every non-empty cell as a string and carries the pixel column
/// widths over as Excel character widths.
///
/// # Arguments
/// * `cells` - Snapshot of the grid to export
/// * `widths` - Column widths in pixels, one per column
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes or an error
#[cfg(feature = "xlsx")]
pub fn to_xlsx(cells: &CellSnapshot, widths: &[u32]) -> crate::Result<Vec<u8>> {
    use crate::widths::AVG_GLYPH_WIDTH;
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (c, width) in widths.iter().enumerate().take(cells.cols()) {
        let col = xlsx_col(c)?;
        worksheet.set_column_width(col, f64::from(*width) / f64::from(AVG_GLYPH_WIDTH))?;
    }

    for (r, c, value) in cells.iter_row_major() {
        if !value.is_empty() {
            worksheet.write_string(xlsx_row(r)?, xlsx_col(c)?, value)?;
        }
    }

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

#[cfg(feature = "xlsx")]
fn xlsx_col(col: usize) -> crate::Result<u16> {
    u16::try_from(col)
        .map_err(|_| crate::GridError::Xlsx(format!("column {col} out of range")))
}

#[cfg(feature = "xlsx")]
fn xlsx_row(row: usize) -> crate::Result<u32> {
    u32::try_from(row)
        .map_err(|_| crate::GridError::Xlsx(format!("row {row} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_borrowed() {
        assert!(matches!(csv_field("plain"), Cow::Borrowed("plain")));
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn xlsx_indices_are_checked_not_truncated() {
        assert_eq!(xlsx_col(3).unwrap(), 3);
        assert!(matches!(xlsx_col(65_536), Err(crate::GridError::Xlsx(_))));
        assert!(matches!(xlsx_col(65_539), Err(crate::GridError::Xlsx(_))));
    }

    #[test]
    fn line_breaks_force_quoting() {
        assert_eq!(csv_field("a\nb"), "\"a\nb\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
