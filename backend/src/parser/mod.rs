//! Workbook reader: first sheet of an xlsx file to row-major cell values.
//!
//! Only the first sheet in workbook order is read. Its used range is turned
//! into rows as-is; the header row is not treated specially.
//!
//! # Cell rendering
//!
//! | Cell            | Rendered as                         |
//! |-----------------|-------------------------------------|
//! | string          | the string                          |
//! | number          | shortest `f64` display (`1.0` → `1`) |
//! | boolean         | `true` / `false`                    |
//! | date/time       | Excel serial number                 |
//! | error           | Excel error text (`#DIV/0!`)        |
//! | empty           | empty string                        |
//!
//! Trailing empty cells are trimmed from each row; interior empties and
//! blank rows are kept.

use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;

use crate::error::{ParseError, ParseResult};
use crate::models::TabularData;

/// Parse xlsx bytes and return the first sheet's rows.
///
/// # Example
/// ```ignore
/// let bytes = std::fs::read("book.xlsx")?;
/// let data = parse_first_sheet(&bytes)?;
/// println!("{} rows", data.row_count());
/// ```
pub fn parse_first_sheet(bytes: &[u8]) -> ParseResult<TabularData> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| ParseError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::NoSheets)?
        .map_err(|e| ParseError::Workbook(e.to_string()))?;

    Ok(range_to_rows(&range))
}

/// Read an xlsx file from disk and return the first sheet's rows.
pub fn parse_first_sheet_file<P: AsRef<Path>>(path: P) -> ParseResult<TabularData> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_first_sheet(&bytes)
}

/// Names of all sheets in workbook order.
pub fn sheet_names(bytes: &[u8]) -> ParseResult<Vec<String>> {
    let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| ParseError::Workbook(e.to_string()))?;
    Ok(workbook.sheet_names())
}

fn range_to_rows(range: &Range<Data>) -> TabularData {
    let rows = range
        .rows()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(render_cell).collect();
            while cells.last().is_some_and(|c| c.is_empty()) {
                cells.pop();
            }
            cells
        })
        .collect();

    TabularData::new(rows)
}

/// Render one cell as text.
pub fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::workbook_bytes;
    use super::*;
    use calamine::CellErrorType;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    #[test]
    fn test_simple_sheet() {
        let bytes = workbook_bytes(&[&["a", "b"], &["1", "2"]]);
        let data = parse_first_sheet(&bytes).unwrap();

        assert_eq!(data, TabularData::from(vec![vec!["a", "b"], vec!["1", "2"]]));
    }

    #[test]
    fn test_only_first_sheet_is_read() {
        let mut workbook = Workbook::new();
        workbook
            .add_worksheet()
            .set_name("First")
            .unwrap()
            .write_string(0, 0, "first")
            .unwrap();
        workbook
            .add_worksheet()
            .set_name("Second")
            .unwrap()
            .write_string(0, 0, "second")
            .unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let data = parse_first_sheet(&bytes).unwrap();
        assert_eq!(data.rows, vec![vec!["first".to_string()]]);
        assert_eq!(sheet_names(&bytes).unwrap(), vec!["First", "Second"]);
    }

    #[test]
    fn test_numbers_and_booleans() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_number(0, 0, 1.0).unwrap();
        sheet.write_number(0, 1, 2.5).unwrap();
        sheet.write_boolean(0, 2, true).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let data = parse_first_sheet(&bytes).unwrap();
        assert_eq!(data.rows, vec![vec!["1", "2.5", "true"]]);
    }

    #[test]
    fn test_date_renders_as_serial() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date = ExcelDateTime::from_ymd(2025, 1, 1).unwrap();
        let format = Format::new().set_num_format("yyyy-mm-dd");
        sheet.write_datetime_with_format(0, 0, &date, &format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let data = parse_first_sheet(&bytes).unwrap();
        assert_eq!(data.rows, vec![vec!["45658"]]);
    }

    #[test]
    fn test_interior_empty_kept_trailing_trimmed() {
        let bytes = workbook_bytes(&[&["a", "", "c"], &["d"]]);
        let data = parse_first_sheet(&bytes).unwrap();

        assert_eq!(data.rows[0], vec!["a", "", "c"]);
        assert_eq!(data.rows[1], vec!["d"]);
    }

    #[test]
    fn test_blank_row_kept() {
        let bytes = workbook_bytes(&[&["a"], &[], &["b"]]);
        let data = parse_first_sheet(&bytes).unwrap();

        assert_eq!(data.row_count(), 3);
        assert!(data.rows[1].is_empty());
    }

    #[test]
    fn test_header_row_is_data() {
        let bytes = workbook_bytes(&[&["name", "age"], &["Alice", "30"]]);
        let data = parse_first_sheet(&bytes).unwrap();

        assert_eq!(data.rows[0], vec!["name", "age"]);
        assert_eq!(data.row_count(), 2);
    }

    #[test]
    fn test_corrupt_bytes_error() {
        let result = parse_first_sheet(b"definitely not a zip archive");
        assert!(matches!(result, Err(ParseError::Workbook(_))));
        assert!(!result.unwrap_err().to_string().is_empty());
    }

    #[test]
    fn test_file_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, workbook_bytes(&[&["x"]])).unwrap();

        let data = parse_first_sheet_file(&path).unwrap();
        assert_eq!(data.rows, vec![vec!["x".to_string()]]);

        let missing = parse_first_sheet_file(dir.path().join("missing.xlsx"));
        assert!(matches!(missing, Err(ParseError::Io(_))));
    }

    #[test]
    fn test_render_error_cell() {
        assert_eq!(render_cell(&Data::Error(CellErrorType::Div0)), "#DIV/0!");
        assert_eq!(render_cell(&Data::Empty), "");
        assert_eq!(render_cell(&Data::Int(42)), "42");
        assert_eq!(render_cell(&Data::Bool(false)), "false");
    }
}
