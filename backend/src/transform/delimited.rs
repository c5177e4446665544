//! Rows to delimited text.
//!
//! Fields are joined with `,` and rows with `\n`, no trailing newline.
//! Two policies:
//!
//! - [`Delimiting::Quoted`] - RFC 4180 minimal quoting via the `csv` crate.
//!   A field containing `,`, `"`, `\r` or `\n` is wrapped in quotes with
//!   inner quotes doubled.
//! - [`Delimiting::Raw`] - plain join, no escaping. A value containing the
//!   delimiter or a newline produces ambiguous output; kept for byte-for-byte
//!   parity with the legacy form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TransformError, TransformResult};
use crate::models::TabularData;

pub const FIELD_DELIMITER: u8 = b',';
pub const ROW_DELIMITER: &str = "\n";

/// Quoting policy for the text payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiting {
    #[default]
    Quoted,
    Raw,
}

impl FromStr for Delimiting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quoted" => Ok(Delimiting::Quoted),
            "raw" => Ok(Delimiting::Raw),
            other => Err(format!("expected 'quoted' or 'raw', got '{}'", other)),
        }
    }
}

impl fmt::Display for Delimiting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiting::Quoted => write!(f, "quoted"),
            Delimiting::Raw => write!(f, "raw"),
        }
    }
}

/// Join rows into one text blob under the given policy.
///
/// # Example
/// ```ignore
/// let data = TabularData::from(vec![vec!["a", "b"], vec!["1", "2"]]);
/// assert_eq!(to_delimited_text(&data, Delimiting::Quoted)?, "a,b\n1,2");
/// ```
pub fn to_delimited_text(data: &TabularData, policy: Delimiting) -> TransformResult<String> {
    let lines = data
        .rows
        .iter()
        .map(|row| match policy {
            Delimiting::Raw => Ok(row.join(",")),
            Delimiting::Quoted => quoted_line(row),
        })
        .collect::<TransformResult<Vec<String>>>()?;

    Ok(lines.join(ROW_DELIMITER))
}

/// One row through the csv writer, terminator stripped.
fn quoted_line(row: &[String]) -> TransformResult<String> {
    // An empty record has no fields to write; it is an empty line.
    if row.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(row)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| TransformError::Writer(e.to_string()))?;
    let mut line = String::from_utf8(bytes)?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(rows: Vec<Vec<&str>>) -> TabularData {
        TabularData::from(rows)
    }

    #[test]
    fn test_basic_join_both_policies() {
        let d = data(vec![vec!["a", "b"], vec!["1", "2"]]);
        assert_eq!(to_delimited_text(&d, Delimiting::Quoted).unwrap(), "a,b\n1,2");
        assert_eq!(to_delimited_text(&d, Delimiting::Raw).unwrap(), "a,b\n1,2");
    }

    #[test]
    fn test_comma_in_value_quoted() {
        let d = data(vec![vec!["x,y", "z"]]);
        assert_eq!(to_delimited_text(&d, Delimiting::Quoted).unwrap(), "\"x,y\",z");
    }

    #[test]
    fn test_comma_in_value_raw_is_ambiguous() {
        let d = data(vec![vec!["x,y", "z"]]);
        let text = to_delimited_text(&d, Delimiting::Raw).unwrap();
        assert_eq!(text, "x,y,z");
        // Reads back as three fields instead of two
        assert_eq!(text.split(',').count(), 3);
    }

    #[test]
    fn test_quotes_and_newlines_escaped() {
        let d = data(vec![vec!["say \"hi\"", "line1\nline2"]]);
        assert_eq!(
            to_delimited_text(&d, Delimiting::Quoted).unwrap(),
            "\"say \"\"hi\"\"\",\"line1\nline2\""
        );
    }

    #[test]
    fn test_quoted_output_reads_back() {
        let d = data(vec![vec!["x,y", "plain"], vec!["a\"b", "c\nd"]]);
        let text = to_delimited_text(&d, Delimiting::Quoted).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(text.as_bytes());
        let back: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(back, d.rows);
    }

    #[test]
    fn test_empty_rows_and_cells() {
        let d = data(vec![vec!["a"], vec![], vec!["", "b"]]);
        assert_eq!(to_delimited_text(&d, Delimiting::Quoted).unwrap(), "a\n\n,b");
        assert_eq!(to_delimited_text(&d, Delimiting::Raw).unwrap(), "a\n\n,b");
    }

    #[test]
    fn test_empty_data() {
        assert_eq!(to_delimited_text(&TabularData::default(), Delimiting::Quoted).unwrap(), "");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("raw".parse::<Delimiting>().unwrap(), Delimiting::Raw);
        assert_eq!(" Quoted ".parse::<Delimiting>().unwrap(), Delimiting::Quoted);
        assert!("tsv".parse::<Delimiting>().is_err());
        assert_eq!(Delimiting::default(), Delimiting::Quoted);
    }
}
