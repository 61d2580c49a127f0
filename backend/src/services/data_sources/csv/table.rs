//! Parsing of uploaded CSV data sources.

use crate::error::{AppError, Result};
use common::model::csv::ColumnCheck;
use common::model::data::{DataValue, ModelData};
use regex::Regex;
use std::path::Path;

/// Delimiters accepted in uploaded files, in order of preference on ties.
const DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// A parsed CSV file: normalized header titles and every data row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CsvTable {
    pub titles: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let header_line = bytes
            .split(|&b| b == b'\n')
            .next()
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .unwrap_or_default();
        let delimiter = detect_delimiter(header_line);

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(::csv::Trim::All)
            .from_reader(bytes);

        let titles: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::BadRequest(format!("CSV header: {}", e)))?
            .iter()
            .map(normalize_cell)
            .collect();
        validate_titles(&titles)?;

        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(normalize_cell).collect::<Vec<String>>())
                    .map_err(|e| AppError::BadRequest(format!("CSV row: {}", e)))
            })
            .collect::<Result<Vec<Vec<String>>>>()?;

        Ok(CsvTable { titles, rows })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&std::fs::read(path)?)
    }

    /// Header titles paired with the first row's values.
    pub fn column_checks(&self) -> Vec<ColumnCheck> {
        let first = self.rows.first();
        self.titles
            .iter()
            .enumerate()
            .map(|(i, title)| ColumnCheck {
                title: title.clone(),
                first_row: first.and_then(|row| row.get(i)).cloned(),
            })
            .collect()
    }

    /// Model data for row `index`: one text value per column, missing cells
    /// left out.
    pub fn row_data(&self, index: usize) -> ModelData {
        let Some(row) = self.rows.get(index) else {
            return ModelData::new();
        };
        self.titles
            .iter()
            .zip(row)
            .map(|(title, value)| (title.clone(), DataValue::Text(value.clone())))
            .collect()
    }
}

/// Picks the delimiter that occurs most often in the header line.
fn detect_delimiter(header: &[u8]) -> u8 {
    DELIMITERS
        .iter()
        .copied()
        .max_by_key(|d| {
            let count = header.iter().filter(|&&b| b == *d).count();
            // Earlier entries win ties.
            (count, std::cmp::Reverse(DELIMITERS.iter().position(|x| x == d)))
        })
        .unwrap_or(b',')
}

fn normalize_cell(cell: &str) -> String {
    let trimmed = cell.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Header titles become field names, so they must be non-empty, unique and
/// made of letters, digits, spaces, `-`, `_` or `.`.
fn validate_titles(titles: &[String]) -> Result<()> {
    let header_re = Regex::new(r"^[\p{L}\p{M}\p{N}\s\-_.]+$")
        .map_err(|e| AppError::Internal(format!("Regex error: {}", e)))?;
    if titles.is_empty() {
        return Err(AppError::BadRequest("CSV file has no header".into()));
    }
    for (i, title) in titles.iter().enumerate() {
        if title.is_empty() {
            return Err(AppError::BadRequest("CSV header cells must not be empty".into()));
        }
        if !header_re.is_match(title) {
            return Err(AppError::BadRequest(format!(
                "CSV header '{}' may only contain letters, digits, spaces, '-', '_' and '.'",
                title
            )));
        }
        if titles[..i].contains(title) {
            return Err(AppError::BadRequest(format!("duplicate CSV header '{}'", title)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_semicolon_file() {
        let table = CsvTable::parse(b"name;address.city\r\nJane;Lima\r\nJohn;\r\n").unwrap();
        assert_eq!(table.titles, vec!["name", "address.city"]);
        assert_eq!(table.rows.len(), 2);

        let checks = table.column_checks();
        assert_eq!(checks[1].first_row.as_deref(), Some("Lima"));

        let row = table.row_data(1);
        assert_eq!(row["name"], DataValue::from("John"));
        assert_eq!(row["address.city"].as_fill_text(), None);
        assert!(table.row_data(5).is_empty());
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let table = CsvTable::parse(b"\"name\",\"note\"\n\"Doe, Jane\",hi\n").unwrap();
        assert_eq!(table.row_data(0)["name"], DataValue::from("Doe, Jane"));
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(CsvTable::parse(b"name,,city\n").is_err());
        assert!(CsvTable::parse(b"name,$total\n").is_err());
        assert!(CsvTable::parse(b"name,name\n").is_err());
        assert!(CsvTable::parse(b"").is_err());
    }

    #[test]
    fn header_only_has_no_rows() {
        let table = CsvTable::parse(b"a\tb\n").unwrap();
        assert_eq!(table.titles, vec!["a", "b"]);
        assert_eq!(table.column_checks()[0].first_row, None);
    }
}
