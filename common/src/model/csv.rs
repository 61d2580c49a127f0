use serde::{Deserialize, Serialize};

/// A column of an uploaded CSV data source.
///
/// Returned by the upload endpoint so the mapping UI can offer the column
/// titles as placeable field names, with the first row as a sample value.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ColumnCheck {
    /// The normalized column header title (surrounding quotes and spaces removed).
    pub title: String,
    /// The value of this column in the first data row, if there is one.
    pub first_row: Option<String>,
}
