//! Table types for parsed exports.
//!
//! A [`RawTable`] is what the tokenizer produces: rows may be ragged,
//! with field counts that do not match the header. A [`Table`] carries the
//! validated invariant that every row has exactly `headers.len()` fields,
//! enforced at construction.

use crate::error::Error;

/// Offset between a zero-based data-row index and the 1-based line number
/// a user sees: one for the header row, one for 1-based display.
pub const LOGICAL_LINE_OFFSET: usize = 2;

/// Tokenizer output before shape validation.
///
/// Headers keep their original order; uniqueness is not required. Rows may
/// have any field count at this stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Header row, in input order.
    pub headers: Vec<String>,
    /// Data rows, possibly ragged.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Count rows whose field count differs from the header length.
    pub fn mismatched_rows(&self) -> usize {
        let expected = self.headers.len();
        self.rows.iter().filter(|r| r.len() != expected).count()
    }
}

/// A shape-validated table: every row has exactly `headers.len()` fields.
///
/// Fields hold *decoded* values; quoting and escaping only exist in the
/// serialized text form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table, checking the row-length invariant.
    ///
    /// Returns [`Error::ShapeInvariant`] for the first row whose field count
    /// differs from the header length.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, Error> {
        let expected = headers.len();
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(Error::ShapeInvariant {
                    row_index,
                    expected,
                    actual: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    /// Construct from rows already known to satisfy the invariant.
    pub(crate) fn from_validated(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Self { headers, rows }
    }

    /// Header row, in input order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows (the header is not included).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no headers and no rows.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Consume the table into its header and row vectors.
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.headers, self.rows)
    }

    /// 1-based text line number for a zero-based data-row index.
    pub fn logical_line(row_index: usize) -> usize {
        row_index + LOGICAL_LINE_OFFSET
    }
}
