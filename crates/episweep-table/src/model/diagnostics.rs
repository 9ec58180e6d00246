//! Diagnostics collected alongside successful results.
//!
//! Every recoverable problem the pipeline encounters is recorded as a
//! [`Diagnostic`] and returned next to the output instead of being raised.
//! Only a missing episode column aborts processing (see [`crate::Error`]).

use std::fmt;

use super::table::LOGICAL_LINE_OFFSET;

/// A non-fatal problem found while parsing, repairing, or reconciling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Diagnostic {
    /// A quote was still open at end of input; the tokenizer closed it
    /// implicitly.
    ParseAmbiguity {
        /// What was ambiguous, in human terms.
        detail: String,
    },
    /// A row's field count differed from the header length and was padded
    /// or truncated to fit.
    RowShapeMismatch {
        /// Zero-based data-row index.
        row_index: usize,
        /// Header length.
        expected: usize,
        /// Field count before repair.
        actual: usize,
    },
    /// A majority of rows mismatched the header, which triggered the
    /// line-resynchronization repair pass.
    GlobalShapeCorruption {
        /// Rows that mismatched in the first pass.
        mismatched: usize,
        /// Total rows in the first pass.
        total: usize,
    },
    /// An episode cell did not parse as an integer; the row was left
    /// untouched by reconciliation.
    CellParseFailure {
        /// Zero-based data-row index.
        row_index: usize,
        /// The offending cell value, trimmed.
        value: String,
    },
}

impl Diagnostic {
    /// 1-based text line the diagnostic refers to, where applicable.
    pub fn logical_line(&self) -> Option<usize> {
        match self {
            Diagnostic::RowShapeMismatch { row_index, .. }
            | Diagnostic::CellParseFailure { row_index, .. } => {
                Some(row_index + LOGICAL_LINE_OFFSET)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ParseAmbiguity { detail } => {
                write!(f, "ambiguous input: {detail}")
            }
            Diagnostic::RowShapeMismatch {
                row_index,
                expected,
                actual,
            } => write!(
                f,
                "line {}: row has {actual} fields, expected {expected} (auto-repaired)",
                row_index + LOGICAL_LINE_OFFSET
            ),
            Diagnostic::GlobalShapeCorruption { mismatched, total } => write!(
                f,
                "{mismatched} of {total} rows mismatched the header; ran line resynchronization"
            ),
            Diagnostic::CellParseFailure { row_index, value } => write!(
                f,
                "line {}: episode cell {value:?} is not an integer",
                row_index + LOGICAL_LINE_OFFSET
            ),
        }
    }
}
