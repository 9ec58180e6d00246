//! Row-shape validation and auto-repair.
//!
//! Rows shorter than the header are right-padded with empty fields; longer
//! rows lose their trailing fields. Lossy but deterministic, and every
//! repair is reported so callers can surface a warning. This pass fixes
//! field counts within a row only; logical-record boundaries are the
//! repairer's job (see [`crate::repair`]).

use crate::model::{Diagnostic, RawTable, Table};

/// Conform every row to the header length, recording each repair.
pub fn validate(raw: RawTable) -> (Table, Vec<Diagnostic>) {
    let expected = raw.headers.len();
    let mut diagnostics = Vec::new();
    let mut rows = raw.rows;

    for (row_index, row) in rows.iter_mut().enumerate() {
        if row.len() == expected {
            continue;
        }
        tracing::debug!(
            row_index,
            expected,
            actual = row.len(),
            "repairing row shape"
        );
        diagnostics.push(Diagnostic::RowShapeMismatch {
            row_index,
            expected,
            actual: row.len(),
        });
        row.resize(expected, String::new());
    }

    (Table::from_validated(raw.headers, rows), diagnostics)
}
