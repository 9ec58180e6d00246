//! Episode-set reconciliation.
//!
//! Filters a table against a caller-supplied set of episode numbers, either
//! deleting the matching rows or keeping only them. Matching is exact string
//! equality between the trimmed cell and the stringified target integer, so
//! `"02"` never matches a target of `2`. Cells that do not parse as integers
//! survive both modes and are reported as [`Diagnostic::CellParseFailure`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::model::{Diagnostic, Table};

/// Cap on reported cell-parse failures, to bound the diagnostics payload.
pub const MAX_CELL_FAILURES: usize = 10;

/// What to do with rows whose episode number is in the target set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReconcileMode {
    /// Remove matching rows, keep the rest.
    Delete,
    /// Keep matching rows, remove the rest (unparseable cells still survive).
    Keep,
}

impl fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileMode::Delete => f.write_str("delete"),
            ReconcileMode::Keep => f.write_str("keep"),
        }
    }
}

impl FromStr for ReconcileMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delete" => Ok(ReconcileMode::Delete),
            "keep" => Ok(ReconcileMode::Keep),
            other => Err(format!("unknown mode {other:?}, expected delete or keep")),
        }
    }
}

/// A reconciliation request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconcileRequest {
    /// Target episode numbers.
    pub episode_numbers: Vec<i64>,
    /// Delete or keep the matching rows.
    pub mode: ReconcileMode,
}

impl ReconcileRequest {
    /// Request deleting the given episode numbers.
    pub fn delete(episode_numbers: Vec<i64>) -> Self {
        Self {
            episode_numbers,
            mode: ReconcileMode::Delete,
        }
    }

    /// Request keeping only the given episode numbers.
    pub fn keep(episode_numbers: Vec<i64>) -> Self {
        Self {
            episode_numbers,
            mode: ReconcileMode::Keep,
        }
    }
}

/// The outcome of reconciling one table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    /// Surviving rows, in their original order.
    pub table: Table,
    /// Number of rows removed.
    pub removed_count: usize,
    /// Episode numbers of the removed rows, ascending.
    pub removed_episode_numbers: Vec<i64>,
    /// Per-row cell failures, capped at [`MAX_CELL_FAILURES`].
    pub diagnostics: Vec<Diagnostic>,
}

/// Filter `table` by the episode cell at `episode_column`.
///
/// Row order is preserved. The filter is pure and never fails; resolving
/// `episode_column` (and failing when no column exists) is the caller's job,
/// see [`crate::resolve`] and [`crate::Error::EpisodeColumnNotFound`].
pub fn reconcile(
    table: &Table,
    episode_column: usize,
    request: &ReconcileRequest,
) -> ReconcileOutcome {
    let targets: HashSet<String> = request
        .episode_numbers
        .iter()
        .map(|n| n.to_string())
        .collect();

    let mut kept: Vec<Vec<String>> = Vec::new();
    let mut removed_episode_numbers: Vec<i64> = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut failures = 0usize;

    for (row_index, row) in table.rows().iter().enumerate() {
        let cell = row
            .get(episode_column)
            .map(|s| s.trim())
            .unwrap_or_default();

        let parsed: Option<i64> = cell.parse().ok();
        if parsed.is_none() {
            failures += 1;
            if failures <= MAX_CELL_FAILURES {
                diagnostics.push(Diagnostic::CellParseFailure {
                    row_index,
                    value: cell.to_string(),
                });
            }
            // Unparseable cells always survive filtering.
            kept.push(row.clone());
            continue;
        }

        let matched = targets.contains(cell);
        let remove = match request.mode {
            ReconcileMode::Delete => matched,
            ReconcileMode::Keep => !matched,
        };

        if remove {
            // `parsed` is always Some here.
            removed_episode_numbers.extend(parsed);
        } else {
            kept.push(row.clone());
        }
    }

    removed_episode_numbers.sort_unstable();
    let removed_count = removed_episode_numbers.len();

    tracing::debug!(
        mode = %request.mode,
        removed = removed_count,
        remaining = kept.len(),
        cell_failures = failures,
        "reconciled table"
    );

    ReconcileOutcome {
        table: Table::from_validated(table.headers().to_vec(), kept),
        removed_count,
        removed_episode_numbers,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cells: &[&str]) -> Table {
        let rows = cells
            .iter()
            .map(|c| vec![c.to_string(), format!("Episode {c}")])
            .collect();
        Table::new(vec!["episode".into(), "name".into()], rows).unwrap()
    }

    #[test]
    fn delete_mode_exactness() {
        let outcome = reconcile(
            &table(&["1", "2", "3", "4"]),
            0,
            &ReconcileRequest::delete(vec![2, 4]),
        );
        assert_eq!(outcome.table.row_count(), 2);
        assert_eq!(outcome.removed_count, 2);
        assert_eq!(outcome.removed_episode_numbers, vec![2, 4]);
        assert_eq!(outcome.table.rows()[0][0], "1");
        assert_eq!(outcome.table.rows()[1][0], "3");
    }

    #[test]
    fn keep_mode_complement() {
        let outcome = reconcile(
            &table(&["1", "2", "3", "4"]),
            0,
            &ReconcileRequest::keep(vec![2, 4]),
        );
        assert_eq!(outcome.table.row_count(), 2);
        assert_eq!(outcome.removed_episode_numbers, vec![1, 3]);
    }

    #[test]
    fn non_numeric_cell_survives_both_modes() {
        for request in [
            ReconcileRequest::delete(vec![1, 2]),
            ReconcileRequest::keep(vec![1, 2]),
        ] {
            let outcome = reconcile(&table(&["1", "N/A", "2"]), 0, &request);
            assert!(outcome.table.rows().iter().any(|r| r[0] == "N/A"));
            assert_eq!(outcome.diagnostics.len(), 1);
            assert!(matches!(
                &outcome.diagnostics[0],
                Diagnostic::CellParseFailure { row_index: 1, value } if value == "N/A"
            ));
        }
    }

    #[test]
    fn string_equality_not_numeric() {
        // "02" parses to 2 but does not string-match the target "2".
        let outcome = reconcile(&table(&["02", "2"]), 0, &ReconcileRequest::delete(vec![2]));
        assert_eq!(outcome.removed_episode_numbers, vec![2]);
        assert_eq!(outcome.table.rows()[0][0], "02");
        // Formatting mismatch is not a parse failure.
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn cell_is_trimmed_before_comparison() {
        let outcome = reconcile(&table(&[" 2 "]), 0, &ReconcileRequest::delete(vec![2]));
        assert_eq!(outcome.removed_count, 1);
    }

    #[test]
    fn removed_numbers_sorted_ascending() {
        let outcome = reconcile(
            &table(&["9", "3", "7"]),
            0,
            &ReconcileRequest::delete(vec![3, 7, 9]),
        );
        assert_eq!(outcome.removed_episode_numbers, vec![3, 7, 9]);
    }

    #[test]
    fn cell_failures_are_capped() {
        let cells: Vec<String> = (0..15).map(|i| format!("bad{i}")).collect();
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        let outcome = reconcile(&table(&refs), 0, &ReconcileRequest::delete(vec![1]));
        assert_eq!(outcome.diagnostics.len(), MAX_CELL_FAILURES);
        assert_eq!(outcome.table.row_count(), 15);
    }

    #[test]
    fn empty_target_set_removes_nothing_in_delete() {
        let outcome = reconcile(&table(&["1", "2"]), 0, &ReconcileRequest::delete(vec![]));
        assert_eq!(outcome.removed_count, 0);
        assert_eq!(outcome.table.row_count(), 2);
    }

    #[test]
    fn mode_round_trips_from_str() {
        assert_eq!("delete".parse::<ReconcileMode>().unwrap(), ReconcileMode::Delete);
        assert_eq!(" KEEP ".parse::<ReconcileMode>().unwrap(), ReconcileMode::Keep);
        assert!("purge".parse::<ReconcileMode>().is_err());
    }
}
