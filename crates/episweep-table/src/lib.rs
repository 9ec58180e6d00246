//! # episweep-table
//!
//! Parser, repairer, and reconciler for delimited episode-metadata exports.
//!
//! This crate turns the CSV-ish text produced by scraping tools into a
//! shape-validated [`Table`], repairs exports whose producer wrote raw
//! newlines inside fields, resolves which columns carry the episode number
//! and title, filters rows against a set of episode numbers, and serializes
//! the result back to text. It is pure and synchronous: callers hand text in
//! and get text out, and all file handling stays with the caller.
//!
//! ## Quick start
//!
//! ```
//! use episweep_table::parse;
//!
//! let parsed = parse("episode,name\n1,Pilot\n2,Second");
//! assert_eq!(parsed.table.row_count(), 2);
//! assert!(parsed.diagnostics.is_empty());
//! ```
//!
//! ## Reconciling an export
//!
//! ```
//! use episweep_table::{ExportParser, ReconcileRequest};
//!
//! let parser = ExportParser::default();
//! let report = parser
//!     .reconcile_export("episode,name\n1,Pilot\n2,Second", &ReconcileRequest::delete(vec![2]))
//!     .unwrap();
//! assert_eq!(report.removed_episode_numbers, vec![2]);
//! assert_eq!(report.output, "episode,name\n1,Pilot");
//! ```

pub mod config;
pub mod model;

mod error;
mod reconcile;
mod repair;
mod resolve;
mod serialize;
mod tokenizer;
mod validate;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use model::{Diagnostic, RawTable, Table};
pub use reconcile::{
    reconcile, ReconcileMode, ReconcileOutcome, ReconcileRequest, MAX_CELL_FAILURES,
};
pub use repair::{resynchronize, DateAnchor, RowAnchor};
pub use resolve::{resolve, ColumnMatch, ResolvedColumns, EPISODE_ALIASES, TITLE_ALIASES};
pub use serialize::serialize;
pub use tokenizer::{split_fields, tokenize};
pub use validate::validate;

use config::ParserConfig;

/// A parsed, shape-validated export plus everything that went wrong on the
/// way there.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExport {
    /// The validated table.
    pub table: Table,
    /// Non-fatal problems, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the line-resynchronization pass ran.
    pub repaired: bool,
}

/// Full reconciliation report: the rewritten export plus statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReconcileReport {
    /// Serialized export with the filter applied.
    pub output: String,
    /// Rows remaining after the filter.
    pub remaining_row_count: usize,
    /// Rows removed.
    pub removed_count: usize,
    /// Episode numbers of the removed rows, ascending.
    pub removed_episode_numbers: Vec<i64>,
    /// Parse/shape/cell diagnostics collected across the whole pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the line-resynchronization pass ran.
    pub repaired: bool,
}

/// Parse export text with default settings.
///
/// Never fails: tokenizes, runs the repair pass when a majority of rows
/// mismatch the header, and pads/truncates the rest, reporting every repair
/// as a [`Diagnostic`].
pub fn parse(text: &str) -> ParsedExport {
    ExportParser::default().parse(text)
}

/// A configurable export parser.
///
/// Create one with a custom [`ParserConfig`]:
///
/// ```
/// use episweep_table::config::ParserConfig;
/// use episweep_table::ExportParser;
///
/// let config = ParserConfig::builder().repair(false).build();
/// let parser = ExportParser::new(config);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExportParser {
    config: ParserConfig,
}

impl ExportParser {
    /// Create a parser with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The parser's configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse export text into a validated table.
    ///
    /// When the tokenized rows mostly mismatch the header — the signature of
    /// raw embedded newlines — the input is re-read with the
    /// line-resynchronization pass, which joins in-field line breaks with a
    /// single space. Otherwise quoted line breaks are kept verbatim.
    pub fn parse(&self, text: &str) -> ParsedExport {
        let (raw, mut diagnostics) = tokenize(text);

        let total = raw.rows.len();
        let mismatched = raw.mismatched_rows();
        let repaired = self.config.repair
            && total > 0
            && (mismatched as f32 / total as f32) > self.config.repair_threshold;

        let raw = if repaired {
            tracing::warn!(
                mismatched,
                total,
                "export shape is globally corrupted, resynchronizing lines"
            );
            diagnostics.push(Diagnostic::GlobalShapeCorruption { mismatched, total });
            resynchronize(text, self.config.anchor())
        } else {
            raw
        };

        let (table, shape_diagnostics) = validate(raw);
        diagnostics.extend(shape_diagnostics);

        ParsedExport {
            table,
            diagnostics,
            repaired,
        }
    }

    /// Resolve the episode-number and title columns of parsed headers.
    pub fn resolve_columns(&self, headers: &[String]) -> ResolvedColumns {
        resolve(headers, &self.config)
    }

    /// Run the whole pipeline: parse, resolve, reconcile, serialize.
    ///
    /// The only hard failure is [`Error::EpisodeColumnNotFound`]; everything
    /// else is reported in the result's diagnostics. Matching zero rows is a
    /// success with `removed_count == 0`.
    pub fn reconcile_export(&self, text: &str, request: &ReconcileRequest) -> Result<ReconcileReport> {
        let parsed = self.parse(text);

        let columns = self.resolve_columns(parsed.table.headers());
        let episode = columns.episode.ok_or_else(|| Error::EpisodeColumnNotFound {
            searched: self.config.episode_aliases(),
            headers: parsed.table.headers().to_vec(),
        })?;

        let outcome = reconcile(&parsed.table, episode.index, request);

        let mut diagnostics = parsed.diagnostics;
        diagnostics.extend(outcome.diagnostics);

        Ok(ReconcileReport {
            output: serialize(&outcome.table),
            remaining_row_count: outcome.table.row_count(),
            removed_count: outcome.removed_count,
            removed_episode_numbers: outcome.removed_episode_numbers,
            diagnostics,
            repaired: parsed.repaired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_well_formed() {
        let parsed = parse("episode,name\n1,Pilot\n2,\"Cat, the\"");
        assert!(!parsed.repaired);
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.table.rows()[1][1], "Cat, the");
    }

    #[test]
    fn parse_pads_the_odd_short_row() {
        let parsed = parse("a,b,c\n1,2,3\n4,5\n6,7,8");
        assert!(!parsed.repaired);
        assert_eq!(parsed.table.rows()[1], vec!["4", "5", ""]);
        assert_eq!(
            parsed.diagnostics,
            vec![Diagnostic::RowShapeMismatch {
                row_index: 1,
                expected: 3,
                actual: 2
            }]
        );
    }

    #[test]
    fn majority_mismatch_triggers_repair() {
        // Every record is broken across physical lines, so the first pass
        // sees only mismatched rows.
        let text = "episode,name,air_date,duration,summary\n\
                    1,broken\ntitle,2024-01-01,42,ok\n\
                    2,also\nbroken,2024-01-08,41,ok\n";
        let parsed = parse(text);
        assert!(parsed.repaired);
        assert_eq!(parsed.table.row_count(), 2);
        assert_eq!(parsed.table.rows()[0][1], "broken title");
        assert!(parsed
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::GlobalShapeCorruption { .. })));
        // Converged: no residual shape mismatches.
        assert!(!parsed
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::RowShapeMismatch { .. })));
    }

    #[test]
    fn repair_can_be_disabled() {
        let text = "a,b,c\n1\n2\n3\n";
        let parser = ExportParser::new(ParserConfig::builder().repair(false).build());
        let parsed = parser.parse(text);
        assert!(!parsed.repaired);
        assert_eq!(parsed.table.row_count(), 3);
        assert_eq!(parsed.diagnostics.len(), 3);
    }

    #[test]
    fn quoted_newline_verbatim_without_repair() {
        // Properly quoted newlines do not trigger the repair pass, so the
        // field keeps its line break.
        let parsed = parse("episode,name\n1,\"line one\nline two\"");
        assert!(!parsed.repaired);
        assert_eq!(parsed.table.rows()[0][1], "line one\nline two");
    }

    #[test]
    fn reconcile_export_end_to_end() {
        let parser = ExportParser::default();
        let report = parser
            .reconcile_export(
                "episode,name\n1,Pilot\n2,Second\n3,Third\n4,Fourth",
                &ReconcileRequest::delete(vec![2, 4]),
            )
            .unwrap();
        assert_eq!(report.remaining_row_count, 2);
        assert_eq!(report.removed_count, 2);
        assert_eq!(report.removed_episode_numbers, vec![2, 4]);
        assert_eq!(report.output, "episode,name\n1,Pilot\n3,Third");
    }

    #[test]
    fn missing_episode_column_is_fatal() {
        let parser = ExportParser::default();
        let err = parser
            .reconcile_export("id,air_date\n10,2024-01-01", &ReconcileRequest::delete(vec![10]))
            .unwrap_err();
        match &err {
            Error::EpisodeColumnNotFound { searched, headers } => {
                assert!(searched.iter().any(|a| a == "episode"));
                assert_eq!(headers, &vec!["id".to_string(), "air_date".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_matches_is_success_not_error() {
        let parser = ExportParser::default();
        let report = parser
            .reconcile_export("episode,name\n1,Pilot", &ReconcileRequest::delete(vec![9]))
            .unwrap();
        assert_eq!(report.removed_count, 0);
        assert_eq!(report.remaining_row_count, 1);
    }
}
