//! Line resynchronization for corrupted exports.
//!
//! Some producers write field values containing raw, unescaped newlines. The
//! tokenizer then sees one logical record smeared across several physical
//! lines and most rows come out with the wrong field count. This pass
//! re-reads the raw text line by line, accumulating physical lines (joined
//! by a single space, so original in-field line breaks become spaces) until
//! the accumulator tokenizes to the header's field count.
//!
//! When the accumulator overshoots the header length, the start of the
//! *next* record is located with a [`RowAnchor`] and the accumulator is
//! split there. The anchor is a heuristic: field content that happens to
//! look like a row start will mis-stitch, so residual shape mismatches after
//! this pass are still reported downstream rather than silenced.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::RawTable;
use crate::tokenizer::split_fields;

/// Row-start predicate used to resynchronize an over-long accumulator.
///
/// Implementations report the byte offset where a new logical record appears
/// to begin. Exports with a different leading-column shape can supply their
/// own anchor without touching the merge loop.
pub trait RowAnchor: Send + Sync {
    /// Offset of the first plausible row start strictly after the beginning
    /// of `text`, or `None` if nothing past offset 0 looks like one.
    ///
    /// Matches at offset 0 must be ignored: the accumulator's own record
    /// legitimately starts with the anchor shape.
    fn find_row_start(&self, text: &str) -> Option<usize>;
}

/// Default anchor: an integer, a comma, non-comma text, a comma, then a
/// date-like token. Matches the leading columns of a typical episode
/// export (`number,title,air_date,...`).
static DATE_ANCHOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\s*,[^,\r\n]+,\s*\d{4}[-/.]\d{1,2}[-/.]\d{1,2}")
        .expect("anchor pattern is valid")
});

/// The built-in [`RowAnchor`] for number/title/date-shaped exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateAnchor;

impl RowAnchor for DateAnchor {
    fn find_row_start(&self, text: &str) -> Option<usize> {
        DATE_ANCHOR_PATTERN
            .find_iter(text)
            .map(|m| m.start())
            .find(|&start| start > 0)
    }
}

/// Re-merge physical lines into logical rows.
///
/// The first non-blank physical line is taken as the header. Best effort:
/// an accumulator left over at end of input is emitted as-is rather than
/// discarded, and rows that still mismatch are left for the validator to
/// repair and report.
pub fn resynchronize(text: &str, anchor: &dyn RowAnchor) -> RawTable {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let headers = match lines.next() {
        Some(line) => split_fields(line),
        None => return RawTable::default(),
    };
    let expected = headers.len();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut acc = String::new();

    for line in lines {
        if acc.is_empty() {
            acc.push_str(line);
        } else {
            acc.push(' ');
            acc.push_str(line);
        }
        drain_accumulator(&mut acc, &mut rows, expected, anchor);
    }

    // Partial data at end of input is preserved, not discarded.
    if !acc.trim().is_empty() {
        rows.push(split_fields(&acc));
    }

    RawTable { headers, rows }
}

/// Emit every complete record currently in the accumulator.
fn drain_accumulator(
    acc: &mut String,
    rows: &mut Vec<Vec<String>>,
    expected: usize,
    anchor: &dyn RowAnchor,
) {
    loop {
        let fields = split_fields(acc);
        if fields.len() < expected {
            // Still short: keep accumulating physical lines.
            return;
        }
        if fields.len() == expected {
            rows.push(fields);
            acc.clear();
            return;
        }
        // Overshot: the excess belongs to the next record. Split at the
        // anchor if one is found past the current record's start.
        match anchor.find_row_start(acc) {
            Some(at) => {
                let rest = acc.split_off(at);
                let left = std::mem::replace(acc, rest);
                let left_fields = split_fields(left.trim_end());
                if left_fields.is_empty() {
                    continue;
                }
                if left_fields.len() != expected {
                    tracing::debug!(
                        expected,
                        actual = left_fields.len(),
                        "anchor split left a mismatched row"
                    );
                }
                rows.push(left_fields);
                // Loop again: the remainder may itself be complete or long.
            }
            None => {
                // No plausible row start; emit the over-long row and let the
                // validator truncate and report it.
                rows.push(fields);
                acc.clear();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "episode,name,air_date,duration,summary";

    #[test]
    fn anchor_skips_offset_zero() {
        let anchor = DateAnchor;
        let text = "1,Pilot,2024-01-01,42,ok 2,Second,2024-01-08,41,ok";
        let at = anchor.find_row_start(text).unwrap();
        assert_eq!(&text[at..at + 1], "2");
        assert!(at > 0);
    }

    #[test]
    fn anchor_none_without_date() {
        let anchor = DateAnchor;
        assert_eq!(anchor.find_row_start("1,Pilot,forty-two"), None);
    }

    #[test]
    fn stitches_broken_rows() {
        // Each record is broken across three physical lines.
        let text = format!(
            "{HEADER}\n1,Pilot about\na long\nwinter,2024-01-01,42,fine\n2,Second\npart\nhere,2024-01-08,41,also fine\n"
        );
        let raw = resynchronize(&text, &DateAnchor);
        assert_eq!(raw.headers.len(), 5);
        assert_eq!(
            raw.rows,
            vec![
                vec!["1", "Pilot about a long winter", "2024-01-01", "42", "fine"],
                vec!["2", "Second part here", "2024-01-08", "41", "also fine"],
            ]
        );
    }

    #[test]
    fn splits_merged_records_at_anchor() {
        // Two records end up on one physical line.
        let text = format!("{HEADER}\n1,Pilot,2024-01-01,42,fine 2,Second,2024-01-08,41,good\n");
        let raw = resynchronize(&text, &DateAnchor);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[0][0], "1");
        assert_eq!(raw.rows[1][0], "2");
        assert_eq!(raw.rows[1][4], "good");
    }

    #[test]
    fn trailing_partial_row_is_kept() {
        let text = format!("{HEADER}\n1,Pilot,2024-01-01,42,fine\n2,Second half");
        let raw = resynchronize(&text, &DateAnchor);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[1], vec!["2", "Second half"]);
    }

    #[test]
    fn overshoot_without_anchor_emits_long_row() {
        let header = "a,b";
        let text = format!("{header}\nx,y,z,w\n");
        let raw = resynchronize(&text, &DateAnchor);
        assert_eq!(raw.rows, vec![vec!["x", "y", "z", "w"]]);
    }

    #[test]
    fn intact_file_passes_through() {
        let text = format!("{HEADER}\n1,Pilot,2024-01-01,42,fine\n");
        let raw = resynchronize(&text, &DateAnchor);
        assert_eq!(raw.rows.len(), 1);
        assert_eq!(raw.rows[0].len(), 5);
    }

    #[test]
    fn custom_anchor_strategy() {
        struct PipeAnchor;
        impl RowAnchor for PipeAnchor {
            fn find_row_start(&self, text: &str) -> Option<usize> {
                text[1..].find('|').map(|i| i + 2)
            }
        }
        let text = "a,b\n1,one |2,two\n";
        let raw = resynchronize(text, &PipeAnchor);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[1], vec!["2", "two"]);
    }
}
