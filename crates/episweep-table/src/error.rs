//! Error types for episweep-table.
//!
//! Almost everything in this crate degrades gracefully and reports problems
//! as [`crate::Diagnostic`]s. The variants here are the exceptions: hard
//! failures the caller must handle.

/// Hard failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No header matched any episode-number alias, so reconciliation cannot
    /// identify which column to filter on. Distinct from a reconciliation
    /// that matched zero rows, which is an empty but successful result.
    #[error(
        "no episode-number column found: searched aliases [{}] against headers [{}]",
        .searched.join(", "),
        .headers.join(", ")
    )]
    EpisodeColumnNotFound {
        /// Aliases tried, in priority order.
        searched: Vec<String>,
        /// Headers actually present in the export.
        headers: Vec<String>,
    },

    /// A row handed to [`crate::Table::new`] violated the row-length
    /// invariant.
    #[error("row {row_index} has {actual} fields, expected {expected}")]
    ShapeInvariant {
        /// Zero-based data-row index.
        row_index: usize,
        /// Header length.
        expected: usize,
        /// Field count found.
        actual: usize,
    },
}

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_error_names_aliases_and_headers() {
        let err = Error::EpisodeColumnNotFound {
            searched: vec!["episode".into(), "ep".into()],
            headers: vec!["id".into(), "air_date".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("episode, ep"));
        assert!(msg.contains("id, air_date"));
    }
}
