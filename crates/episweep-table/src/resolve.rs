//! Column-semantic resolution.
//!
//! Maps raw header strings to semantic roles through ordered alias lists.
//! Matching is case-insensitive substring containment on trimmed text, and
//! alias-list order dominates header order: the first alias that matches
//! *any* header wins, even when a later alias would match an earlier header.
//!
//! Containment can false-positive (a header named `titleless_episode`
//! matches both roles), which is kept for compatibility with the exports in
//! the wild; every decision is logged at debug for that reason.

use crate::config::ParserConfig;

/// Built-in episode-number aliases, in priority order.
pub const EPISODE_ALIASES: &[&str] = &[
    "episode_number",
    "episode",
    "ep",
    "number",
    "episode_num",
    "ep_num",
    "集数",
    "第几集",
];

/// Built-in name/title aliases, in priority order.
pub const TITLE_ALIASES: &[&str] = &["name", "title", "标题", "名称", "剧集名"];

/// A header matched to a semantic role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMatch {
    /// Zero-based header index.
    pub index: usize,
    /// The alias that matched.
    pub alias: String,
    /// The raw header text.
    pub header: String,
}

/// Resolved semantic roles for an export's headers.
///
/// `episode` being `None` is a hard failure for reconciliation; a missing
/// `title` only blocks title-based operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    /// Column holding the episode number.
    pub episode: Option<ColumnMatch>,
    /// Column holding the episode name/title.
    pub title: Option<ColumnMatch>,
}

/// Resolve episode-number and title columns from the header row.
pub fn resolve(headers: &[String], config: &ParserConfig) -> ResolvedColumns {
    ResolvedColumns {
        episode: find_role(headers, &config.episode_aliases(), "episode_number"),
        title: find_role(headers, &config.title_aliases(), "title"),
    }
}

fn find_role(headers: &[String], aliases: &[String], role: &str) -> Option<ColumnMatch> {
    for alias in aliases {
        let needle = alias.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        for (index, header) in headers.iter().enumerate() {
            if header.trim().to_lowercase().contains(&needle) {
                tracing::debug!(role, index, header = %header, alias = %alias, "resolved column");
                return Some(ColumnMatch {
                    index,
                    alias: alias.clone(),
                    header: header.clone(),
                });
            }
        }
    }
    tracing::debug!(role, ?headers, "no alias matched any header");
    None
}
