//! Parser configuration.

use std::fmt;
use std::sync::Arc;

use crate::repair::{DateAnchor, RowAnchor};
use crate::resolve::{EPISODE_ALIASES, TITLE_ALIASES};

/// Configuration for the export parser.
///
/// Use the builder to create one:
///
/// ```
/// use episweep_table::config::ParserConfig;
///
/// let config = ParserConfig::builder()
///     .extra_episode_alias("folge")
///     .repair(false)
///     .build();
/// ```
#[derive(Clone)]
pub struct ParserConfig {
    /// Run the line-resynchronization pass when the mismatch pre-check fires.
    pub repair: bool,

    /// Mismatched-row fraction above which the repair pass triggers.
    /// The default of 0.5 means a strict majority.
    pub repair_threshold: f32,

    /// Aliases appended after the built-in episode-number alias table.
    pub extra_episode_aliases: Vec<String>,

    /// Aliases appended after the built-in title alias table.
    pub extra_title_aliases: Vec<String>,

    anchor: Arc<dyn RowAnchor>,
}

impl ParserConfig {
    /// Start building a configuration.
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }

    /// The row-start predicate used by the repair pass.
    pub fn anchor(&self) -> &dyn RowAnchor {
        self.anchor.as_ref()
    }

    /// Episode-number aliases in priority order: built-ins first, then any
    /// configured extras. Extras never shadow built-in priority.
    pub fn episode_aliases(&self) -> Vec<String> {
        EPISODE_ALIASES
            .iter()
            .map(|a| a.to_string())
            .chain(self.extra_episode_aliases.iter().cloned())
            .collect()
    }

    /// Title aliases in priority order, built-ins first.
    pub fn title_aliases(&self) -> Vec<String> {
        TITLE_ALIASES
            .iter()
            .map(|a| a.to_string())
            .chain(self.extra_title_aliases.iter().cloned())
            .collect()
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            repair: true,
            repair_threshold: 0.5,
            extra_episode_aliases: Vec::new(),
            extra_title_aliases: Vec::new(),
            anchor: Arc::new(DateAnchor),
        }
    }
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("repair", &self.repair)
            .field("repair_threshold", &self.repair_threshold)
            .field("extra_episode_aliases", &self.extra_episode_aliases)
            .field("extra_title_aliases", &self.extra_title_aliases)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ParserConfig`].
#[derive(Default)]
pub struct ParserConfigBuilder {
    config: ConfigParts,
}

#[derive(Default)]
struct ConfigParts {
    repair: Option<bool>,
    repair_threshold: Option<f32>,
    extra_episode_aliases: Vec<String>,
    extra_title_aliases: Vec<String>,
    anchor: Option<Arc<dyn RowAnchor>>,
}

impl ParserConfigBuilder {
    /// Enable or disable the repair pass (enabled by default).
    pub fn repair(mut self, enabled: bool) -> Self {
        self.config.repair = Some(enabled);
        self
    }

    /// Set the mismatched-row fraction that triggers repair.
    pub fn repair_threshold(mut self, threshold: f32) -> Self {
        self.config.repair_threshold = Some(threshold.clamp(0.0, 1.0));
        self
    }

    /// Append an episode-number alias after the built-in table.
    pub fn extra_episode_alias(mut self, alias: impl Into<String>) -> Self {
        self.config.extra_episode_aliases.push(alias.into());
        self
    }

    /// Append a title alias after the built-in table.
    pub fn extra_title_alias(mut self, alias: impl Into<String>) -> Self {
        self.config.extra_title_aliases.push(alias.into());
        self
    }

    /// Replace the row-start predicate used by the repair pass.
    pub fn anchor(mut self, anchor: Arc<dyn RowAnchor>) -> Self {
        self.config.anchor = Some(anchor);
        self
    }

    /// Finish building.
    pub fn build(self) -> ParserConfig {
        let defaults = ParserConfig::default();
        ParserConfig {
            repair: self.config.repair.unwrap_or(defaults.repair),
            repair_threshold: self
                .config
                .repair_threshold
                .unwrap_or(defaults.repair_threshold),
            extra_episode_aliases: self.config.extra_episode_aliases,
            extra_title_aliases: self.config.extra_title_aliases,
            anchor: self.config.anchor.unwrap_or(defaults.anchor),
        }
    }
}
