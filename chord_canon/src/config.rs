// Normalizer configuration.
//
// Everything tunable about a run lives in `NormalizerConfig`. All fields have
// defaults matching the scraped-corpus cleaning rules, and every struct is
// `#[serde(default)]`, so a TOML file only needs the keys it changes:
//
//   failure_policy = "skip_section"
//   max_scale_notes = 7
//
//   [segmentation]
//   long_period = 8
//
//   [filter]
//   enabled = true
//   max_section_len = 16

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::period::SegmentationConfig;

/// What to do when a section contains a chord that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole song; no partial result.
    #[default]
    AbortSong,
    /// Drop the offending section, record it, and normalize the rest.
    SkipSection,
}

/// Acceptance rules applied to songs before normalization in batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled: bool,
    /// Longest trimmed section accepted (default: 16).
    pub max_section_len: usize,
    /// Artists containing this are compilations, not songs.
    pub excluded_artist_marker: String,
    /// Tokens containing this are leftover tab markup.
    pub residue_marker: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            enabled: true,
            max_section_len: 16,
            excluded_artist_marker: "Mashup".to_string(),
            residue_marker: "ch".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub failure_policy: FailurePolicy,
    /// Distinct spellings kept by the census before key inference.
    pub max_scale_notes: usize,
    pub segmentation: SegmentationConfig,
    pub filter: FilterConfig,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            failure_policy: FailurePolicy::AbortSong,
            max_scale_notes: 7,
            segmentation: SegmentationConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl NormalizerConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = NormalizerConfig::from_toml("").unwrap();
        assert_eq!(config, NormalizerConfig::default());
        assert_eq!(config.max_scale_notes, 7);
        assert_eq!(config.segmentation.long_period, 8);
        assert!(config.filter.enabled);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = NormalizerConfig::from_toml(
            r#"
            failure_policy = "skip_section"

            [filter]
            max_section_len = 24
            "#,
        )
        .unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::SkipSection);
        assert_eq!(config.filter.max_section_len, 24);
        assert_eq!(config.filter.residue_marker, "ch");
        assert_eq!(config.max_scale_notes, 7);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let err = NormalizerConfig::from_toml("failure_policy = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = NormalizerConfig::load(Path::new("/nonexistent/chord_canon.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
