// Parallel batch normalization with per-song failure isolation.
//
// Scraped collections run to thousands of songs, and plenty of them are junk:
// no chords, mashups, sections that still contain tab markup, or chords the
// theory layer can't parse. Each song is screened and normalized on its own
// (rayon), and each produces exactly one `SongOutcome`; a bad song never
// takes the batch down with it. Outcomes come back in input order.

use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::config::FilterConfig;
use crate::error::SongFailure;
use crate::normalize::Normalizer;
use crate::song::{NormalizedSong, Song};
use crate::stats;
use chord_canon_theory::ChordTheory;

/// Why a song was turned away before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// Every section is empty after trimming.
    NoChords,
    /// The artist marks a compilation or mashup.
    ExcludedArtist { artist: String },
    /// A trimmed section is longer than a plausible progression.
    SectionTooLong { label: String, len: usize },
    /// A chord token still carries tab markup.
    ScrapeResidue { label: String, token: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoChords => write!(f, "no chords"),
            Rejection::ExcludedArtist { artist } => write!(f, "excluded artist '{artist}'"),
            Rejection::SectionTooLong { label, len } => {
                write!(f, "section '{label}' has {len} chords after trimming")
            }
            Rejection::ScrapeResidue { label, token } => {
                write!(f, "section '{label}' contains markup residue '{token}'")
            }
        }
    }
}

/// Check a song against the acceptance rules. `None` means accepted.
pub fn screen<T: ChordTheory>(
    normalizer: &Normalizer<T>,
    song: &Song,
    filter: &FilterConfig,
) -> Option<Rejection> {
    let trimmed = normalizer.trimmed_sections(song);

    if stats::simplicity(trimmed.iter().map(|(_, chords)| chords.len())).is_nan() {
        return Some(Rejection::NoChords);
    }
    if !filter.excluded_artist_marker.is_empty()
        && song.artist.contains(&filter.excluded_artist_marker)
    {
        return Some(Rejection::ExcludedArtist {
            artist: song.artist.clone(),
        });
    }
    for (label, chords) in &trimmed {
        if chords.len() > filter.max_section_len {
            return Some(Rejection::SectionTooLong {
                label: label.to_string(),
                len: chords.len(),
            });
        }
        if !filter.residue_marker.is_empty()
            && let Some(token) = chords.iter().find(|c| c.contains(&filter.residue_marker))
        {
            return Some(Rejection::ScrapeResidue {
                label: label.to_string(),
                token: token.clone(),
            });
        }
    }
    None
}

/// What happened to one song of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum SongOutcome {
    Normalized(NormalizedSong),
    Failed(SongFailure),
    Filtered {
        title: String,
        artist: String,
        reason: Rejection,
    },
}

/// Screen (if enabled) and normalize every song in parallel.
pub fn normalize_batch<T: ChordTheory>(
    normalizer: &Normalizer<T>,
    songs: &[Song],
) -> Vec<SongOutcome> {
    let filter = &normalizer.config().filter;
    songs
        .par_iter()
        .map(|song| {
            if filter.enabled
                && let Some(reason) = screen(normalizer, song, filter)
            {
                return SongOutcome::Filtered {
                    title: song.title.clone(),
                    artist: song.artist.clone(),
                    reason,
                };
            }
            match normalizer.normalize(song) {
                Ok(normalized) => SongOutcome::Normalized(normalized),
                Err(failure) => {
                    warn!(%failure, "song failed to normalize");
                    SongOutcome::Failed(failure)
                }
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub title: String,
    pub artist: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredRecord {
    pub title: String,
    pub artist: String,
    pub reason: Rejection,
}

/// Batch results split by outcome, ready to serialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutput {
    pub normalized: Vec<NormalizedSong>,
    pub failures: Vec<FailureRecord>,
    pub filtered: Vec<FilteredRecord>,
}

impl BatchOutput {
    pub fn from_outcomes(outcomes: Vec<SongOutcome>) -> Self {
        let mut output = BatchOutput::default();
        for outcome in outcomes {
            match outcome {
                SongOutcome::Normalized(song) => output.normalized.push(song),
                SongOutcome::Failed(failure) => output.failures.push(FailureRecord {
                    title: failure.title,
                    artist: failure.artist,
                    error: failure.error.to_string(),
                }),
                SongOutcome::Filtered {
                    title,
                    artist,
                    reason,
                } => output.filtered.push(FilteredRecord {
                    title,
                    artist,
                    reason,
                }),
            }
        }
        output
    }

    pub fn total(&self) -> usize {
        self.normalized.len() + self.failures.len() + self.filtered.len()
    }

    pub fn log_summary(&self) {
        info!(
            total = self.total(),
            normalized = self.normalized.len(),
            failed = self.failures.len(),
            filtered = self.filtered.len(),
            "batch complete"
        );
    }
}
