// Error types for song normalization.
//
// `NormalizeError` is what went wrong; `SongFailure` pins it to the song it
// happened in, which is what batch callers need to report and move on.

use chord_canon_theory::ChordError;
use thiserror::Error;

use crate::song::Song;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// A chord in the named section could not be decomposed or transposed.
    #[error("malformed chord in section '{section}': {source}")]
    MalformedChordToken {
        section: String,
        #[source]
        source: ChordError,
    },

    /// The scale table is empty, so no key can be chosen.
    #[error("no scale in the table to match the song against")]
    NoScaleMatch,

    /// Two sections of one song share a label.
    #[error("duplicate section label '{0}'")]
    DuplicateSection(String),
}

/// A song that could not be normalized, and why.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("'{title}' by {artist}: {error}")]
pub struct SongFailure {
    pub title: String,
    pub artist: String,
    #[source]
    pub error: NormalizeError,
}

impl SongFailure {
    pub fn new(song: &Song, error: NormalizeError) -> Self {
        SongFailure {
            title: song.title.clone(),
            artist: song.artist.clone(),
            error,
        }
    }
}
