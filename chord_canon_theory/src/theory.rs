// The chord-theory capability consumed by the normalizer.
//
// The normalizer only ever needs two things from chord theory: the spelled
// notes a token contains, and the token moved by some number of semitones.
// `ChordTheory` names exactly that seam so tests (or a richer parser) can
// stand in for `StandardTheory` without touching the key heuristics.

use crate::chord::Chord;
use crate::error::ChordError;
use crate::pitch::{Note, SpellingConvention};

/// Decompose and transpose chord tokens.
///
/// Implementations must be pure: the same token always yields the same notes
/// in the same order, since the census tie-breaks depend on first-seen order.
pub trait ChordTheory: Send + Sync {
    /// The distinct spelled notes of a chord token.
    fn decompose(&self, token: &str) -> Result<Vec<Note>, ChordError>;

    /// The token shifted by `semitones`, re-spelled canonically.
    fn transpose(&self, token: &str, semitones: i8) -> Result<String, ChordError>;
}

/// Table-driven chord theory built on `Chord::parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardTheory {
    /// Convention for naming transposed roots and basses.
    pub output: SpellingConvention,
}

impl Default for StandardTheory {
    fn default() -> Self {
        StandardTheory {
            output: SpellingConvention::CANONICAL,
        }
    }
}

impl ChordTheory for StandardTheory {
    fn decompose(&self, token: &str) -> Result<Vec<Note>, ChordError> {
        Ok(Chord::parse(token)?.notes())
    }

    fn transpose(&self, token: &str, semitones: i8) -> Result<String, ChordError> {
        let chord = Chord::parse(token)?;
        Ok(chord.transpose(semitones, self.output).to_string())
    }
}
