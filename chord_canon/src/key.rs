// Key inference from a reduced note census.
//
// For every root in the scale table, count how many of the song's (reduced)
// spellings fall outside that root's major scale. The roots with the fewest
// misses are candidates. Several roots usually tie (a song that never plays
// its 4th or 7th fits two or three keys), so the tie is broken by the song
// itself: walk the reduced spellings from most to least frequent and take the
// first one whose pitch class is a candidate root. The tonic is usually a
// common note.
//
// Matching is by pitch class, so a song that writes its tonic "C#" still
// anchors on the "Db" candidate. When several candidates share the anchor's
// pitch class, the one spelled like the anchor wins, else the first in table
// order. A song whose notes never hit a candidate root falls back to the
// first candidate in table order.
//
// The chosen root fixes the transposition interval that moves it to C.

use chord_canon_theory::PitchClass;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::census::{NoteCount, by_frequency};
use crate::error::NormalizeError;
use crate::scale::{Scale, ScaleTable};

/// The inferred major key of a song and the shift that takes it to C.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Root spelling as it appears in the scale table.
    pub root: String,
    pub pitch_class: PitchClass,
    /// Semitones to add to every chord; always in -11..=0.
    pub interval: i8,
}

impl KeyEstimate {
    /// Already in C; nothing to move.
    pub fn c_major() -> Self {
        KeyEstimate {
            root: "C".to_string(),
            pitch_class: PitchClass::C,
            interval: 0,
        }
    }

    fn for_root(root: &str, pitch_class: PitchClass) -> Self {
        KeyEstimate {
            root: root.to_string(),
            pitch_class,
            interval: -(pitch_class.value() as i8),
        }
    }
}

/// Scales with the fewest notes outside them, in table order, and that
/// minimum. Empty for an empty table.
fn candidate_scales<'t>(table: &'t ScaleTable, notes: &[NoteCount]) -> (Vec<&'t Scale>, usize) {
    let misses: Vec<(&Scale, usize)> = table
        .scales()
        .iter()
        .map(|scale| (scale, scale.missing(notes.iter().map(|n| n.name))))
        .collect();
    let Some(best) = misses.iter().map(|&(_, m)| m).min() else {
        return (Vec::new(), 0);
    };
    let scales = misses
        .into_iter()
        .filter(|&(_, m)| m == best)
        .map(|(scale, _)| scale)
        .collect();
    (scales, best)
}

/// Roots with the fewest notes outside their scale, in table order, and that
/// minimum. Empty for an empty table.
pub fn candidate_roots<'t>(table: &'t ScaleTable, notes: &[NoteCount]) -> (Vec<&'t str>, usize) {
    let (scales, best) = candidate_scales(table, notes);
    (scales.into_iter().map(|s| s.root.name).collect(), best)
}

/// The first candidate whose root is the pitch of `note`, preferring the
/// candidate spelled the same way.
fn anchored<'t>(candidates: &[&'t Scale], note: &NoteCount) -> Option<&'t Scale> {
    let pitch_class = PitchClass::from_spelling(note.name)?;
    let mut same_pitch = candidates
        .iter()
        .copied()
        .filter(|s| s.root.pitch_class == pitch_class)
        .peekable();
    let first = *same_pitch.peek()?;
    Some(same_pitch.find(|s| s.root.name == note.name).unwrap_or(first))
}

/// Infer the key of a song from its reduced census.
///
/// Fails with `NoScaleMatch` only when the table is empty.
pub fn infer_key(table: &ScaleTable, reduced: &[NoteCount]) -> Result<KeyEstimate, NormalizeError> {
    let (candidates, missing) = candidate_scales(table, reduced);
    let by_note = by_frequency(reduced).iter().find_map(|note| anchored(&candidates, note));
    let scale = match by_note {
        Some(scale) => scale,
        None => {
            let fallback = candidates.first().copied().ok_or(NormalizeError::NoScaleMatch)?;
            debug!(
                root = fallback.root.name,
                "no candidate root among song notes, using table order"
            );
            fallback
        }
    };

    debug!(
        root = scale.root.name,
        missing,
        candidates = candidates.len(),
        "inferred key"
    );
    Ok(KeyEstimate::for_root(scale.root.name, scale.root.pitch_class))
}
