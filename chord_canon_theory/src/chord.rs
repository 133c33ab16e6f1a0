// Chord-symbol parsing, decomposition and transposition.
//
// A chord token is a root spelling, an optional quality suffix, and an
// optional slash bass: "Am7", "Gsus4", "D/F#", "Bbmaj7". Qualities are looked
// up in a fixed table of interval sets (semitones above the root), so a token
// with an unknown suffix is a parse error rather than a guess.
//
// The quality suffix is kept exactly as written ("maj7" and "M7" both parse
// but render back unchanged), which makes transposition quality-preserving at
// the string level: only the root and bass names change.

use crate::error::ChordError;
use crate::pitch::{Note, SpellingConvention};
use std::fmt;

/// A chord quality: the suffix as written and the intervals it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality {
    pub name: &'static str,
    pub intervals: &'static [u8],
}

/// Supported qualities. Intervals above 11 are compound (9ths, 11ths, 13ths)
/// and fold onto their pitch class.
const QUALITIES: &[Quality] = &[
    Quality { name: "", intervals: &[0, 4, 7] },
    Quality { name: "maj", intervals: &[0, 4, 7] },
    Quality { name: "M", intervals: &[0, 4, 7] },
    Quality { name: "m", intervals: &[0, 3, 7] },
    Quality { name: "min", intervals: &[0, 3, 7] },
    Quality { name: "-", intervals: &[0, 3, 7] },
    Quality { name: "5", intervals: &[0, 7] },
    Quality { name: "dim", intervals: &[0, 3, 6] },
    Quality { name: "aug", intervals: &[0, 4, 8] },
    Quality { name: "+", intervals: &[0, 4, 8] },
    Quality { name: "sus", intervals: &[0, 5, 7] },
    Quality { name: "sus2", intervals: &[0, 2, 7] },
    Quality { name: "sus4", intervals: &[0, 5, 7] },
    Quality { name: "6", intervals: &[0, 4, 7, 9] },
    Quality { name: "m6", intervals: &[0, 3, 7, 9] },
    Quality { name: "69", intervals: &[0, 4, 7, 9, 14] },
    Quality { name: "7", intervals: &[0, 4, 7, 10] },
    Quality { name: "7b5", intervals: &[0, 4, 6, 10] },
    Quality { name: "7-5", intervals: &[0, 4, 6, 10] },
    Quality { name: "7#5", intervals: &[0, 4, 8, 10] },
    Quality { name: "7+5", intervals: &[0, 4, 8, 10] },
    Quality { name: "aug7", intervals: &[0, 4, 8, 10] },
    Quality { name: "7sus2", intervals: &[0, 2, 7, 10] },
    Quality { name: "7sus4", intervals: &[0, 5, 7, 10] },
    Quality { name: "7b9", intervals: &[0, 4, 7, 10, 13] },
    Quality { name: "7#9", intervals: &[0, 4, 7, 10, 15] },
    Quality { name: "m7", intervals: &[0, 3, 7, 10] },
    Quality { name: "min7", intervals: &[0, 3, 7, 10] },
    Quality { name: "m7b5", intervals: &[0, 3, 6, 10] },
    Quality { name: "m7-5", intervals: &[0, 3, 6, 10] },
    Quality { name: "dim7", intervals: &[0, 3, 6, 9] },
    Quality { name: "maj7", intervals: &[0, 4, 7, 11] },
    Quality { name: "M7", intervals: &[0, 4, 7, 11] },
    Quality { name: "mmaj7", intervals: &[0, 3, 7, 11] },
    Quality { name: "mM7", intervals: &[0, 3, 7, 11] },
    Quality { name: "add2", intervals: &[0, 2, 4, 7] },
    Quality { name: "add9", intervals: &[0, 4, 7, 14] },
    Quality { name: "madd9", intervals: &[0, 3, 7, 14] },
    Quality { name: "add11", intervals: &[0, 4, 7, 17] },
    Quality { name: "9", intervals: &[0, 4, 7, 10, 14] },
    Quality { name: "m9", intervals: &[0, 3, 7, 10, 14] },
    Quality { name: "maj9", intervals: &[0, 4, 7, 11, 14] },
    Quality { name: "M9", intervals: &[0, 4, 7, 11, 14] },
    Quality { name: "11", intervals: &[0, 4, 7, 10, 14, 17] },
    Quality { name: "m11", intervals: &[0, 3, 7, 10, 14, 17] },
    Quality { name: "13", intervals: &[0, 4, 7, 10, 14, 21] },
    Quality { name: "m13", intervals: &[0, 3, 7, 10, 14, 21] },
    Quality { name: "maj13", intervals: &[0, 4, 7, 11, 14, 21] },
];

impl Quality {
    /// Find a quality by its exact suffix.
    pub fn lookup(suffix: &str) -> Option<Quality> {
        QUALITIES.iter().copied().find(|q| q.name == suffix)
    }
}

/// A parsed chord token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub root: Note,
    pub quality: Quality,
    pub bass: Option<Note>,
}

impl Chord {
    /// Parse a chord token. Surrounding whitespace is ignored.
    pub fn parse(token: &str) -> Result<Chord, ChordError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ChordError::Empty);
        }

        let (main, bass) = match token.split_once('/') {
            Some((main, bass)) => (main, Some(bass)),
            None => (token, None),
        };

        let bytes = main.as_bytes();
        if !matches!(bytes.first(), Some(b'A'..=b'G')) {
            return Err(ChordError::InvalidRoot(token.to_string()));
        }
        let root_len = match bytes.get(1) {
            Some(b'#') | Some(b'b') => 2,
            _ => 1,
        };
        let root = Note::parse(&main[..root_len])
            .ok_or_else(|| ChordError::InvalidRoot(token.to_string()))?;

        let suffix = &main[root_len..];
        let quality = Quality::lookup(suffix).ok_or_else(|| ChordError::UnknownQuality {
            token: token.to_string(),
            quality: suffix.to_string(),
        })?;

        let bass = bass
            .map(|b| {
                Note::parse(b.trim()).ok_or_else(|| ChordError::InvalidBass(token.to_string()))
            })
            .transpose()?;

        Ok(Chord { root, quality, bass })
    }

    /// The distinct notes of the chord, spelled relative to its root.
    ///
    /// The root keeps the spelling it was written with; the other tones
    /// follow the root's spelling convention. A slash bass comes first and
    /// displaces any chord tone of the same pitch class.
    pub fn notes(&self) -> Vec<Note> {
        let convention = SpellingConvention::for_root(self.root.name);
        let mut notes: Vec<Note> = Vec::with_capacity(self.quality.intervals.len() + 1);
        if let Some(bass) = self.bass {
            notes.push(bass);
        }
        for &interval in self.quality.intervals {
            let note = if interval == 0 {
                self.root
            } else {
                let pc = self.root.pitch_class.transpose((interval % 12) as i8);
                Note::spelled(pc, convention)
            };
            if !notes.iter().any(|n| n.is_enharmonic(&note)) {
                notes.push(note);
            }
        }
        notes
    }

    /// Shift root and bass by `semitones`, naming them under `convention`.
    /// The quality is untouched.
    pub fn transpose(&self, semitones: i8, convention: SpellingConvention) -> Chord {
        let shift = |note: Note| Note::spelled(note.pitch_class.transpose(semitones), convention);
        Chord {
            root: shift(self.root),
            quality: self.quality,
            bass: self.bass.map(shift),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality.name)?;
        if let Some(bass) = self.bass {
            write!(f, "/{bass}")?;
        }
        Ok(())
    }
}
