// Pitch classes and the spellings that name them.
//
// Scraped chord sheets spell the same pitch several ways ("C#" vs "Db"), and
// the key heuristics downstream count spellings separately before folding
// them together under enharmonic equivalence. This module owns the fixed
// spelling table that makes that folding possible:
//
//   pc 0  C  B#      pc 6  F# Gb
//   pc 1  C# Db      pc 7  G
//   pc 2  D          pc 8  G# Ab
//   pc 3  D# Eb      pc 9  A
//   pc 4  E  Fb      pc 10 A# Bb
//   pc 5  F  E#      pc 11 B  Cb
//
// Every spelling maps to exactly one pitch class. Spellings are handed out as
// `&'static str` borrowed from the table, which keeps `Note` `Copy` and lets
// callers use spellings as cheap map keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// All accepted spellings per pitch class, natural or most common name first.
const PITCH_SPELLINGS: [&[&str]; 12] = [
    &["C", "B#"],
    &["C#", "Db"],
    &["D"],
    &["D#", "Eb"],
    &["E", "Fb"],
    &["F", "E#"],
    &["F#", "Gb"],
    &["G"],
    &["G#", "Ab"],
    &["A"],
    &["A#", "Bb"],
    &["B", "Cb"],
];

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// One of the 12 pitch classes, 0 = C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Wraps any value into 0-11.
    pub fn new(value: u8) -> Self {
        PitchClass(value % 12)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Look up the pitch class of a spelling. Case-sensitive: "Bb" is B flat,
    /// "bb" is not a note.
    pub fn from_spelling(name: &str) -> Option<Self> {
        PITCH_SPELLINGS
            .iter()
            .position(|names| names.contains(&name))
            .map(|pc| PitchClass(pc as u8))
    }

    /// Shift by a signed number of semitones, wrapping around the octave.
    pub fn transpose(self, semitones: i8) -> Self {
        let shifted = (i16::from(self.0) + i16::from(semitones)).rem_euclid(12);
        PitchClass(shifted as u8)
    }

    /// Every accepted spelling of this pitch class.
    pub fn spellings(self) -> &'static [&'static str] {
        PITCH_SPELLINGS[self.0 as usize]
    }

    /// The name of this pitch class under a spelling convention.
    pub fn spell(self, convention: SpellingConvention) -> &'static str {
        match convention {
            SpellingConvention::Sharps => SHARP_NAMES[self.0 as usize],
            SpellingConvention::Flats => FLAT_NAMES[self.0 as usize],
        }
    }
}

/// How to name pitch classes that have no natural spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellingConvention {
    Sharps,
    Flats,
}

impl SpellingConvention {
    /// The convention transposed output is written in (the key of C, which
    /// names black keys with flats).
    pub const CANONICAL: SpellingConvention = SpellingConvention::Flats;

    /// The convention used to spell the tones of a chord built on `root`.
    /// Flat-side roots, plus C and F, spell with flats; everything else
    /// with sharps.
    pub fn for_root(root: &str) -> Self {
        match root {
            "C" | "F" | "Bb" | "Eb" | "Ab" | "Db" | "Gb" | "Cb" | "Fb" => {
                SpellingConvention::Flats
            }
            _ => SpellingConvention::Sharps,
        }
    }
}

/// A spelled pitch: the name as written plus the pitch class it denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub name: &'static str,
    pub pitch_class: PitchClass,
}

impl Note {
    /// Parse an exact spelling ("C", "F#", "Bb"). Returns `None` for anything
    /// outside the spelling table.
    pub fn parse(name: &str) -> Option<Self> {
        let pitch_class = PitchClass::from_spelling(name)?;
        let name = pitch_class
            .spellings()
            .iter()
            .copied()
            .find(|s| *s == name)?;
        Some(Note { name, pitch_class })
    }

    /// Name a pitch class under a convention.
    pub fn spelled(pitch_class: PitchClass, convention: SpellingConvention) -> Self {
        Note {
            name: pitch_class.spell(convention),
            pitch_class,
        }
    }

    /// Two notes are enharmonic when they denote the same pitch class.
    pub fn is_enharmonic(&self, other: &Note) -> bool {
        self.pitch_class == other.pitch_class
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_spelling_maps_to_one_pitch_class() {
        let mut seen = Vec::new();
        for pc in 0..12u8 {
            for name in PitchClass::new(pc).spellings() {
                assert!(!seen.contains(name), "{name} listed twice");
                assert_eq!(PitchClass::from_spelling(name), Some(PitchClass::new(pc)));
                seen.push(*name);
            }
        }
        assert_eq!(seen.len(), 21);
    }

    #[test]
    fn test_enharmonic_pairs() {
        let cs = Note::parse("C#").unwrap();
        let db = Note::parse("Db").unwrap();
        assert!(cs.is_enharmonic(&db));
        assert_ne!(cs.name, db.name);
        assert_eq!(cs.pitch_class.value(), 1);
    }

    #[test]
    fn test_rejects_unknown_spellings() {
        assert_eq!(Note::parse("H"), None);
        assert_eq!(Note::parse("c"), None);
        assert_eq!(Note::parse("C##"), None);
        assert_eq!(Note::parse(""), None);
    }

    #[test]
    fn test_transpose_wraps_both_ways() {
        let a = PitchClass::new(9);
        assert_eq!(a.transpose(3), PitchClass::C);
        assert_eq!(PitchClass::C.transpose(-1), PitchClass::new(11));
        assert_eq!(a.transpose(-9), PitchClass::C);
        assert_eq!(a.transpose(0), a);
    }

    #[test]
    fn test_spelling_conventions() {
        let pc = PitchClass::new(10);
        assert_eq!(pc.spell(SpellingConvention::Sharps), "A#");
        assert_eq!(pc.spell(SpellingConvention::Flats), "Bb");
        assert_eq!(SpellingConvention::for_root("F"), SpellingConvention::Flats);
        assert_eq!(SpellingConvention::for_root("D"), SpellingConvention::Sharps);
        assert_eq!(SpellingConvention::for_root("Db"), SpellingConvention::Flats);
        assert_eq!(SpellingConvention::for_root("C#"), SpellingConvention::Sharps);
    }
}
