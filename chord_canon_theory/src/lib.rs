// Chord theory for the chord_canon normalizer.
//
// Everything the normalizer needs to know about note names and chord symbols
// lives here, so the core crate can treat chord theory as an injected
// capability rather than string munging of its own.
//
// Architecture:
// - `pitch.rs`: `PitchClass`, the fixed spelling table, `Note` (a spelled
//   pitch) and `SpellingConvention` (sharps vs flats when naming a pitch)
// - `chord.rs`: `Quality` table and `Chord`: parsing of tokens like "Am7",
//   "Gsus4" or "D/F#", decomposition into spelled notes, transposition
// - `theory.rs`: the `ChordTheory` trait consumed by the normalizer and its
//   default implementation `StandardTheory`
// - `error.rs`: `ChordError` for tokens that cannot be parsed
//
// The crate is pure and deterministic: no I/O, no global mutable state, no
// hash-order dependence.

pub mod chord;
pub mod error;
pub mod pitch;
pub mod theory;

pub use chord::{Chord, Quality};
pub use error::ChordError;
pub use pitch::{Note, PitchClass, SpellingConvention};
pub use theory::{ChordTheory, StandardTheory};
