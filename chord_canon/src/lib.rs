// Chord Canon
//
// Normalizes chord progressions scraped from user-generated tab sheets so
// progressions from different songs can be compared: each section is cut to
// its repeating unit, the song's major key is inferred from the spelled
// notes its chords contain, and everything is transposed into C major under
// canonical section labels.
//
// Architecture:
// - period.rs: Prefix-doubling period detection and section trimming
// - scale.rs: Read-only major-scale table over 17 root spellings
// - census.rs: Spelled-note counting and greedy reduction to 7 spellings
// - key.rs: Nearest-scale key inference with frequency tie-break
// - song.rs: Song/section/output types, label canonicalization
// - stats.rs: Simplicity and complexity statistics
// - normalize.rs: `Normalizer`, the per-song pipeline and failure policy
// - batch.rs: Parallel batch runs, acceptance filter, serializable output
// - config.rs: `NormalizerConfig` (TOML-loadable)
// - error.rs: `NormalizeError` and `SongFailure`
//
// Chord parsing and transposition come from `chord_canon_theory` through the
// `ChordTheory` trait. Normalization is pure and deterministic for a given
// input, including tie-breaks, which all follow first-seen order.

pub mod batch;
pub mod census;
pub mod config;
pub mod error;
pub mod key;
pub mod normalize;
pub mod period;
pub mod scale;
pub mod song;
pub mod stats;

pub use batch::{BatchOutput, Rejection, SongOutcome, normalize_batch};
pub use config::{FailurePolicy, FilterConfig, NormalizerConfig};
pub use error::{NormalizeError, SongFailure};
pub use key::KeyEstimate;
pub use normalize::Normalizer;
pub use period::{SegmentationConfig, detect_period, trim_section};
pub use scale::ScaleTable;
pub use song::{NormalizedSong, Section, Song};
