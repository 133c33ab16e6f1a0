// Repeating-pattern detection and section trimming.
//
// Tab sheets usually write a section's progression out several times ("Am F
// C G Am F C G ..."), sometimes with a stray chord tacked on the end. Before
// any key analysis, each section is cut down to the block that repeats, so a
// verse played four times counts the same as a verse played once.
//
// `detect_period` is prefix-doubling equality: the smallest p >= 2 whose first
// p elements are immediately repeated. It is not a general minimal-period
// search; it misses repeats that don't start at index 0.
//
// `trim_section` layers two scraping heuristics on top:
// - a 7k-length section whose tokens 0..3 reappear at 4..7 is a 4-chord
//   block followed by a 3-chord echo, and keeps only the first 4
// - a long detected period (> `long_period`) that collapses below the
//   threshold once the last token is dropped is a short period polluted by
//   one trailing stray, and uses the shorter period

use serde::{Deserialize, Serialize};

/// Section length signature of a 4-chord block followed by a 3-chord echo.
const ECHO_BLOCK_MODULUS: usize = 7;
const ECHO_BLOCK_KEEP: usize = 4;

/// Tuning for `trim_section`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Periods longer than this are re-checked without the final token, and
    /// the re-check must come in under it to be used. Default: 8.
    pub long_period: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        SegmentationConfig { long_period: 8 }
    }
}

/// Smallest period p in 2..=len/2 with `seq[..p] == seq[p..2p]`, or `len` if
/// none repeats.
pub fn detect_period<T: PartialEq>(seq: &[T]) -> usize {
    let len = seq.len();
    let max_candidate = (len - len % 2) / 2 + 1;
    (2..max_candidate)
        .find(|&p| seq[..p] == seq[p..2 * p])
        .unwrap_or(len)
}

/// The number of leading tokens of `tokens` to keep.
pub fn section_period<T: PartialEq>(tokens: &[T], config: &SegmentationConfig) -> usize {
    let len = tokens.len();
    if len >= ECHO_BLOCK_MODULUS
        && len % ECHO_BLOCK_MODULUS == 0
        && tokens[0..3] == tokens[ECHO_BLOCK_KEEP..ECHO_BLOCK_MODULUS]
    {
        return ECHO_BLOCK_KEEP;
    }

    let period = detect_period(tokens);
    if period > config.long_period {
        let without_last = detect_period(&tokens[..len - 1]);
        if without_last < config.long_period {
            return without_last;
        }
    }
    period
}

/// Trim a section to its repeating unit.
pub fn trim_section<'a, T: PartialEq>(tokens: &'a [T], config: &SegmentationConfig) -> &'a [T] {
    &tokens[..section_period(tokens, config)]
}
