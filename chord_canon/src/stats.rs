// Per-song progression statistics.
//
// Both are crude proxies computed on the trimmed, untransposed sections:
// - simplicity: mean number of chords per non-empty section (shorter loops
//   read as simpler songs)
// - complexity: mean length of chord names once the 'm', 'b' and '#' markers
//   are stripped, i.e. roughly root letter plus extension digits/words
//
// An empty collection yields NaN rather than an error; downstream filtering
// uses NaN simplicity to drop songs with no chords at all.

/// Mean chords per section, ignoring empty sections.
pub fn simplicity(section_lengths: impl IntoIterator<Item = usize>) -> f64 {
    mean(
        section_lengths
            .into_iter()
            .filter(|&len| len > 0)
            .map(|len| len as f64),
    )
}

/// Mean core length over every chord name.
pub fn complexity<'a>(chords: impl IntoIterator<Item = &'a str>) -> f64 {
    mean(chords.into_iter().map(|c| core_length(c) as f64))
}

/// Character count of a chord name without 'm', 'b' or '#'.
pub fn core_length(chord: &str) -> usize {
    chord.chars().filter(|c| !matches!(c, 'm' | 'b' | '#')).count()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}
