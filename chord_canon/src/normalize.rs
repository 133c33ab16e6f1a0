// The song normalizer: trim, census, infer key, transpose, relabel.
//
// One call handles one song and touches nothing outside it, so a single
// `Normalizer` can be shared across threads (see batch.rs). The pipeline:
//
// 1. Trim every section to its repeating unit (period.rs).
// 2. Compute simplicity/complexity on the trimmed, untransposed chords.
// 3. Decompose every chord of every section into spelled notes and count
//    them across the whole song (census.rs). Under `AbortSong` the first
//    malformed chord fails the song; under `SkipSection` its section is
//    dropped from the census and the output.
// 4. Reduce the census and infer the key (key.rs). A song with no notes at
//    all is left where it is (C, interval 0).
// 5. Transpose each surviving section by the key's interval and store it
//    under its canonical label and its base-label group (song.rs).

use chord_canon_theory::{ChordError, ChordTheory, Note, StandardTheory};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::census::NoteCensus;
use crate::config::{FailurePolicy, NormalizerConfig};
use crate::error::{NormalizeError, SongFailure};
use crate::key::{KeyEstimate, infer_key};
use crate::period::trim_section;
use crate::scale::ScaleTable;
use crate::song::{
    NormalizedSong, Section, SectionFailure, Song, base_label, canonical_label, join_progression,
};
use crate::stats;

/// Normalizes songs to C major.
#[derive(Debug, Clone)]
pub struct Normalizer<T: ChordTheory = StandardTheory> {
    config: NormalizerConfig,
    scales: Arc<ScaleTable>,
    theory: T,
}

impl Normalizer<StandardTheory> {
    /// Default config, the 17-root major table and the standard chord theory.
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    pub fn with_config(config: NormalizerConfig) -> Self {
        Normalizer::from_parts(config, Arc::new(ScaleTable::major()), StandardTheory::default())
    }
}

impl Default for Normalizer<StandardTheory> {
    fn default() -> Self {
        Self::new()
    }
}

/// A section after trimming, borrowed from its song.
struct TrimmedSection<'a> {
    label: &'a str,
    chords: &'a [String],
}

impl<T: ChordTheory> Normalizer<T> {
    pub fn from_parts(config: NormalizerConfig, scales: Arc<ScaleTable>, theory: T) -> Self {
        Normalizer {
            config,
            scales,
            theory,
        }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn scales(&self) -> &ScaleTable {
        &self.scales
    }

    /// Each section of `song` cut to its repeating unit, in song order.
    pub fn trimmed_sections<'a>(&self, song: &'a Song) -> Vec<(&'a str, &'a [String])> {
        self.trim(song)
            .into_iter()
            .map(|s| (s.label, s.chords))
            .collect()
    }

    fn trim<'a>(&self, song: &'a Song) -> Vec<TrimmedSection<'a>> {
        song.sections
            .iter()
            .map(|section: &'a Section| {
                let chords = trim_section(&section.chords, &self.config.segmentation);
                if chords.len() < section.chords.len() {
                    debug!(
                        section = %section.label,
                        from = section.chords.len(),
                        to = chords.len(),
                        "trimmed section"
                    );
                }
                TrimmedSection {
                    label: &section.label,
                    chords,
                }
            })
            .collect()
    }

    /// Infer the key of a song without rewriting it.
    pub fn infer(&self, song: &Song) -> Result<KeyEstimate, SongFailure> {
        song.validate().map_err(|e| SongFailure::new(song, e))?;
        let trimmed = self.trim(song);
        let (census, _, _) = self.take_census(song, &trimmed)?;
        self.key_for(song, &census)
    }

    /// Normalize one song.
    pub fn normalize(&self, song: &Song) -> Result<NormalizedSong, SongFailure> {
        song.validate().map_err(|e| SongFailure::new(song, e))?;
        let trimmed = self.trim(song);

        let simplicity = stats::simplicity(trimmed.iter().map(|s| s.chords.len()));
        let complexity = stats::complexity(
            trimmed
                .iter()
                .flat_map(|s| s.chords.iter().map(String::as_str)),
        );

        let (census, usable, mut failures) = self.take_census(song, &trimmed)?;
        let key = self.key_for(song, &census)?;

        let mut sections = BTreeMap::new();
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for section in usable {
            let joined = match self.rewrite(section.chords, key.interval) {
                Ok(joined) => joined,
                Err(source) => {
                    let error = NormalizeError::MalformedChordToken {
                        section: section.label.to_string(),
                        source,
                    };
                    self.handle_section_error(song, section.label, error, &mut failures)?;
                    continue;
                }
            };
            let label = canonical_label(section.label);
            groups
                .entry(base_label(&label))
                .or_default()
                .push(joined.clone());
            sections.insert(label, joined);
        }

        debug!(
            title = %song.title,
            root = %key.root,
            interval = key.interval,
            sections = sections.len(),
            "normalized song"
        );

        Ok(NormalizedSong {
            title: song.title.clone(),
            artist: song.artist.clone(),
            key,
            sections,
            groups,
            simplicity,
            complexity,
            failures,
        })
    }

    /// Count notes over every section that decomposes cleanly. Returns the
    /// census, the sections that made it in, and the ones that were skipped.
    fn take_census<'a>(
        &self,
        song: &Song,
        trimmed: &[TrimmedSection<'a>],
    ) -> Result<(NoteCensus, Vec<TrimmedSection<'a>>, Vec<SectionFailure>), SongFailure> {
        let mut census = NoteCensus::new();
        let mut usable = Vec::with_capacity(trimmed.len());
        let mut failures = Vec::new();

        for section in trimmed {
            match self.decompose_section(section.chords) {
                Ok(notes) => {
                    census.extend(notes);
                    usable.push(TrimmedSection {
                        label: section.label,
                        chords: section.chords,
                    });
                }
                Err(source) => {
                    let error = NormalizeError::MalformedChordToken {
                        section: section.label.to_string(),
                        source,
                    };
                    self.handle_section_error(song, section.label, error, &mut failures)?;
                }
            }
        }
        Ok((census, usable, failures))
    }

    fn key_for(&self, song: &Song, census: &NoteCensus) -> Result<KeyEstimate, SongFailure> {
        if census.is_empty() {
            return Ok(KeyEstimate::c_major());
        }
        let reduced = census.reduce(self.config.max_scale_notes);
        debug!(spellings = census.len(), kept = reduced.len(), "reduced note census");
        infer_key(&self.scales, &reduced).map_err(|e| SongFailure::new(song, e))
    }

    fn handle_section_error(
        &self,
        song: &Song,
        label: &str,
        error: NormalizeError,
        failures: &mut Vec<SectionFailure>,
    ) -> Result<(), SongFailure> {
        match self.config.failure_policy {
            FailurePolicy::AbortSong => Err(SongFailure::new(song, error)),
            FailurePolicy::SkipSection => {
                warn!(title = %song.title, section = label, %error, "skipping section");
                failures.push(SectionFailure {
                    label: label.to_string(),
                    reason: error.to_string(),
                });
                Ok(())
            }
        }
    }

    fn decompose_section(&self, chords: &[String]) -> Result<Vec<Note>, ChordError> {
        let mut notes = Vec::new();
        for chord in chords {
            notes.extend(self.theory.decompose(chord)?);
        }
        Ok(notes)
    }

    fn rewrite(&self, chords: &[String], interval: i8) -> Result<String, ChordError> {
        let transposed = chords
            .iter()
            .map(|c| self.theory.transpose(c, interval))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(join_progression(&transposed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(sections: &[(&str, &[&str])]) -> Song {
        Song::new(
            "Test",
            "Band",
            sections
                .iter()
                .map(|(label, chords)| Section::new(*label, chords.iter().copied()))
                .collect(),
        )
    }

    #[test]
    fn test_verse_chorus_in_c() {
        let input = song(&[
            ("Verse", &["Am", "F", "C", "G", "Am", "F", "C", "G", "D"]),
            ("Chorus", &["F", "C", "G", "Am"]),
        ]);
        let out = Normalizer::new().normalize(&input).unwrap();
        assert_eq!(out.key, KeyEstimate::c_major());
        assert_eq!(out.sections["V"], "Am-F-C-G");
        assert_eq!(out.sections["C"], "F-C-G-Am");
        assert_eq!(out.simplicity, 4.0);
        assert!(out.failures.is_empty());
    }

    #[test]
    fn test_song_in_g_moves_down_a_fifth() {
        let input = song(&[("Verse", &["G", "C", "D", "Em"]), ("Chorus", &["C", "G", "D", "G"])]);
        let out = Normalizer::new().normalize(&input).unwrap();
        assert_eq!(out.key.root, "G");
        assert_eq!(out.key.interval, -7);
        assert_eq!(out.sections["V"], "C-F-G-Am");
        assert_eq!(out.sections["C"], "F-C-G-C");
    }

    #[test]
    fn test_groups_collect_numbered_sections() {
        let input = song(&[
            ("Verse 1", &["C", "F"]),
            ("Chorus", &["G", "C"]),
            ("Verse 2", &["Am", "F"]),
        ]);
        let out = Normalizer::new().normalize(&input).unwrap();
        assert_eq!(out.sections["V1"], "C-F");
        assert_eq!(out.sections["V2"], "Am-F");
        assert_eq!(out.groups["V"], vec!["C-F".to_string(), "Am-F".to_string()]);
        assert_eq!(out.groups["C"], vec!["G-C".to_string()]);
    }

    #[test]
    fn test_malformed_chord_aborts_song_by_default() {
        let input = song(&[("Verse", &["C", "F", "G"]), ("Chorus", &["C", "Xq"])]);
        let err = Normalizer::new().normalize(&input).unwrap_err();
        assert_eq!(err.title, "Test");
        assert!(matches!(
            err.error,
            NormalizeError::MalformedChordToken { ref section, .. } if section == "Chorus"
        ));
    }

    #[test]
    fn test_skip_section_policy_keeps_the_rest() {
        let config = NormalizerConfig {
            failure_policy: FailurePolicy::SkipSection,
            ..Default::default()
        };
        let input = song(&[("Verse", &["D", "G", "A", "D"]), ("Chorus", &["D", "H7"])]);
        let out = Normalizer::with_config(config).normalize(&input).unwrap();
        assert_eq!(out.key.root, "D");
        assert_eq!(out.sections.len(), 1);
        assert_eq!(out.sections["V"], "C-F-G-C");
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].label, "Chorus");
    }

    #[test]
    fn test_empty_song_gives_nan_stats() {
        let input = song(&[("Verse", &[]), ("Chorus", &[])]);
        let out = Normalizer::new().normalize(&input).unwrap();
        assert!(out.simplicity.is_nan());
        assert!(out.complexity.is_nan());
        assert_eq!(out.key.interval, 0);
        assert_eq!(out.sections["V"], "");
    }

    #[test]
    fn test_duplicate_labels_fail() {
        let input = song(&[("Verse", &["C"]), ("Verse", &["G"])]);
        let err = Normalizer::new().normalize(&input).unwrap_err();
        assert_eq!(err.error, NormalizeError::DuplicateSection("Verse".to_string()));
    }

    #[test]
    fn test_infer_matches_normalize() {
        let input = song(&[("Verse", &["E", "A", "B", "C#m"])]);
        let normalizer = Normalizer::new();
        let key = normalizer.infer(&input).unwrap();
        assert_eq!(key, normalizer.normalize(&input).unwrap().key);
        assert_eq!(key.root, "E");
    }

    #[test]
    fn test_stats_use_trimmed_untransposed_chords() {
        let input = song(&[("Verse", &["Am7", "C", "G"])]);
        let out = Normalizer::new().normalize(&input).unwrap();
        assert!((out.complexity - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(out.simplicity, 3.0);
    }
}
