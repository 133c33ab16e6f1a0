// Song, section and normalized-output types, plus section-label handling.
//
// A `Song` is what the extraction step hands over: an ordered list of labeled
// sections, each an ordered list of raw chord tokens. Section order is kept
// because it fixes the first-seen order of notes in the census.
//
// Labels are canonicalized for output: intros and interludes keep their first
// five letters ("Intro", "Inter"), everything else collapses to its initial
// plus any trailing number ("Chorus 2" -> "C2", "Verse" -> "V"). The base
// label drops the number, grouping every chorus under "C".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::NormalizeError;
use crate::key::KeyEstimate;

/// One labeled run of chord tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub label: String,
    pub chords: Vec<String>,
}

impl Section {
    pub fn new(
        label: impl Into<String>,
        chords: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Section {
            label: label.into(),
            chords: chords.into_iter().map(Into::into).collect(),
        }
    }
}

/// A song as extracted from a tab sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub sections: Vec<Section>,
}

impl Song {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        sections: Vec<Section>,
    ) -> Self {
        Song {
            title: title.into(),
            artist: artist.into(),
            sections,
        }
    }

    /// Build a song from raw `(label, tokens)` pairs in sheet order.
    ///
    /// Tab sheets reuse labels ("Chorus" three times). A label that occurs
    /// more than once gets its occurrence number appended: "Chorus 1",
    /// "Chorus 2", ... Labels that occur once are left alone.
    pub fn from_raw_sections(
        title: impl Into<String>,
        artist: impl Into<String>,
        raw: Vec<(String, Vec<String>)>,
    ) -> Self {
        let mut totals: BTreeMap<String, usize> = BTreeMap::new();
        for (label, _) in &raw {
            *totals.entry(label.clone()).or_default() += 1;
        }

        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let sections = raw
            .into_iter()
            .map(|(label, chords)| {
                let occurrence = seen.entry(label.clone()).or_default();
                *occurrence += 1;
                let label = if totals[&label] > 1 {
                    format!("{label} {occurrence}")
                } else {
                    label
                };
                Section { label, chords }
            })
            .collect();

        Song::new(title, artist, sections)
    }

    /// Reject songs whose section labels are not unique.
    pub fn validate(&self) -> Result<(), NormalizeError> {
        for (i, section) in self.sections.iter().enumerate() {
            if self.sections[..i].iter().any(|s| s.label == section.label) {
                return Err(NormalizeError::DuplicateSection(section.label.clone()));
            }
        }
        Ok(())
    }
}

/// A section dropped under `FailurePolicy::SkipSection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFailure {
    pub label: String,
    pub reason: String,
}

/// A song transposed to C major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSong {
    pub title: String,
    pub artist: String,
    pub key: KeyEstimate,
    /// Canonical label -> "-"-joined transposed chords.
    pub sections: BTreeMap<String, String>,
    /// Base label -> every section under it, in song order.
    pub groups: BTreeMap<String, Vec<String>>,
    /// Mean chords per non-empty section; NaN when every section is empty.
    #[serde(with = "nan_as_null")]
    pub simplicity: f64,
    /// Mean core-letter length of chord names; NaN when there are no chords.
    #[serde(with = "nan_as_null")]
    pub complexity: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SectionFailure>,
}

impl NormalizedSong {
    /// The transposed chords of a canonical section, split back into tokens.
    pub fn chords(&self, label: &str) -> Option<Vec<&str>> {
        self.sections.get(label).map(|joined| split_progression(joined))
    }

    /// Rebuild a `Song` from the normalized output, one section per canonical
    /// label.
    pub fn to_song(&self) -> Song {
        let sections = self
            .sections
            .iter()
            .map(|(label, joined)| Section::new(label.clone(), split_progression(joined)))
            .collect();
        Song::new(self.title.clone(), self.artist.clone(), sections)
    }
}

// Custom serde for the statistics: JSON has no NaN, so serde_json writes it
// as `null`. Map `null` back to NaN so normalized output reads back in.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

/// Join chords the way normalized output stores them.
pub fn join_progression<S: AsRef<str>>(chords: &[S]) -> String {
    chords.iter().map(|c| c.as_ref()).collect::<Vec<&str>>().join("-")
}

/// Split a joined progression. An empty string has no chords.
pub fn split_progression(joined: &str) -> Vec<&str> {
    if joined.is_empty() {
        Vec::new()
    } else {
        joined.split('-').collect()
    }
}

/// Canonical output label for a section.
pub fn canonical_label(label: &str) -> String {
    let mut chars = label.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    if first == 'I' {
        let head: String = label.chars().take(5).collect();
        return capitalize(&head);
    }

    let digits: Vec<char> = label
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect();
    let mut canonical = String::with_capacity(1 + digits.len());
    canonical.push(first);
    canonical.extend(digits.into_iter().rev());
    canonical
}

/// The label with every digit removed.
pub fn base_label(canonical: &str) -> String {
    canonical.chars().filter(|c| !c.is_ascii_digit()).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_labels() {
        assert_eq!(canonical_label("Chorus 2"), "C2");
        assert_eq!(canonical_label("Verse"), "V");
        assert_eq!(canonical_label("Verse 10"), "V10");
        assert_eq!(canonical_label("Pre-Chorus"), "P");
        assert_eq!(canonical_label("Intro"), "Intro");
        assert_eq!(canonical_label("INTRO 2"), "Intro");
        assert_eq!(canonical_label("Interlude"), "Inter");
        assert_eq!(canonical_label("Instrumental 3"), "Instr");
        assert_eq!(canonical_label(""), "");
    }

    #[test]
    fn test_base_labels() {
        assert_eq!(base_label("C2"), "C");
        assert_eq!(base_label("V"), "V");
        assert_eq!(base_label("V10"), "V");
        assert_eq!(base_label("Intro"), "Intro");
    }

    #[test]
    fn test_from_raw_sections_numbers_repeats() {
        let raw = vec![
            ("Verse".to_string(), vec!["C".to_string()]),
            ("Chorus".to_string(), vec!["F".to_string()]),
            ("Verse".to_string(), vec!["G".to_string()]),
            ("Bridge".to_string(), vec![]),
            ("Verse".to_string(), vec!["Am".to_string()]),
        ];
        let song = Song::from_raw_sections("t", "a", raw);
        let labels: Vec<_> = song.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Verse 1", "Chorus", "Verse 2", "Bridge", "Verse 3"]);
        assert!(song.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let song = Song::new(
            "t",
            "a",
            vec![Section::new("Verse", ["C"]), Section::new("Verse", ["G"])],
        );
        assert_eq!(
            song.validate(),
            Err(NormalizeError::DuplicateSection("Verse".to_string()))
        );
    }

    #[test]
    fn test_progression_join_split() {
        let chords = ["Am", "F", "C/E", "G"];
        let joined = join_progression(&chords);
        assert_eq!(joined, "Am-F-C/E-G");
        assert_eq!(split_progression(&joined), chords.to_vec());
        assert!(split_progression("").is_empty());
    }

    #[test]
    fn test_nan_statistics_survive_json() {
        let empty = NormalizedSong {
            title: "Silence".to_string(),
            artist: "Band".to_string(),
            key: KeyEstimate::c_major(),
            sections: BTreeMap::from([("V".to_string(), String::new())]),
            groups: BTreeMap::from([("V".to_string(), vec![String::new()])]),
            simplicity: f64::NAN,
            complexity: f64::NAN,
            failures: Vec::new(),
        };
        let json = serde_json::to_value(&empty).unwrap();
        assert!(json["simplicity"].is_null());
        assert!(json["complexity"].is_null());

        let back: NormalizedSong = serde_json::from_value(json).unwrap();
        assert!(back.simplicity.is_nan());
        assert!(back.complexity.is_nan());
        assert_eq!(back.sections, empty.sections);
        assert_eq!(back.key, empty.key);
    }

    #[test]
    fn test_finite_statistics_stay_numbers() {
        let text = r#"{
            "title": "t",
            "artist": "a",
            "key": {"root": "G", "pitch_class": 7, "interval": -7},
            "sections": {"V": "C-F"},
            "groups": {"V": ["C-F"]},
            "simplicity": 2.0,
            "complexity": 1.0
        }"#;
        let song: NormalizedSong = serde_json::from_str(text).unwrap();
        assert_eq!(song.simplicity, 2.0);
        assert_eq!(song.key.interval, -7);
        assert!(song.failures.is_empty());
        assert_eq!(serde_json::to_value(&song).unwrap()["simplicity"], 2.0);
    }

    #[test]
    fn test_hyphenated_qualities_collide_with_the_joiner() {
        // "A-" (minor) and "G7-5" contain the joiner, so they come back in pieces.
        let joined = join_progression(&["A-", "G7-5"]);
        assert_eq!(joined, "A--G7-5");
        assert_eq!(split_progression(&joined), vec!["A", "", "G7", "5"]);
    }

    #[test]
    fn test_song_json_shape() {
        let json = r#"{
            "title": "Song",
            "artist": "Band",
            "sections": [
                {"label": "Verse", "chords": ["Am", "F"]},
                {"label": "Chorus", "chords": ["C", "G"]}
            ]
        }"#;
        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.sections.len(), 2);
        assert_eq!(song.sections[1], Section::new("Chorus", ["C", "G"]));
    }
}
