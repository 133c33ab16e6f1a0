// The major-scale lookup table used for key inference.
//
// Maps each of the 17 root spellings a tab is likely to use to every spelling
// of its scale's seven pitch classes, so a song spelled with "Db" matches the
// same scales as one spelled with "C#". Because membership is generated from
// pitch classes, enharmonic roots ("C#"/"Db") always get identical sets.
//
// The table is built once and handed to the normalizer as a read-only value;
// nothing mutates it after construction. Root order matters: candidates come
// out in table order, and when the song's notes don't settle a tie the
// earlier root wins.

use chord_canon_theory::{Note, PitchClass};
use std::collections::BTreeSet;

/// Major-scale intervals above the tonic.
pub const MAJOR_INTERVALS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// The 17 root spellings of the default table, in scan order.
pub const MAJOR_ROOTS: [&str; 17] = [
    "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab", "A", "A#", "Bb", "B",
];

/// One root and every spelling of its scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    pub root: Note,
    members: BTreeSet<&'static str>,
}

impl Scale {
    /// The major scale on `root`.
    pub fn major(root: Note) -> Self {
        let members = MAJOR_INTERVALS
            .iter()
            .map(|&iv| root.pitch_class.transpose(iv as i8))
            .flat_map(PitchClass::spellings)
            .copied()
            .collect();
        Scale { root, members }
    }

    /// Whether `spelling` names a pitch in this scale.
    pub fn contains(&self, spelling: &str) -> bool {
        self.members.contains(spelling)
    }

    /// How many of `spellings` fall outside the scale.
    pub fn missing<'a>(&self, spellings: impl IntoIterator<Item = &'a str>) -> usize {
        spellings.into_iter().filter(|s| !self.contains(s)).count()
    }
}

/// Immutable root → scale table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleTable {
    scales: Vec<Scale>,
}

impl ScaleTable {
    /// The default table: major scales on all 17 roots of `MAJOR_ROOTS`.
    pub fn major() -> Self {
        let scales = MAJOR_ROOTS
            .iter()
            .filter_map(|root| Note::parse(root))
            .map(Scale::major)
            .collect();
        ScaleTable { scales }
    }

    /// A table over an arbitrary set of scales, scanned in the given order.
    pub fn from_scales(scales: Vec<Scale>) -> Self {
        ScaleTable { scales }
    }

    pub fn scales(&self) -> &[Scale] {
        &self.scales
    }

    pub fn get(&self, root: &str) -> Option<&Scale> {
        self.scales.iter().find(|s| s.root.name == root)
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }
}

impl Default for ScaleTable {
    fn default() -> Self {
        ScaleTable::major()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_all_roots() {
        let table = ScaleTable::major();
        assert_eq!(table.len(), 17);
        for root in MAJOR_ROOTS {
            assert!(table.get(root).is_some(), "missing {root}");
        }
    }

    #[test]
    fn test_c_major_members() {
        let table = ScaleTable::major();
        let c = table.get("C").unwrap();
        for name in ["C", "D", "E", "F", "G", "A", "B"] {
            assert!(c.contains(name));
        }
        for name in ["C#", "Db", "Eb", "F#", "Ab", "Bb"] {
            assert!(!c.contains(name));
        }
    }

    #[test]
    fn test_enharmonic_roots_share_scales() {
        let table = ScaleTable::major();
        for (a, b) in [("C#", "Db"), ("D#", "Eb"), ("F#", "Gb"), ("G#", "Ab"), ("A#", "Bb")] {
            let (sa, sb) = (table.get(a).unwrap(), table.get(b).unwrap());
            for pc in 0..12 {
                for &name in PitchClass::new(pc).spellings() {
                    assert_eq!(sa.contains(name), sb.contains(name), "{a} vs {b} on {name}");
                }
            }
        }
    }

    #[test]
    fn test_scale_accepts_either_spelling() {
        let table = ScaleTable::major();
        let d = table.get("D").unwrap();
        assert!(d.contains("F#"));
        assert!(d.contains("Gb"));
        assert!(d.contains("C#"));
        assert!(d.contains("Db"));
        assert!(!d.contains("F"));
        assert_eq!(d.missing(["D", "F", "A", "C"]), 2);
    }
}
