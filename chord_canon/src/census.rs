// Spelled-note census over a whole song.
//
// Counts how often each spelling appears across the notes of every chord in
// the song. Spellings are counted as written ("C#" and "Db" are separate
// entries) and kept in first-seen order; that order is the tie-break for both
// the reduction below and the frequency ranking used by key inference.
//
// Reduction drops the least frequent spelling, one at a time, until at most
// `max_notes` remain. Exactly one minimum goes per pass; among equal minimums
// the earliest first-seen spelling goes first.

use chord_canon_theory::Note;
use rustc_hash::FxHashMap;

/// How often a spelling occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteCount {
    pub name: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NoteCensus {
    counts: Vec<NoteCount>,
    index: FxHashMap<&'static str, usize>,
}

impl NoteCensus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, note: Note) {
        match self.index.get(note.name) {
            Some(&i) => self.counts[i].count += 1,
            None => {
                self.index.insert(note.name, self.counts.len());
                self.counts.push(NoteCount {
                    name: note.name,
                    count: 1,
                });
            }
        }
    }

    pub fn extend(&mut self, notes: impl IntoIterator<Item = Note>) {
        for note in notes {
            self.add(note);
        }
    }

    /// Counts in first-seen order.
    pub fn counts(&self) -> &[NoteCount] {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct spellings seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Discard minimum-count spellings one per pass until at most
    /// `max_notes` remain. Survivors keep first-seen order.
    pub fn reduce(&self, max_notes: usize) -> Vec<NoteCount> {
        let mut kept = self.counts.clone();
        while kept.len() > max_notes {
            // min_by_key returns the first of several equal minimums.
            let Some((pos, _)) = kept.iter().enumerate().min_by_key(|(_, n)| n.count) else {
                break;
            };
            kept.remove(pos);
        }
        kept
    }
}

/// `notes` ordered by descending count; equal counts keep their order.
pub fn by_frequency(notes: &[NoteCount]) -> Vec<NoteCount> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted
}
