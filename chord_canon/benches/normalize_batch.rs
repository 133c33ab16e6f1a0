// Benchmarks for song normalization.
//
// `single_song` measures the per-song pipeline; `batch_1k` measures the
// rayon batch path over a thousand generated songs in rotating keys.

use chord_canon::batch::normalize_batch;
use chord_canon::normalize::Normalizer;
use chord_canon::song::{Section, Song};
use chord_canon_theory::StandardTheory;
use chord_canon_theory::theory::ChordTheory;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const VERSE: [&str; 9] = ["Am", "F", "C", "G", "Am", "F", "C", "G", "D"];
const CHORUS: [&str; 4] = ["F", "C", "G", "Am"];
const BRIDGE: [&str; 6] = ["Dm7", "G7", "Cmaj7", "Dm7", "G7", "Cmaj7"];

fn song_in(theory: &StandardTheory, shift: i8, n: usize) -> Song {
    let section = |label: &str, chords: &[&str]| {
        let moved: Vec<String> = chords
            .iter()
            .map(|c| theory.transpose(c, shift).unwrap_or_else(|_| c.to_string()))
            .collect();
        Section::new(label, moved)
    };
    Song::new(
        format!("Song {n}"),
        "Bench",
        vec![
            section("Verse", &VERSE),
            section("Chorus", &CHORUS),
            section("Bridge", &BRIDGE),
        ],
    )
}

fn bench_normalize(c: &mut Criterion) {
    let theory = StandardTheory::default();
    let normalizer = Normalizer::new();

    let one = song_in(&theory, 5, 0);
    c.bench_function("single_song", |b| {
        b.iter(|| normalizer.normalize(black_box(&one)))
    });

    let songs: Vec<Song> = (0..1000).map(|n| song_in(&theory, (n % 12) as i8, n)).collect();
    c.bench_function("batch_1k", |b| {
        b.iter(|| normalize_batch(&normalizer, black_box(&songs)))
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
