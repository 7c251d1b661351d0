//! # Key Transform
//!
//! Moving chords between keys, and labelling concrete chords with roman degrees.
//!
//! - [`semitone_distance`] - signed shortest distance between two tonics, in `[-6, 6]`
//! - [`transpose_chord`] - shift root and bass, keeping the chord kind
//! - [`transpose_to_key`] - shift from one key to another, spelled for the target key
//! - [`degree_for_chord`] - display label such as `V7`, `ii7`, `bVII`, `viiø7`
//! - [`format_symbol`] - `root + suffix [/bass]`
//!
//! ## Example
//! ```rust
//! use chordflow::{degree_for_chord, resolve_roman, transpose_to_key, KeySpec};
//!
//! let c: KeySpec = "C".parse().unwrap();
//! let eb: KeySpec = "Eb".parse().unwrap();
//!
//! let v7 = resolve_roman("V7", &c).unwrap();
//! assert_eq!(degree_for_chord(&v7, &c), "V7");
//!
//! let moved = transpose_to_key(&v7, &c, &eb);
//! assert_eq!(moved.to_string(), "Bb7");
//! assert_eq!(degree_for_chord(&moved, &eb), "V7");
//! ```

use crate::chord::{parse_symbol, ChordKind, ChordQuality, ChordSymbol};
use crate::key::KeySpec;
use crate::normalize::normalize;
use crate::pitch::PitchClass;

/// Roman degree for each semitone above the tonic. The tritone is deliberately
/// labelled both ways.
const DEGREE_LABELS: [&str; 12] = [
    "I", "bII", "II", "bIII", "III", "IV", "#IV/bV", "V", "bVI", "VI", "bVII", "VII",
];

/// Signed minimal distance from `from` to `to`, folded into `[-6, 6]`.
///
/// Both tonics are placed in the same octave, so the raw difference lies in
/// `-11..=11`; it is folded towards zero, which keeps the function antisymmetric
/// (`C→F#` is `+6`, `F#→C` is `-6`).
pub fn semitone_distance(from: PitchClass, to: PitchClass) -> i8 {
    let diff = (to.semitone() as i8 - from.semitone() as i8) % 12;
    if diff > 6 {
        diff - 12
    } else if diff < -6 {
        diff + 12
    } else {
        diff
    }
}

/// Shift a chord's root (and bass) by `semitones`. The kind is unchanged.
/// Flat spellings are used unless the root was spelled with a sharp.
pub fn transpose_chord(chord: &ChordSymbol, semitones: i32) -> ChordSymbol {
    let prefer_flats = !chord.root.is_sharp();
    ChordSymbol {
        root: chord.root.transpose(semitones, prefer_flats),
        kind: chord.kind,
        bass: chord.bass.map(|bass| bass.transpose(semitones, prefer_flats)),
    }
}

/// Parse and transpose a chord symbol. `None` when the symbol does not resolve.
pub fn transpose_symbol(symbol: &str, semitones: i32) -> Option<ChordSymbol> {
    let chord = parse_symbol(&normalize(symbol))?;
    Some(transpose_chord(&chord, semitones))
}

/// Move a chord from one key to another along the shorter direction, spelling
/// the result the way the target key prefers.
pub fn transpose_to_key(chord: &ChordSymbol, from: &KeySpec, to: &KeySpec) -> ChordSymbol {
    let semitones = semitone_distance(from.tonic, to.tonic) as i32;
    let prefer_flats = to.prefers_flats();
    ChordSymbol {
        root: chord.root.transpose(semitones, prefer_flats),
        kind: chord.kind,
        bass: chord.bass.map(|bass| bass.transpose(semitones, prefer_flats)),
    }
}

/// Display label for a chord relative to a key.
///
/// This is a display heuristic, not functional analysis: the numeral comes from
/// the root's distance above the tonic, its case from the chord quality, and a
/// short suffix from the extension.
pub fn degree_for_chord(chord: &ChordSymbol, key: &KeySpec) -> String {
    let interval = (chord.root.semitone() as i32 - key.tonic.semitone() as i32).rem_euclid(12);
    let label = DEGREE_LABELS[interval as usize];

    let numeral = match chord.quality() {
        ChordQuality::Minor | ChordQuality::HalfDiminished => label.to_lowercase(),
        ChordQuality::Diminished => format!("{}°", label.to_lowercase()),
        ChordQuality::Augmented => format!("{}+", label),
        _ => label.to_string(),
    };

    format!("{}{}", numeral, degree_suffix(chord.kind))
}

/// Precedence: maj7, half-diminished, m7, bare 7, sus.
fn degree_suffix(kind: ChordKind) -> &'static str {
    match kind {
        ChordKind::Major7 | ChordKind::MinorMajor7 => "maj7",
        ChordKind::HalfDiminished7 => "ø7",
        ChordKind::Minor7 => "7",
        ChordKind::Dominant7
        | ChordKind::Diminished7
        | ChordKind::Augmented7
        | ChordKind::Dominant7Sus4
        | ChordKind::Dominant7Flat9
        | ChordKind::Dominant7Sharp9
        | ChordKind::Dominant7Flat5
        | ChordKind::Dominant7Sharp11
        | ChordKind::Altered => "7",
        ChordKind::Sus2 | ChordKind::Sus4 => "sus",
        _ => "",
    }
}

/// `root + suffix`, with `/bass` when present.
pub fn format_symbol(chord: &ChordSymbol) -> String {
    chord.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::resolve_roman;

    fn pc(s: &str) -> PitchClass {
        s.parse().unwrap()
    }

    fn chord(s: &str) -> ChordSymbol {
        s.parse().unwrap()
    }

    fn key(s: &str) -> KeySpec {
        s.parse().unwrap()
    }

    #[test]
    fn test_semitone_distance_is_antisymmetric_and_bounded() {
        for a in KeySpec::tonics() {
            for b in KeySpec::tonics() {
                let d = semitone_distance(a, b);
                assert!((-6..=6).contains(&d), "{} -> {} = {}", a, b, d);
                assert_eq!(d, -semitone_distance(b, a), "{} <-> {}", a, b);
            }
        }
    }

    #[test]
    fn test_semitone_distance_picks_shorter_direction() {
        assert_eq!(semitone_distance(pc("C"), pc("G")), -5);
        assert_eq!(semitone_distance(pc("C"), pc("F")), 5);
        assert_eq!(semitone_distance(pc("C"), pc("Bb")), -2);
        assert_eq!(semitone_distance(pc("B"), pc("C")), 1);
        assert_eq!(semitone_distance(pc("C"), pc("Gb")), 6);
        assert_eq!(semitone_distance(pc("Gb"), pc("C")), -6);
        assert_eq!(semitone_distance(pc("E"), pc("E")), 0);
    }

    #[test]
    fn test_transpose_round_trip() {
        for text in ["C", "Dm7", "G7/B", "F#m7b5", "Bbmaj7", "Ebdim7/A", "Asus4"] {
            let original = chord(text);
            for s in -13..=13 {
                let back = transpose_chord(&transpose_chord(&original, s), -s);
                assert_eq!(back, original, "{} by {}", text, s);
                assert_eq!(back.bass, original.bass);
                assert_eq!(back.kind, original.kind);
            }
        }
    }

    #[test]
    fn test_transpose_preserves_kind_and_bass() {
        let moved = transpose_chord(&chord("Am7/G"), 3);
        assert_eq!(moved.to_string(), "Cm7/Bb");
        let sharp = transpose_chord(&chord("F#m"), 1);
        assert_eq!(sharp.to_string(), "Gm");
        let sharp = transpose_chord(&chord("F#m"), 2);
        assert_eq!(sharp.to_string(), "G#m");
    }

    #[test]
    fn test_transpose_symbol() {
        assert_eq!(transpose_symbol("C7", 2).map(|c| c.to_string()), Some("D7".to_string()));
        assert_eq!(transpose_symbol("B♭m7", -2).map(|c| c.to_string()), Some("Abm7".to_string()));
        assert!(transpose_symbol("Xyz", 2).is_none());
        assert!(transpose_symbol("C/Q", 2).is_none());
    }

    #[test]
    fn test_transpose_to_key_spelling() {
        let c = key("C");
        let moved = transpose_to_key(&chord("Dm7"), &c, &key("E"));
        assert_eq!(moved.to_string(), "F#m7");
        let moved = transpose_to_key(&chord("Dm7"), &c, &key("Ab"));
        assert_eq!(moved.to_string(), "Bbm7");
    }

    #[test]
    fn test_degree_labels() {
        let c = key("C");
        assert_eq!(degree_for_chord(&chord("G7"), &c), "V7");
        assert_eq!(degree_for_chord(&chord("Dm7"), &c), "ii7");
        assert_eq!(degree_for_chord(&chord("Cmaj7"), &c), "Imaj7");
        assert_eq!(degree_for_chord(&chord("Bm7b5"), &c), "viiø7");
        assert_eq!(degree_for_chord(&chord("Bdim7"), &c), "vii°7");
        assert_eq!(degree_for_chord(&chord("Bdim"), &c), "vii°");
        assert_eq!(degree_for_chord(&chord("Eaug"), &c), "III+");
        assert_eq!(degree_for_chord(&chord("Bb"), &c), "bVII");
        assert_eq!(degree_for_chord(&chord("Gsus4"), &c), "Vsus");
        assert_eq!(degree_for_chord(&chord("F#"), &c), "#IV/bV");
        assert_eq!(degree_for_chord(&chord("Gbm"), &c), "#iv/bv");
        assert_eq!(degree_for_chord(&chord("Am"), &key("Am")), "i");
    }

    #[test]
    fn test_degree_inverts_roman_resolution() {
        let c = key("C");
        let v7 = resolve_roman("V7", &c).unwrap();
        let label = degree_for_chord(&v7, &c);
        assert!(label.contains('V'));
        assert!(label.ends_with('7'));

        let bb = key("Bb");
        for (roman, expected) in [("ii", "ii7"), ("V", "V7"), ("I", "Imaj7"), ("IV", "IV"), ("vi", "vi")] {
            let chord = resolve_roman(roman, &bb).unwrap();
            assert_eq!(degree_for_chord(&chord, &bb), expected);
        }
    }

    #[test]
    fn test_format_symbol() {
        assert_eq!(format_symbol(&chord("G7/B")), "G7/B");
        assert_eq!(format_symbol(&chord("C")), "C");
    }
}
