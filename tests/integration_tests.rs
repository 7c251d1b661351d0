//! Integration tests for chordflow
//!
//! Tests the full pipeline from free text or a progression document to voiced,
//! labelled steps.

use chordflow::voicing::close_stack;
use chordflow::{
    degree_for_chord, parse_chord_tokens, parse_roman_tokens, render, resolve_roman, select_playable,
    semitone_distance, to_musicxml, transpose_chord, voice_chord, voice_progression, ChordSymbol, ItemStatus,
    KeySpec, Pitch, PitchRange, VoicingOptions, VoicingResult,
};

fn c_major() -> KeySpec {
    "C".parse().unwrap()
}

#[test]
fn test_chord_tokens_classification() {
    let items = parse_chord_tokens("Fmaj7 E7 Am7 Dm7 G7");
    assert_eq!(items.len(), 5);
    assert!(items.iter().all(|i| i.status == ItemStatus::Ok), "all five chords should resolve");

    let items = parse_chord_tokens("Xyz123");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, ItemStatus::Error);

    let items = parse_chord_tokens("-");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, ItemStatus::Rest);
}

#[test]
fn test_roman_shorthand_expands() {
    let items = parse_roman_tokens("251", &c_major());
    let chords: Vec<ChordSymbol> = select_playable(&items);
    let expected: Vec<ChordSymbol> = ["Dm7", "G7", "Cmaj7"].iter().map(|c| c.parse().unwrap()).collect();
    assert_eq!(chords, expected);

    let labels: Vec<&str> = items.iter().filter_map(|i| i.degree.as_deref()).collect();
    assert_eq!(labels, vec!["ii", "V7", "Imaj7"]);
}

#[test]
fn test_degree_inverts_roman_resolution() {
    let key = c_major();
    let v7 = resolve_roman("V7", &key).expect("V7 resolves in C");
    let label = degree_for_chord(&v7, &key);
    assert!(label.contains('V'), "label was {}", label);
    assert!(label.ends_with('7'), "label was {}", label);
}

#[test]
fn test_semitone_distance_properties() {
    for a in KeySpec::tonics() {
        for b in KeySpec::tonics() {
            let d = semitone_distance(a, b);
            assert!((-6..=6).contains(&d));
            assert_eq!(d, -semitone_distance(b, a));
        }
    }
}

#[test]
fn test_transpose_round_trip_for_every_kind() {
    for kind in chordflow::ChordKind::ALL {
        for root in KeySpec::tonics() {
            let chord = ChordSymbol::new(root, kind);
            for s in [-7, -1, 1, 5, 12, 19] {
                assert_eq!(transpose_chord(&transpose_chord(&chord, s), -s), chord, "{} by {}", chord, s);
            }
        }
    }
}

#[test]
fn test_voicing_respects_count_range_and_order() {
    let chords = select_playable(&parse_chord_tokens("C Am7 Dm7 G7 Em7b5 A7b9 Dm9 G13 Cmaj9 F#dim7 Bbmaj7/D"));
    for voice_count in 1..=4 {
        let options = VoicingOptions { voice_count, ..VoicingOptions::default() };
        for voicing in voice_progression(&chords, 4, &options) {
            assert_eq!(voicing.len(), voice_count);
            assert!(voicing.pitches.windows(2).all(|w| w[0] <= w[1]));
            assert!(voicing.pitches.iter().all(|p| options.range.contains(*p)), "{:?}", voicing.pitches);
        }
    }
}

#[test]
fn test_voicing_is_deterministic() {
    let options = VoicingOptions::default();
    let chord: ChordSymbol = "G7".parse().unwrap();
    let previous = voice_chord(&"Dm7".parse().unwrap(), 4, None, &options);
    assert_eq!(
        voice_chord(&chord, 4, Some(&previous), &options),
        voice_chord(&chord, 4, Some(&previous), &options)
    );
}

#[test]
fn test_voice_leading_beats_naive_placement() {
    // Cmaj7 -> Am7 share C, E and G
    let options = VoicingOptions::default();
    let first_chord: ChordSymbol = "Cmaj7".parse().unwrap();
    let second_chord: ChordSymbol = "Am7".parse().unwrap();

    let first = voice_chord(&first_chord, 4, None, &options);
    let led = voice_chord(&second_chord, 4, Some(&first), &options);
    let naive = close_stack(&second_chord, 4, &options);

    let shared_distance = |to: &VoicingResult| -> i32 {
        ["C", "E", "G"]
            .iter()
            .map(|name| {
                let pc: chordflow::PitchClass = name.parse().unwrap();
                let find = |v: &VoicingResult| {
                    v.pitches
                        .iter()
                        .find(|p| p.pitch_class() == pc.semitone())
                        .map(|p| p.midi())
                        .unwrap()
                };
                (find(to) - find(&first)).abs()
            })
            .sum()
    };
    let total_distance = |to: &VoicingResult| -> i32 {
        to.pitches.iter().zip(&first.pitches).map(|(a, b)| (a.midi() - b.midi()).abs()).sum()
    };

    assert!(shared_distance(&led) <= shared_distance(&naive));
    assert!(total_distance(&led) <= total_distance(&naive));
    assert_eq!(total_distance(&led), 8);
}

#[test]
fn test_custom_range() {
    let options = VoicingOptions {
        range: PitchRange::new(Pitch::from_midi(55), Pitch::from_midi(79)),
        ..VoicingOptions::default()
    };
    let voicing = voice_chord(&"Cmaj7".parse().unwrap(), 4, None, &options);
    assert!(voicing.pitches.iter().all(|p| (55..=79).contains(&p.midi())), "{:?}", voicing.pitches);
}

#[test]
fn test_render_document_end_to_end() {
    let source = r#"---
title: Autumn Turnaround
key: C
input: roman
transpose: Bb
voicing:
  voice-count: 4
  low: C3
  high: C6
---
251 | vi - IV
"#;
    let data = render(source).expect("document should render");
    assert_eq!(data.title.as_deref(), Some("Autumn Turnaround"));
    assert_eq!(data.key.to_string(), "Bb major");

    let chords: Vec<String> = data.chords().iter().map(|c| c.to_string()).collect();
    assert_eq!(chords, vec!["Cm7", "F7", "Bbmaj7", "Gm", "Eb"]);

    let rest = data.steps.iter().find(|s| s.item.status == ItemStatus::Rest).expect("rest step");
    assert!(rest.voicing.is_empty());
    assert!(data.voicings().iter().all(|v| v.len() == 4));

    let xml = to_musicxml(&data);
    assert!(xml.contains("<work-title>Autumn Turnaround</work-title>"));
    assert_eq!(xml.matches("<measure ").count(), data.steps.len());
}

#[test]
fn test_render_json_shape() {
    let data = render("C/E Xyz").unwrap();
    let json = serde_json::to_value(&data).unwrap();
    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["item"]["status"], "ok");
    assert_eq!(steps[0]["chord"]["bass"], "E");
    assert_eq!(steps[0]["voicing"]["pitches"].as_array().unwrap().len(), 4);
    assert_eq!(steps[1]["item"]["status"], "error");
    assert!(steps[1]["chord"].is_null());
}
