use super::engine::extract_metadata;
use super::*;
use crate::error::ChordflowError;
use crate::key::KeyMode;
use crate::lexer::InputKind;
use crate::parser::ItemStatus;
use crate::voicing::voice_chord;
use pretty_assertions::assert_eq;

fn symbols(data: &ProgressionData) -> Vec<String> {
    data.chords().iter().map(|c| c.to_string()).collect()
}

#[test]
fn test_extract_metadata() {
    let (metadata, body) = extract_metadata("---\ntitle: Blues\n---\nC7 F7");
    assert_eq!(metadata.as_deref(), Some("title: Blues"));
    assert_eq!(body, "C7 F7");

    let (metadata, body) = extract_metadata("C F G");
    assert!(metadata.is_none());
    assert_eq!(body, "C F G");

    // a single marker is not a block
    let (metadata, _) = extract_metadata("---\nC F G");
    assert!(metadata.is_none());
}

#[test]
fn test_render_without_frontmatter() {
    let data = render("Fmaj7 E7 Am7 Dm7 G7").unwrap();
    assert_eq!(data.input, InputKind::Chord);
    assert_eq!(data.center_register, 4);
    assert_eq!(data.steps.len(), 5);
    assert!(!data.is_transposed());

    for (i, step) in data.steps.iter().enumerate() {
        assert_eq!(step.index, i);
        assert_eq!(step.voicing.len(), 4, "step {}", i);
    }
    assert_eq!(symbols(&data), vec!["Fmaj7", "E7", "Am7", "Dm7", "G7"]);
}

#[test]
fn test_labels_and_degrees() {
    let data = render("---\nkey: C\n---\nDm7 G7 Cmaj7").unwrap();
    let labels: Vec<&str> = data.steps.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Dm7", "G7", "Cmaj7"]);
    let degrees: Vec<Option<&str>> = data.steps.iter().map(|s| s.degree.as_deref()).collect();
    assert_eq!(degrees, vec![Some("ii7"), Some("V7"), Some("Imaj7")]);

    let data = render("---\nkey: C\ninput: roman\n---\nii V I").unwrap();
    let labels: Vec<&str> = data.steps.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["ii", "V", "I"]);
    assert_eq!(symbols(&data), vec!["Dm7", "G7", "Cmaj7"]);
}

#[test]
fn test_rest_and_error_do_not_advance_voice_leading() {
    let data = render("C - Xyz C").unwrap();
    assert_eq!(data.steps.len(), 4);
    assert_eq!(data.steps[1].item.status, ItemStatus::Rest);
    assert_eq!(data.steps[2].item.status, ItemStatus::Error);
    assert_eq!(data.steps[2].label, "Xyz");
    assert!(data.steps[1].voicing.is_empty());
    assert!(data.steps[2].voicing.is_empty());
    assert!(data.steps[2].chord.is_none());

    let chord = data.steps[3].chord.unwrap();
    let expected = voice_chord(&chord, 4, Some(&data.steps[0].voicing), &Metadata::default().voicing);
    assert_eq!(data.steps[3].voicing, expected);
    assert_eq!(data.voicings().len(), 2);
}

#[test]
fn test_transpose_to_target_key() {
    let data = render("---\nkey: C\ntranspose: Eb\n---\nDm7 G7 Cmaj7").unwrap();
    assert!(data.is_transposed());
    assert_eq!(data.key.to_string(), "Eb major");
    assert_eq!(data.source_key.to_string(), "C major");
    assert_eq!(symbols(&data), vec!["Fm7", "Bb7", "Ebmaj7"]);

    // the degree labels survive the move
    let degrees: Vec<Option<&str>> = data.steps.iter().map(|s| s.degree.as_deref()).collect();
    assert_eq!(degrees, vec![Some("ii7"), Some("V7"), Some("Imaj7")]);
    // the parsed item keeps the chord as written
    assert_eq!(data.steps[0].item.chord.map(|c| c.to_string()), Some("Dm7".to_string()));
}

#[test]
fn test_metadata_fields() {
    let content = "title: Autumn\nkey: G\nmode: minor\ninput: roman\ncenter-register: 3\nvoicing:\n  voice-count: 3\n  low: C2\n  include-bass: false";
    let metadata = parse_metadata(content).unwrap();
    assert_eq!(metadata.title.as_deref(), Some("Autumn"));
    assert_eq!(metadata.key.tonic.to_string(), "G");
    assert_eq!(metadata.key.mode, KeyMode::Minor);
    assert_eq!(metadata.input, InputKind::Roman);
    assert_eq!(metadata.center_register, 3);
    assert_eq!(metadata.voicing.voice_count, 3);
    assert_eq!(metadata.voicing.range.low.midi(), 36);
    assert_eq!(metadata.voicing.range.high.midi(), 84);
    assert!(!metadata.voicing.include_bass);
    assert!(metadata.transpose.is_none());

    let metadata = parse_metadata("key: Am").unwrap();
    assert_eq!(metadata.key.mode, KeyMode::Minor);
    assert_eq!(metadata.input, InputKind::Chord);
}

#[test]
fn test_voice_count_from_frontmatter() {
    let data = render("---\nvoicing:\n  voice-count: 3\n---\nC F G").unwrap();
    assert!(data.steps.iter().all(|s| s.voicing.len() == 3));
}

#[test]
fn test_metadata_errors() {
    assert!(matches!(render("---\nkey: H\n---\nC"), Err(ChordflowError::InvalidKey(_))));
    assert!(matches!(render("---\ninput: tab\n---\nC"), Err(ChordflowError::MetadataError(_))));
    assert!(matches!(render("---\nmode: lydian\n---\nC"), Err(ChordflowError::MetadataError(_))));
    assert!(matches!(render("---\ntitle: [unclosed\n---\nC"), Err(ChordflowError::MetadataError(_))));
    assert!(matches!(render("---\ntranspose: Q\n---\nC"), Err(ChordflowError::InvalidKey(_))));
    assert!(matches!(
        render("---\nvoicing:\n  voice-count: 0\n---\nC"),
        Err(ChordflowError::InvalidOptions(_))
    ));
    assert!(matches!(
        render("---\ncenter-register: 12\n---\nC"),
        Err(ChordflowError::InvalidOptions(_))
    ));
}

#[test]
fn test_metadata_validate_checks_register_and_voicing() {
    assert!(Metadata::default().validate().is_ok());

    for center_register in [-1, 9] {
        let metadata = Metadata { center_register, ..Metadata::default() };
        assert!(metadata.validate().is_ok(), "{}", center_register);
    }
    for center_register in [-2, 10, i32::MAX] {
        let metadata = Metadata { center_register, ..Metadata::default() };
        assert!(matches!(metadata.validate(), Err(ChordflowError::InvalidOptions(_))));
    }

    let mut metadata = Metadata::default();
    metadata.voicing.voice_count = 9;
    assert!(matches!(metadata.validate(), Err(ChordflowError::InvalidOptions(_))));
}

#[test]
fn test_empty_frontmatter_uses_defaults() {
    let data = render("---\n---\nC").unwrap();
    assert_eq!(data.key.to_string(), "C major");
    assert_eq!(data.steps.len(), 1);
}

#[test]
fn test_render_progression_directly() {
    let metadata = Metadata {
        input: InputKind::Roman,
        key: "F".parse().unwrap(),
        ..Metadata::default()
    };
    let data = render_progression("251", &metadata);
    assert_eq!(symbols(&data), vec!["Gm7", "C7", "Fmaj7"]);
    let indices: Vec<usize> = data.steps.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}
