//! MusicXML export
//!
//! Writes a rendered progression as a single-part score: one measure per step,
//! chord tones stacked as a whole-note chord under a `<harmony>` symbol.

use crate::chord::{ChordKind, ChordSymbol};
use crate::pitch::PitchClass;
use crate::progression::{ProgressionData, ProgressionStep};
use crate::voicing::VoicingResult;

/// Convert a rendered progression to MusicXML: one whole-note measure per step,
/// with a `<harmony>` symbol above each voiced chord.
///
/// # Example
/// ```
/// use chordflow::{render, to_musicxml};
///
/// let data = render("Dm7 G7 Cmaj7").unwrap();
/// let xml = to_musicxml(&data);
/// assert!(xml.contains("<kind text=\"m7\">minor-seventh</kind>"));
/// assert_eq!(xml.matches("<measure ").count(), 3);
/// ```
pub fn to_musicxml(data: &ProgressionData) -> String {
    let mut xml = String::new();

    // XML declaration and doctype
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">"#);
    xml.push('\n');

    xml.push_str(r#"<score-partwise version="4.0">"#);
    xml.push('\n');

    if let Some(title) = &data.title {
        xml.push_str("  <work>\n");
        xml.push_str(&format!("    <work-title>{}</work-title>\n", escape_xml(title)));
        xml.push_str("  </work>\n");
    }

    xml.push_str("  <part-list>\n");
    xml.push_str("    <score-part id=\"P1\">\n");
    xml.push_str("      <part-name>Chords</part-name>\n");
    xml.push_str("    </score-part>\n");
    xml.push_str("  </part-list>\n");

    xml.push_str("  <part id=\"P1\">\n");

    for (i, step) in data.steps.iter().enumerate() {
        let attributes = if i == 0 { Some(data.key.fifths()) } else { None };
        xml.push_str(&measure_to_xml(step, i + 1, attributes));
    }

    xml.push_str("  </part>\n");
    xml.push_str("</score-partwise>\n");

    xml
}

fn measure_to_xml(step: &ProgressionStep, number: usize, key_fifths: Option<i8>) -> String {
    let mut xml = String::new();

    xml.push_str(&format!("    <measure number=\"{}\">\n", number));

    if let Some(fifths) = key_fifths {
        xml.push_str("      <attributes>\n");
        xml.push_str("        <divisions>1</divisions>\n");
        xml.push_str("        <key>\n");
        xml.push_str(&format!("          <fifths>{}</fifths>\n", fifths));
        xml.push_str("        </key>\n");
        xml.push_str("        <time>\n");
        xml.push_str("          <beats>4</beats>\n");
        xml.push_str("          <beat-type>4</beat-type>\n");
        xml.push_str("        </time>\n");
        xml.push_str("        <clef>\n");
        xml.push_str("          <sign>G</sign>\n");
        xml.push_str("          <line>2</line>\n");
        xml.push_str("        </clef>\n");
        xml.push_str("      </attributes>\n");
    }

    match &step.chord {
        Some(chord) if !step.voicing.is_empty() => {
            xml.push_str(&harmony_to_xml(chord));
            xml.push_str(&chord_notes_to_xml(&step.voicing, &step.label));
        }
        _ => xml.push_str(&rest_to_xml()),
    }

    xml.push_str("    </measure>\n");
    xml
}

fn harmony_to_xml(chord: &ChordSymbol) -> String {
    let mut xml = String::new();

    xml.push_str("      <harmony>\n");
    xml.push_str("        <root>\n");
    xml.push_str(&step_and_alter(chord.root, "root", "          "));
    xml.push_str("        </root>\n");
    xml.push_str(&format!(
        "        <kind text=\"{}\">{}</kind>\n",
        escape_xml(chord.kind.suffix()),
        kind_value(chord.kind)
    ));
    if let Some(bass) = chord.bass {
        xml.push_str("        <bass>\n");
        xml.push_str(&step_and_alter(bass, "bass", "          "));
        xml.push_str("        </bass>\n");
    }
    xml.push_str("      </harmony>\n");

    xml
}

/// `<{prefix}-step>` and optional `<{prefix}-alter>` lines.
fn step_and_alter(pitch_class: PitchClass, prefix: &str, indent: &str) -> String {
    let mut xml = format!("{}<{}-step>{}</{}-step>\n", indent, prefix, pitch_class.name.as_char(), prefix);
    let alter = pitch_class.accidental.offset();
    if alter != 0 {
        xml.push_str(&format!("{}<{}-alter>{}</{}-alter>\n", indent, prefix, alter, prefix));
    }
    xml
}

fn chord_notes_to_xml(voicing: &VoicingResult, label: &str) -> String {
    let mut xml = String::new();

    for (i, (pitch, spelling)) in voicing.pitches.iter().zip(&voicing.pitch_classes).enumerate() {
        xml.push_str("      <note>\n");
        if i > 0 {
            xml.push_str("        <chord/>\n");
        }
        xml.push_str("        <pitch>\n");
        xml.push_str(&format!("          <step>{}</step>\n", spelling.name.as_char()));
        let alter = spelling.accidental.offset();
        if alter != 0 {
            xml.push_str(&format!("          <alter>{}</alter>\n", alter));
        }
        xml.push_str(&format!("          <octave>{}</octave>\n", pitch.spelled_octave(*spelling)));
        xml.push_str("        </pitch>\n");
        xml.push_str("        <duration>4</duration>\n");
        xml.push_str("        <type>whole</type>\n");
        if i == 0 {
            xml.push_str("        <lyric>\n");
            xml.push_str(&format!("          <text>{}</text>\n", escape_xml(label)));
            xml.push_str("        </lyric>\n");
        }
        xml.push_str("      </note>\n");
    }

    xml
}

fn rest_to_xml() -> String {
    let mut xml = String::new();

    xml.push_str("      <note>\n");
    xml.push_str("        <rest measure=\"yes\"/>\n");
    xml.push_str("        <duration>4</duration>\n");
    xml.push_str("      </note>\n");
    xml
}

/// MusicXML `<kind>` value. Kinds without a dedicated value use the closest
/// one; the `text` attribute carries the exact suffix.
fn kind_value(kind: ChordKind) -> &'static str {
    match kind {
        ChordKind::Major | ChordKind::Add9 => "major",
        ChordKind::Minor | ChordKind::MinorAdd9 => "minor",
        ChordKind::Diminished => "diminished",
        ChordKind::Augmented => "augmented",
        ChordKind::Sus2 => "suspended-second",
        ChordKind::Sus4 => "suspended-fourth",
        ChordKind::Power => "power",
        ChordKind::Major6 | ChordKind::SixNine => "major-sixth",
        ChordKind::Minor6 => "minor-sixth",
        ChordKind::Major7 => "major-seventh",
        ChordKind::Minor7 => "minor-seventh",
        ChordKind::MinorMajor7 => "major-minor",
        ChordKind::HalfDiminished7 => "half-diminished",
        ChordKind::Diminished7 => "diminished-seventh",
        ChordKind::Augmented7 => "augmented-seventh",
        ChordKind::Dominant9 => "dominant-ninth",
        ChordKind::Major9 => "major-ninth",
        ChordKind::Minor9 => "minor-ninth",
        ChordKind::Dominant11 => "dominant-11th",
        ChordKind::Minor11 => "minor-11th",
        ChordKind::Dominant13 => "dominant-13th",
        ChordKind::Dominant7
        | ChordKind::Dominant7Sus4
        | ChordKind::Dominant7Flat9
        | ChordKind::Dominant7Sharp9
        | ChordKind::Dominant7Flat5
        | ChordKind::Dominant7Sharp11
        | ChordKind::Altered => "dominant",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
