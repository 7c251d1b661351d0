//! Progression document type definitions
//!
//! Settings read from a document's frontmatter and the rendered per-step output.

use crate::chord::ChordSymbol;
use crate::error::ChordflowError;
use crate::key::KeySpec;
use crate::lexer::InputKind;
use crate::parser::ParsedItem;
use crate::pitch::PitchClass;
use crate::voicing::{VoicingOptions, VoicingResult};
use serde::{Deserialize, Serialize};

/// Lowest and highest accepted `center-register` values.
const CENTER_REGISTERS: std::ops::RangeInclusive<i32> = -1..=9;

/// Frontmatter as written, before validation.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct RawMetadata {
    pub title: Option<String>,
    pub key: Option<String>,
    pub mode: Option<String>,
    pub input: Option<String>,
    pub center_register: Option<i32>,
    pub transpose: Option<String>,
    pub voicing: Option<VoicingOptions>,
}

/// Validated document settings.
///
/// # Fields
/// - `title`: optional display title
/// - `key`: the key the body is written in (roman numerals resolve against it)
/// - `input`: chord symbols or roman numerals
/// - `center_register`: octave whose C anchors the voicing search (4 = MIDI 60)
/// - `transpose`: target tonic; the mode is kept from `key`
/// - `voicing`: options handed to the voicing engine
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub key: KeySpec,
    pub input: InputKind,
    pub center_register: i32,
    pub transpose: Option<PitchClass>,
    pub voicing: VoicingOptions,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: None,
            key: KeySpec::default(),
            input: InputKind::Chord,
            center_register: 4,
            transpose: None,
            voicing: VoicingOptions::default(),
        }
    }
}

impl Metadata {
    /// Check the center register and the voicing options.
    pub fn validate(&self) -> Result<(), ChordflowError> {
        if !CENTER_REGISTERS.contains(&self.center_register) {
            return Err(ChordflowError::InvalidOptions(format!(
                "center-register must be between {} and {}, got {}",
                CENTER_REGISTERS.start(),
                CENTER_REGISTERS.end(),
                self.center_register
            )));
        }
        self.voicing.validate()
    }

    /// The key chords are rendered in: the transpose target if one is set.
    pub fn target_key(&self) -> KeySpec {
        match self.transpose {
            Some(tonic) => KeySpec::new(tonic, self.key.mode),
            None => self.key,
        }
    }
}

/// One rendered position of a progression.
///
/// # Fields
/// - `index`: position in the token sequence, matching `item.index`
/// - `item`: the parser's classification of the token
/// - `label`: display text (degree label in roman mode, chord symbol in chord mode,
///   the raw token for rests and errors)
/// - `chord`: the chord as played, after any transposition
/// - `degree`: degree label of `chord` relative to the rendered key
/// - `voicing`: octave-placed pitches; empty for rests and errors
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionStep {
    pub index: usize,
    pub item: ParsedItem,
    pub label: String,
    pub chord: Option<ChordSymbol>,
    pub degree: Option<String>,
    pub voicing: VoicingResult,
}

impl ProgressionStep {
    pub fn is_playable(&self) -> bool {
        self.chord.is_some() && !self.voicing.is_empty()
    }
}

/// A fully rendered progression.
///
/// `key` is the key the chords sound in; `source_key` is where they were written
/// and only differs when the document was transposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionData {
    pub title: Option<String>,
    pub key: KeySpec,
    pub source_key: KeySpec,
    pub input: InputKind,
    pub center_register: i32,
    pub steps: Vec<ProgressionStep>,
}

impl ProgressionData {
    /// Chords of the playable steps, in order.
    pub fn chords(&self) -> Vec<ChordSymbol> {
        self.steps.iter().filter_map(|step| step.chord).collect()
    }

    /// Voicings of the playable steps, in order.
    pub fn voicings(&self) -> Vec<&VoicingResult> {
        self.steps
            .iter()
            .filter(|step| step.is_playable())
            .map(|step| &step.voicing)
            .collect()
    }

    pub fn is_transposed(&self) -> bool {
        self.key != self.source_key
    }
}
