//! Progression rendering engine
//!
//! Splits a document into frontmatter and body, validates the settings, parses
//! the body and voices every playable step left to right.

use super::types::{Metadata, ProgressionData, ProgressionStep, RawMetadata};
use crate::error::ChordflowError;
use crate::key::{KeyMode, KeySpec};
use crate::lexer::InputKind;
use crate::parser::ParsedItem;
use crate::pitch::PitchClass;
use crate::transpose::{degree_for_chord, format_symbol, transpose_to_key};
use crate::voicing::{voice_chord, VoicingResult};
use tracing::{debug, trace};

/// Extract the frontmatter block (between the first two `---` lines).
///
/// Returns (metadata_content, remaining_source). Lines before the opening marker
/// stay in the body.
pub(crate) fn extract_metadata(source: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = source.lines().collect();

    let mut markers = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == "---")
        .map(|(i, _)| i);

    match (markers.next(), markers.next()) {
        (Some(start), Some(end)) => {
            let content = lines[start + 1..end].join("\n");
            let body: Vec<&str> = lines[..start].iter().chain(lines[end + 1..].iter()).copied().collect();
            (Some(content), body.join("\n"))
        }
        _ => (None, source.to_string()),
    }
}

/// Deserialize and validate frontmatter content.
pub fn parse_metadata(content: &str) -> Result<Metadata, ChordflowError> {
    if content.trim().is_empty() {
        return Ok(Metadata::default());
    }

    let raw: RawMetadata =
        serde_yaml::from_str(content).map_err(|e| ChordflowError::MetadataError(e.to_string()))?;

    let mut key = match &raw.key {
        Some(key) => key.parse::<KeySpec>()?,
        None => KeySpec::default(),
    };
    if let Some(mode) = &raw.mode {
        key.mode = KeyMode::parse(mode)
            .ok_or_else(|| ChordflowError::MetadataError(format!("mode must be 'major' or 'minor', got '{}'", mode)))?;
    }

    let input = match raw.input.as_deref().map(|s| s.trim().to_lowercase()) {
        None => InputKind::Chord,
        Some(input) => match input.as_str() {
            "chords" | "chord" => InputKind::Chord,
            "roman" => InputKind::Roman,
            _ => {
                return Err(ChordflowError::MetadataError(format!(
                    "input must be 'chords' or 'roman', got '{}'",
                    input
                )))
            }
        },
    };

    let transpose = match &raw.transpose {
        Some(tonic) => Some(
            tonic
                .parse::<PitchClass>()
                .map_err(|_| ChordflowError::InvalidKey(tonic.clone()))?,
        ),
        None => None,
    };

    let metadata = Metadata {
        title: raw.title,
        key,
        input,
        center_register: raw.center_register.unwrap_or(4),
        transpose,
        voicing: raw.voicing.unwrap_or_default(),
    };
    metadata.validate()?;
    Ok(metadata)
}

/// Parse `body` under `metadata` and voice every playable step.
///
/// Rests and errors keep their position with an empty voicing and leave the
/// voice-leading state untouched.
pub fn render_progression(body: &str, metadata: &Metadata) -> ProgressionData {
    let items = crate::parse(body, metadata.input, &metadata.key);
    let target = metadata.target_key();

    let mut previous: Option<VoicingResult> = None;
    let steps: Vec<ProgressionStep> = items
        .into_iter()
        .map(|item| {
            let step = render_step(item, metadata, &target, previous.as_ref());
            if !step.voicing.is_empty() {
                previous = Some(step.voicing.clone());
            }
            trace!(index = step.index, label = %step.label, status = ?step.item.status, "rendered step");
            step
        })
        .collect();

    debug!(
        title = ?metadata.title,
        key = %target,
        steps = steps.len(),
        playable = steps.iter().filter(|s| s.is_playable()).count(),
        "rendered progression"
    );

    ProgressionData {
        title: metadata.title.clone(),
        key: target,
        source_key: metadata.key,
        input: metadata.input,
        center_register: metadata.center_register,
        steps,
    }
}

fn render_step(
    item: ParsedItem,
    metadata: &Metadata,
    target: &KeySpec,
    previous: Option<&VoicingResult>,
) -> ProgressionStep {
    let chord = item
        .chord
        .filter(|_| item.is_playable())
        .map(|chord| transpose_to_key(&chord, &metadata.key, target));

    let degree = chord.map(|chord| degree_for_chord(&chord, target));

    let label = match (metadata.input, &chord) {
        (InputKind::Roman, Some(_)) => item.degree.clone().unwrap_or_else(|| item.normalized.clone()),
        (InputKind::Chord, Some(chord)) => format_symbol(chord),
        (_, None) => item.raw.clone(),
    };

    let voicing = match &chord {
        Some(chord) => voice_chord(chord, metadata.center_register, previous, &metadata.voicing),
        None => VoicingResult::empty(),
    };

    ProgressionStep {
        index: item.index,
        item,
        label,
        chord,
        degree,
        voicing,
    }
}

/// Render a progression document: optional frontmatter followed by the chord body.
///
/// # Example
/// ```
/// use chordflow::render;
///
/// let source = "---\ninput: roman\nkey: Bb\n---\n251";
/// let data = render(source).unwrap();
///
/// let chords: Vec<String> = data.chords().iter().map(|c| c.to_string()).collect();
/// assert_eq!(chords, vec!["Cm7", "F7", "Bbmaj7"]);
/// assert!(data.steps.iter().all(|s| s.voicing.len() == 4));
/// ```
pub fn render(source: &str) -> Result<ProgressionData, ChordflowError> {
    let (metadata, body) = parse_document(source)?;
    Ok(render_progression(&body, &metadata))
}

/// Split a document into validated settings and the chord body.
pub fn parse_document(source: &str) -> Result<(Metadata, String), ChordflowError> {
    let (content, body) = extract_metadata(source);
    let metadata = match content {
        Some(content) => parse_metadata(&content)?,
        None => Metadata::default(),
    };
    Ok((metadata, body))
}
