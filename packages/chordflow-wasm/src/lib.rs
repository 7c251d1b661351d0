use chordflow::{ChordflowError, InputKind, ItemStatus, KeySpec, Metadata, ParsedItem, VoicingOptions};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct RenderError {
    kind: &'static str,
    message: String,
}

/// Inline diagnostic for an editor: one per token that did not parse cleanly.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Diagnostic {
    index: usize,
    token: String,
    message: String,
    severity: &'static str,
}

fn error_kind(e: &ChordflowError) -> &'static str {
    match e {
        ChordflowError::MetadataError(_) => "metadata",
        ChordflowError::InvalidKey(_) => "key",
        ChordflowError::InvalidChord(_) => "chord",
        ChordflowError::InvalidPitch(_) => "pitch",
        ChordflowError::InvalidOptions(_) => "options",
        ChordflowError::Io(_) => "io",
    }
}

fn to_js_error(e: ChordflowError) -> JsValue {
    let error = RenderError {
        kind: error_kind(&e),
        message: e.to_string(),
    };
    match serde_json::to_string(&error) {
        Ok(json) => JsValue::from_str(&json),
        Err(_) => JsValue::from_str(&error.message),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_key(key: Option<String>) -> Result<KeySpec, JsValue> {
    match key {
        Some(key) => key.parse().map_err(to_js_error),
        None => Ok(KeySpec::default()),
    }
}

/// Parse chord symbols and return the items as JSON
#[wasm_bindgen]
pub fn parse_chords(text: &str) -> Result<String, JsValue> {
    to_json(&chordflow::parse_chord_tokens(text))
}

/// Parse roman numerals against a key ("C", "Am", "Eb major") and return JSON
#[wasm_bindgen]
pub fn parse_roman(text: &str, key: &str) -> Result<String, JsValue> {
    let key: KeySpec = key.parse().map_err(to_js_error)?;
    to_json(&chordflow::parse_roman_tokens(text, &key))
}

/// Parse items and hand them to JavaScript as plain objects
#[wasm_bindgen]
pub fn parse_items(text: &str, roman: bool, key: Option<String>) -> Result<JsValue, JsValue> {
    let kind = if roman { InputKind::Roman } else { InputKind::Chord };
    let items = chordflow::parse(text, kind, &parse_key(key)?);
    serde_wasm_bindgen::to_value(&items).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render a progression document (frontmatter + chords) to JSON
#[wasm_bindgen]
pub fn render(source: &str) -> Result<String, JsValue> {
    let data = chordflow::render(source).map_err(to_js_error)?;
    to_json(&data)
}

/// Render a progression document to MusicXML
#[wasm_bindgen]
pub fn render_musicxml(source: &str) -> Result<String, JsValue> {
    chordflow::render(source)
        .map(|data| chordflow::to_musicxml(&data))
        .map_err(to_js_error)
}

/// Voice free text with explicit settings, for live editing without frontmatter
#[wasm_bindgen]
pub fn voice(
    text: &str,
    roman: bool,
    key: Option<String>,
    center_register: i32,
    voice_count: usize,
    transpose_key: Option<String>,
) -> Result<String, JsValue> {
    let voicing = VoicingOptions {
        voice_count,
        ..VoicingOptions::default()
    };
    let transpose = match transpose_key {
        Some(tonic) => Some(
            tonic
                .parse()
                .map_err(|_| to_js_error(ChordflowError::InvalidKey(tonic.clone())))?,
        ),
        None => None,
    };

    let metadata = Metadata {
        key: parse_key(key)?,
        input: if roman { InputKind::Roman } else { InputKind::Chord },
        center_register,
        transpose,
        voicing,
        ..Metadata::default()
    };
    metadata.validate().map_err(to_js_error)?;
    to_json(&chordflow::render_progression(text, &metadata))
}

fn item_diagnostic(item: &ParsedItem) -> Option<Diagnostic> {
    let severity = match item.status {
        ItemStatus::Error => "error",
        ItemStatus::Warn => "warning",
        ItemStatus::Ok | ItemStatus::Rest => return None,
    };
    Some(Diagnostic {
        index: item.index,
        token: item.raw.clone(),
        message: item.message.clone().unwrap_or_default(),
        severity,
    })
}

/// Lint a progression document and return diagnostics as a JSON array
#[wasm_bindgen]
pub fn lint(source: &str) -> String {
    let diagnostics: Vec<Diagnostic> = match chordflow::render(source) {
        Ok(data) => data.steps.iter().filter_map(|step| item_diagnostic(&step.item)).collect(),
        Err(e) => vec![Diagnostic {
            index: 0,
            token: String::new(),
            message: e.to_string(),
            severity: "error",
        }],
    };

    serde_json::to_string(&diagnostics).unwrap_or_else(|_| "[]".to_string())
}
