//! # chordflow
//!
//! Chord-progression parsing and voicing: free-text chord symbols or roman
//! numerals in, per-position diagnostics and octave-placed voicings out.
//!
//! ## Pipeline
//! 1. [`parse_chord_tokens`] / [`parse_roman_tokens`] classify every token as
//!    `ok`, `warn`, `error` or `rest`
//! 2. [`select_playable`] keeps the resolved chords
//! 3. [`voice_chord`] / [`voice_progression`] place each chord's tones, carrying
//!    the previous voicing forward for smooth voice leading
//!
//! [`render`] runs the whole pipeline on a document with YAML frontmatter, and
//! [`to_musicxml`] exports the result.
//!
//! ## Example
//! ```rust
//! use chordflow::{parse_chord_tokens, select_playable, voice_progression, VoicingOptions};
//!
//! let items = parse_chord_tokens("Fmaj7 E7 Am7 - Dm7 G7");
//! let chords = select_playable(&items);
//! let voicings = voice_progression(&chords, 4, &VoicingOptions::default());
//!
//! assert_eq!(items.len(), 6);
//! assert_eq!(voicings.len(), 5);
//! ```

pub mod chord;
pub mod error;
pub mod key;
pub mod lexer;
pub mod musicxml;
pub mod normalize;
pub mod parser;
pub mod pitch;
pub mod progression;
pub mod transpose;
pub mod voicing;

pub use chord::{parse_symbol, ChordKind, ChordQuality, ChordSymbol};
pub use error::ChordflowError;
pub use key::{KeyMode, KeySpec};
pub use lexer::InputKind;
pub use musicxml::to_musicxml;
pub use parser::{parse_chord_tokens, parse_roman_tokens, resolve_roman, select_playable, ItemStatus, ParsedItem};
pub use pitch::{Accidental, NoteName, Pitch, PitchClass};
pub use progression::{parse_document, render, render_progression, Metadata, ProgressionData, ProgressionStep};
pub use transpose::{degree_for_chord, format_symbol, semitone_distance, transpose_chord, transpose_symbol, transpose_to_key};
pub use voicing::{voice_chord, voice_progression, PitchRange, ToneRole, VoicingOptions, VoicingResult};

/// Parse text in the given notation. `key` is only consulted for roman numerals.
///
/// # Example
/// ```
/// use chordflow::{parse, InputKind, KeySpec};
///
/// let key: KeySpec = "G".parse().unwrap();
/// let items = parse("ii V I", InputKind::Roman, &key);
/// assert_eq!(items[1].chord.unwrap().to_string(), "D7");
/// ```
pub fn parse(text: &str, kind: InputKind, key: &KeySpec) -> Vec<ParsedItem> {
    match kind {
        InputKind::Chord => parse_chord_tokens(text),
        InputKind::Roman => parse_roman_tokens(text, key),
    }
}
