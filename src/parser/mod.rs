//! # Parser Module
//!
//! Classifies free-text chord and roman-numeral input into [`ParsedItem`]s.
//!
//! ## Pipeline
//! 1. [`lexer`](crate::lexer) splits the text into tokens (mode-dependent separators)
//! 2. roman mode only: shorthand aliases (`251`, `two-five-one`, ...) expand in place
//! 3. each token is normalized ([`normalize`](crate::normalize::normalize)) and
//!    matched against the chord-symbol or roman-numeral grammar
//!
//! ## Status Values
//! - `ok` - resolved to a chord
//! - `warn` - resolved, but a secondary attribute (slash bass, trailing modifier)
//!   could not be validated and was dropped
//! - `error` - no chord could be resolved; kept for diagnostics only
//! - `rest` - intentional silence
//!
//! Parsing never fails: every token yields exactly one item, in input order.
//!
//! ## Example
//! ```rust
//! use chordflow::{parse_chord_tokens, select_playable, ItemStatus};
//!
//! let items = parse_chord_tokens("Fmaj7 - Xyz123 C/H");
//! let statuses: Vec<ItemStatus> = items.iter().map(|i| i.status).collect();
//! assert_eq!(statuses, vec![ItemStatus::Ok, ItemStatus::Rest, ItemStatus::Error, ItemStatus::Warn]);
//!
//! let playable = select_playable(&items);
//! assert_eq!(playable.len(), 2);
//! ```

mod chords;
mod roman;

pub use chords::parse_chord_tokens;
pub use roman::{expand_aliases, parse_roman_tokens, resolve_roman};

use crate::chord::ChordSymbol;
use crate::lexer::InputKind;
use serde::Serialize;

/// Classification of one input token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Ok,
    Warn,
    Error,
    Rest,
}

/// The result of classifying one input token.
///
/// # Fields
/// - `index`: position in the (alias-expanded) token sequence
/// - `raw`: token text as entered
/// - `normalized`: token text after the normalization pass
/// - `chord`: the resolved chord for `ok`/`warn` items
/// - `degree`: roman degree label (roman mode)
/// - `message`: human-readable diagnostic for tooltips or logs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedItem {
    pub index: usize,
    pub raw: String,
    pub kind: InputKind,
    pub status: ItemStatus,
    pub normalized: String,
    pub chord: Option<ChordSymbol>,
    pub degree: Option<String>,
    pub message: Option<String>,
}

impl ParsedItem {
    pub(crate) fn new(index: usize, raw: &str, kind: InputKind, normalized: String) -> Self {
        Self {
            index,
            raw: raw.to_string(),
            kind,
            status: ItemStatus::Error,
            normalized,
            chord: None,
            degree: None,
            message: None,
        }
    }

    pub(crate) fn rest(index: usize, raw: &str, kind: InputKind) -> Self {
        Self {
            status: ItemStatus::Rest,
            ..Self::new(index, raw, kind, raw.trim().to_string())
        }
    }

    pub(crate) fn error(mut self, message: String) -> Self {
        self.status = ItemStatus::Error;
        self.chord = None;
        self.message = Some(message);
        self
    }

    pub(crate) fn resolved(mut self, chord: ChordSymbol) -> Self {
        self.status = ItemStatus::Ok;
        self.chord = Some(chord);
        self
    }

    pub(crate) fn warn(mut self, message: String) -> Self {
        self.status = ItemStatus::Warn;
        self.message = Some(message);
        self
    }

    /// `ok` or `warn` with a resolved chord
    pub fn is_playable(&self) -> bool {
        matches!(self.status, ItemStatus::Ok | ItemStatus::Warn) && self.chord.is_some()
    }
}

/// Keep the playable chords, in order, dropping diagnostics, rests and errors.
pub fn select_playable(items: &[ParsedItem]) -> Vec<ChordSymbol> {
    items
        .iter()
        .filter(|item| item.is_playable())
        .filter_map(|item| item.chord)
        .collect()
}
