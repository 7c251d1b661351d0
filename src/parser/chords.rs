//! Chord-symbol input: `Fmaj7 E7 Am7/G`.

use super::ParsedItem;
use crate::chord::{match_root, match_symbol};
use crate::lexer::{tokenize, InputKind};
use crate::normalize::normalize;
use crate::pitch::PitchClass;

/// Classify every chord-symbol token in `text`.
///
/// # Example
/// ```
/// use chordflow::{parse_chord_tokens, ItemStatus};
///
/// let items = parse_chord_tokens("Fmaj7 E7 Am7 Dm7 G7");
/// assert_eq!(items.len(), 5);
/// assert!(items.iter().all(|i| i.status == ItemStatus::Ok));
/// ```
pub fn parse_chord_tokens(text: &str) -> Vec<ParsedItem> {
    tokenize(text, InputKind::Chord)
        .iter()
        .enumerate()
        .map(|(index, token)| {
            if token.is_rest() {
                ParsedItem::rest(index, &token.text, InputKind::Chord)
            } else {
                parse_chord_token(index, &token.text)
            }
        })
        .collect()
}

fn parse_chord_token(index: usize, raw: &str) -> ParsedItem {
    let normalized = normalize(raw);
    let item = ParsedItem::new(index, raw, InputKind::Chord, normalized.clone());

    let (symbol, bass) = match normalized.split_once('/') {
        Some((symbol, bass)) => (symbol, Some(bass)),
        None => (normalized.as_str(), None),
    };

    let Some(chord) = match_symbol(symbol) else {
        return item.error(diagnose(symbol));
    };

    match bass {
        None => item.resolved(chord),
        Some(bass) => match bass.parse::<PitchClass>() {
            Ok(pc) => item.resolved(chord.with_bass(Some(pc))),
            Err(_) => item
                .resolved(chord)
                .warn(format!("Bass '{}' is not a note name; playing {} without it", bass, chord)),
        },
    }
}

fn diagnose(symbol: &str) -> String {
    match match_root(symbol) {
        None if symbol.is_empty() => "Missing chord root".to_string(),
        None => format!("Unrecognized chord root in '{}'", symbol),
        Some((root, suffix)) => format!("Unknown chord quality '{}' after root {}", suffix, root),
    }
}
