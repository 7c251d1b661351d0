//! Roman-numeral input resolved against a key: `ii V7 Imaj7`, `bVII`, `viiø7`.
//!
//! ## Grammar
//! After normalization a token is matched as `ACCIDENTAL{0,2} NUMERAL MODIFIER`:
//! - `ACCIDENTAL`: `b` or `#`, each shifting the degree by one semitone
//! - `NUMERAL`: `I`..`VII`, all uppercase or all lowercase
//! - `MODIFIER`: quality markers and extensions (`°`, `o`, `ø`, `+`, `7`, `maj7`, ...)
//!
//! ## Quality
//! Lowercase numerals are minor, uppercase major. A diminished marker (`°`, `dim`,
//! a leading `o`), a half-diminished marker (`ø`) or an augmented marker (`+`,
//! `aug`) overrides the casing. An explicit extension in the modifier always wins
//! over the casing-derived default.
//!
//! ## Default Extensions
//! Bare `ii`, `V` and `I` (no accidental, no modifier) become `m7`, `7` and `maj7`.
//! This is a convenience for common-practice jazz input, not harmonic analysis:
//! every other bare numeral stays a triad.

use super::ParsedItem;
use crate::chord::{ChordKind, ChordSymbol};
use crate::key::KeySpec;
use crate::lexer::{is_rest, tokenize, InputKind};
use crate::normalize::normalize;
use crate::pitch::PitchClass;

const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Tokens that expand to `ii V7 Imaj7`. Compared after lowercasing and folding
/// dash variants to `-`.
const TWO_FIVE_ONE: &[&str] = &[
    "251",
    "2-5-1",
    "ii-v-i",
    "ii-v7-i",
    "ii-v7-imaj7",
    "iim7-v7-imaj7",
    "two-five-one",
    "twofiveone",
    "ツーファイブワン",
    "ツーファイブ・ワン",
];

const TWO_FIVE_ONE_EXPANSION: [&str; 3] = ["ii", "V7", "Imaj7"];

/// Modifier fragments the resolver understands. Anything left after stripping
/// these is reported as a warning. Longer fragments come first.
const KNOWN_MODIFIERS: &[&str] = &[
    "maj7", "maj9", "m7b5", "hdim", "dim7", "dim", "aug", "add9", "add2", "sus2", "sus4", "sus", "alt",
    "#11", "b9", "#9", "b5", "M7", "m7", "13", "11", "9", "7", "6", "ø", "Ø", "°", "+", "o", "m",
];

const UPPER_EXTENSIONS: &[&str] = &["b9", "#9", "#11", "13", "11"];

/// Expand shorthand tokens in place, e.g. `251` → `ii V7 Imaj7`.
pub fn expand_aliases(token: &str) -> Vec<String> {
    let folded: String = token
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, '‐' | '–' | '—' | '−') { '-' } else { c })
        .collect();
    if TWO_FIVE_ONE.contains(&folded.as_str()) {
        TWO_FIVE_ONE_EXPANSION.iter().map(|s| s.to_string()).collect()
    } else {
        vec![token.to_string()]
    }
}

/// Classify every roman-numeral token in `text` against `key`.
///
/// # Example
/// ```
/// use chordflow::{parse_roman_tokens, KeySpec};
///
/// let key: KeySpec = "C".parse().unwrap();
/// let items = parse_roman_tokens("251", &key);
/// let symbols: Vec<String> = items.iter().filter_map(|i| i.chord).map(|c| c.to_string()).collect();
/// assert_eq!(symbols, vec!["Dm7", "G7", "Cmaj7"]);
///
/// let labels: Vec<&str> = items.iter().filter_map(|i| i.degree.as_deref()).collect();
/// assert_eq!(labels, vec!["ii", "V7", "Imaj7"]);
/// ```
pub fn parse_roman_tokens(text: &str, key: &KeySpec) -> Vec<ParsedItem> {
    tokenize(text, InputKind::Roman)
        .iter()
        .flat_map(|token| expand_aliases(&token.text))
        .enumerate()
        .map(|(index, raw)| {
            if is_rest(&raw) {
                ParsedItem::rest(index, &raw, InputKind::Roman)
            } else {
                parse_roman_token(index, &raw, key)
            }
        })
        .collect()
}

/// Resolve a single roman-numeral token to a chord, ignoring diagnostics.
pub fn resolve_roman(token: &str, key: &KeySpec) -> Option<ChordSymbol> {
    let item = parse_roman_token(0, token, key);
    if item.is_playable() {
        item.chord
    } else {
        None
    }
}

/// Matched pieces of a roman-numeral token
#[derive(Debug, Clone, PartialEq)]
struct RomanParts<'a> {
    accidentals: &'a str,
    numeral: &'a str,
    modifier: &'a str,
}

impl RomanParts<'_> {
    fn semitone_offset(&self) -> i32 {
        self.accidentals
            .chars()
            .map(|c| if c == '#' { 1 } else { -1 })
            .sum()
    }

    /// 0-indexed scale step
    fn step(&self) -> Option<usize> {
        NUMERALS
            .iter()
            .position(|n| n.eq_ignore_ascii_case(self.numeral))
    }

    fn is_lowercase(&self) -> bool {
        self.numeral.chars().all(|c| c.is_ascii_lowercase())
    }

    fn is_bare(&self) -> bool {
        self.accidentals.is_empty() && self.modifier.is_empty()
    }
}

fn match_roman(text: &str) -> Option<RomanParts<'_>> {
    let accidental_len = text
        .chars()
        .take_while(|&c| c == 'b' || c == '#')
        .take(2)
        .count();
    let (accidentals, rest) = text.split_at(accidental_len);

    let numeral_len = rest
        .chars()
        .take_while(|c| matches!(c, 'I' | 'V' | 'i' | 'v'))
        .count();
    let (numeral, modifier) = rest.split_at(numeral_len);

    let uniform = numeral.chars().all(|c| c.is_ascii_uppercase()) || numeral.chars().all(|c| c.is_ascii_lowercase());
    if numeral.is_empty() || !uniform {
        return None;
    }
    let parts = RomanParts { accidentals, numeral, modifier };
    parts.step()?;
    Some(parts)
}

/// Base triad quality from casing and quality markers.
fn base_kind(parts: &RomanParts) -> ChordKind {
    let m = parts.modifier;
    if is_half_diminished(m) {
        ChordKind::HalfDiminished7
    } else if is_diminished(m) {
        ChordKind::Diminished
    } else if m.contains('+') || m.contains("aug") {
        ChordKind::Augmented
    } else if parts.is_lowercase() || (m.starts_with('m') && !m.starts_with("maj")) {
        ChordKind::Minor
    } else {
        ChordKind::Major
    }
}

fn is_half_diminished(m: &str) -> bool {
    m.contains('ø') || m.contains('Ø') || m.contains("hdim") || m.contains("m7b5")
}

fn is_diminished(m: &str) -> bool {
    m.contains('°') || m.contains("dim") || m.starts_with('o')
}

/// Apply an explicit extension from the modifier. Returns `None` when the
/// modifier names no extension.
fn explicit_kind(base: ChordKind, m: &str) -> Option<ChordKind> {
    if is_half_diminished(m) {
        return Some(ChordKind::HalfDiminished7);
    }
    if base == ChordKind::Diminished && m.contains('7') {
        return Some(ChordKind::Diminished7);
    }
    if m.contains("maj7") || m.contains("M7") {
        return Some(if base == ChordKind::Minor { ChordKind::MinorMajor7 } else { ChordKind::Major7 });
    }
    if m.contains("maj9") {
        return Some(ChordKind::Major9);
    }
    if m.contains("m7") {
        return Some(ChordKind::Minor7);
    }
    if m.contains("sus2") {
        return Some(ChordKind::Sus2);
    }
    if m.contains("sus") {
        return Some(if m.contains('7') { ChordKind::Dominant7Sus4 } else { ChordKind::Sus4 });
    }
    if m.contains("alt") {
        return Some(ChordKind::Altered);
    }
    if m.contains('7') {
        return Some(seventh_kind(base, m));
    }
    // upper and altered extensions imply the seventh
    if base == ChordKind::Major && UPPER_EXTENSIONS.iter().any(|e| m.contains(e)) {
        return Some(seventh_kind(base, m));
    }
    if base == ChordKind::Minor && m.contains("11") {
        return Some(ChordKind::Minor11);
    }
    if m.contains("69") && base == ChordKind::Major {
        return Some(ChordKind::SixNine);
    }
    if m.contains('9') && !m.contains("add9") {
        return Some(match base {
            ChordKind::Minor => ChordKind::Minor9,
            _ => ChordKind::Dominant9,
        });
    }
    if m.contains('6') {
        return Some(match base {
            ChordKind::Minor => ChordKind::Minor6,
            _ => ChordKind::Major6,
        });
    }
    None
}

fn seventh_kind(base: ChordKind, m: &str) -> ChordKind {
    match base {
        ChordKind::Minor => ChordKind::Minor7,
        ChordKind::Augmented => ChordKind::Augmented7,
        _ if m.contains("b9") => ChordKind::Dominant7Flat9,
        _ if m.contains("#9") => ChordKind::Dominant7Sharp9,
        _ if m.contains("#11") => ChordKind::Dominant7Sharp11,
        _ if m.contains("b5") => ChordKind::Dominant7Flat5,
        _ if m.contains("13") && !m.contains("b13") => ChordKind::Dominant13,
        _ if m.contains("11") => ChordKind::Dominant11,
        _ => ChordKind::Dominant7,
    }
}

/// `add9` on top of whatever was resolved so far.
fn with_added_ninth(kind: ChordKind) -> ChordKind {
    match kind {
        ChordKind::Major => ChordKind::Add9,
        ChordKind::Minor => ChordKind::MinorAdd9,
        ChordKind::Major7 => ChordKind::Major9,
        ChordKind::Minor7 => ChordKind::Minor9,
        ChordKind::Dominant7 => ChordKind::Dominant9,
        ChordKind::Major6 => ChordKind::SixNine,
        other => other,
    }
}

/// Convention defaults for bare numerals.
fn default_kind(parts: &RomanParts, base: ChordKind) -> ChordKind {
    if !parts.is_bare() {
        return base;
    }
    match (parts.numeral, base) {
        ("ii", ChordKind::Minor) => ChordKind::Minor7,
        ("V", ChordKind::Major) => ChordKind::Dominant7,
        ("I", ChordKind::Major) => ChordKind::Major7,
        _ => base,
    }
}

fn unrecognized_modifier(m: &str) -> String {
    let mut residue = m.to_string();
    for known in KNOWN_MODIFIERS {
        residue = residue.replace(known, "");
    }
    residue
}

fn parse_roman_token(index: usize, raw: &str, key: &KeySpec) -> ParsedItem {
    let normalized = normalize(raw);
    let item = ParsedItem::new(index, raw, InputKind::Roman, normalized.clone());

    let Some(parts) = match_roman(&normalized) else {
        return item.error(format!("'{}' is not a roman numeral (I-VII)", raw.trim()));
    };
    let Some(step) = parts.step() else {
        return item.error(format!("'{}' is not a roman numeral (I-VII)", raw.trim()));
    };

    let base = base_kind(&parts);
    let mut kind = explicit_kind(base, parts.modifier).unwrap_or_else(|| default_kind(&parts, base));
    if parts.modifier.contains("add9") || parts.modifier.contains("add2") {
        kind = with_added_ninth(kind);
    }

    let prefer_flats = if parts.accidentals.contains('#') {
        false
    } else if parts.accidentals.contains('b') {
        true
    } else {
        key.prefers_flats()
    };
    let semitone = key.scale_step(step) as i32 + parts.semitone_offset();
    let root = PitchClass::from_semitone(semitone, prefer_flats);

    let mut item = item.resolved(ChordSymbol::new(root, kind));
    item.degree = Some(normalized.clone());

    let residue = unrecognized_modifier(parts.modifier);
    if !residue.is_empty() {
        item = item.warn(format!("Ignored '{}' in '{}'", residue, normalized));
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ItemStatus;

    fn key(s: &str) -> KeySpec {
        s.parse().unwrap()
    }

    fn resolve(token: &str, k: &str) -> String {
        resolve_roman(token, &key(k)).map(|c| c.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_two_five_one_shorthand() {
        for shorthand in ["251", "2-5-1", "two-five-one", "ii–V–I", "ツーファイブワン"] {
            let items = parse_roman_tokens(shorthand, &key("C"));
            let symbols: Vec<String> = items.iter().filter_map(|i| i.chord).map(|c| c.to_string()).collect();
            assert_eq!(symbols, vec!["Dm7", "G7", "Cmaj7"], "shorthand {}", shorthand);
            let labels: Vec<&str> = items.iter().filter_map(|i| i.degree.as_deref()).collect();
            assert_eq!(labels, vec!["ii", "V7", "Imaj7"]);
            let indices: Vec<usize> = items.iter().map(|i| i.index).collect();
            assert_eq!(indices, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_expansion_in_place() {
        let items = parse_roman_tokens("IV 251 vi", &key("F"));
        let symbols: Vec<String> = items.iter().filter_map(|i| i.chord).map(|c| c.to_string()).collect();
        assert_eq!(symbols, vec!["Bb", "Gm7", "C7", "Fmaj7", "Dm"]);
        assert_eq!(items[4].index, 4);
    }

    #[test]
    fn test_default_extensions_only_for_ii_v_i() {
        assert_eq!(resolve("ii", "C"), "Dm7");
        assert_eq!(resolve("V", "C"), "G7");
        assert_eq!(resolve("I", "C"), "Cmaj7");
        assert_eq!(resolve("IV", "C"), "F");
        assert_eq!(resolve("vi", "C"), "Am");
        assert_eq!(resolve("iii", "C"), "Em");
        // an accidental or modifier disables the convenience default
        assert_eq!(resolve("bII", "C"), "Db");
        assert_eq!(resolve("V+", "C"), "Gaug");
    }

    #[test]
    fn test_quality_markers() {
        assert_eq!(resolve("viio", "C"), "Bdim");
        assert_eq!(resolve("vii°", "C"), "Bdim");
        assert_eq!(resolve("vii°7", "C"), "Bdim7");
        assert_eq!(resolve("viiø7", "C"), "Bm7b5");
        assert_eq!(resolve("iim7b5", "Am"), "Bm7b5");
        assert_eq!(resolve("III+", "Am"), "Caug");
        assert_eq!(resolve("IVm", "C"), "Fm");
    }

    #[test]
    fn test_explicit_extension_overrides_casing_default() {
        assert_eq!(resolve("ii7", "C"), "Dm7");
        assert_eq!(resolve("iimaj7", "C"), "DmMaj7");
        assert_eq!(resolve("Vsus4", "C"), "Gsus4");
        assert_eq!(resolve("V7sus4", "C"), "G7sus4");
        assert_eq!(resolve("Iadd9", "C"), "Cadd9");
        assert_eq!(resolve("vi9", "C"), "Am9");
        assert_eq!(resolve("V7b9", "C"), "G7b9");
        assert_eq!(resolve("IVmaj7", "C"), "Fmaj7");
    }

    #[test]
    fn test_upper_extensions_without_seventh() {
        assert_eq!(resolve("V13", "C"), "G13");
        assert_eq!(resolve("V11", "C"), "G11");
        assert_eq!(resolve("Vb9", "C"), "G7b9");
        assert_eq!(resolve("V#9", "C"), "G7#9");
        assert_eq!(resolve("V#11", "C"), "G7#11");
        assert_eq!(resolve("I69", "C"), "C69");
        assert_eq!(resolve("ii11", "C"), "Dm11");
        assert_eq!(resolve("V9", "C"), "G9");

        let items = parse_roman_tokens("V13 Vb9", &key("C"));
        assert!(items.iter().all(|i| i.status == ItemStatus::Ok));
        assert_eq!(items[0].degree.as_deref(), Some("V13"));
    }

    #[test]
    fn test_unsupported_flat_thirteen_warns() {
        let items = parse_roman_tokens("V7b13", &key("C"));
        assert_eq!(items[0].status, ItemStatus::Warn);
        assert_eq!(items[0].chord.map(|c| c.to_string()), Some("G7".to_string()));
    }

    #[test]
    fn test_minor_key_and_accidentals() {
        assert_eq!(resolve("i", "Am"), "Am");
        assert_eq!(resolve("III", "Am"), "C");
        assert_eq!(resolve("bVII", "C"), "Bb");
        assert_eq!(resolve("#iv", "C"), "F#m");
        assert_eq!(resolve("bbVII", "C"), "A");
        assert_eq!(resolve("vii", "D"), "C#m");
        assert_eq!(resolve("♭VI", "C"), "Ab");
    }

    #[test]
    fn test_errors_and_warnings() {
        let items = parse_roman_tokens("X Iv rest ii", &key("C"));
        assert_eq!(items[0].status, ItemStatus::Error);
        assert!(items[0].degree.is_none());
        assert_eq!(items[1].status, ItemStatus::Error);
        assert_eq!(items[2].status, ItemStatus::Rest);
        assert_eq!(items[3].status, ItemStatus::Ok);

        let items = parse_roman_tokens("Vqq", &key("C"));
        assert_eq!(items[0].status, ItemStatus::Warn);
        assert_eq!(items[0].chord.map(|c| c.to_string()), Some("G".to_string()));
        assert_eq!(items[0].message.as_deref(), Some("Ignored 'qq' in 'Vqq'"));
    }

    #[test]
    fn test_hyphen_is_not_a_roman_separator() {
        let items = parse_roman_tokens("ii-V", &key("C"));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].status, ItemStatus::Warn);
    }
}
