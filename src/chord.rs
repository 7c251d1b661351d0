//! # Chord Symbols
//!
//! Concrete chords (`root` + closed [`ChordKind`] + optional slash `bass`) and the
//! owned interval/quality table behind them.
//!
//! ## Chord Kind Table
//! Every [`ChordKind`] carries:
//! - a canonical suffix used for display (`m7`, `maj7`, `7sus4`, ...)
//! - the suffix aliases accepted when parsing (`min7`, `-7`, `M7`, ...)
//! - its chord tones as (semitones above root, scale degree) pairs
//! - a coarse [`ChordQuality`] used for degree casing
//!
//! ## Grammar
//! After normalization a symbol is matched as
//! `ROOT ACCIDENTAL? SUFFIX ( '/' BASS )?` where `ROOT` is an uppercase letter A-G,
//! `ACCIDENTAL` is a single `#` or `b`, and `SUFFIX` must be an alias of some kind.
//!
//! ## Example
//! ```rust
//! use chordflow::{ChordKind, ChordSymbol};
//!
//! let chord: ChordSymbol = "Bm7(b5)".parse().unwrap();
//! assert_eq!(chord.kind, ChordKind::HalfDiminished7);
//! assert_eq!(chord.to_string(), "Bm7b5");
//!
//! let tones: Vec<String> = chord.tones().iter().map(|t| t.to_string()).collect();
//! assert_eq!(tones, vec!["B", "D", "F", "A"]);
//! ```

use crate::error::ChordflowError;
use crate::normalize::normalize;
use crate::pitch::{Accidental, NoteName, PitchClass};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One chord tone: semitones above the root and the scale degree it spells
/// (1, 3, 5, 7, 9, 11, 13 or 2, 4, 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordTone {
    pub semitones: u8,
    pub degree: u8,
}

const fn t(semitones: u8, degree: u8) -> ChordTone {
    ChordTone { semitones, degree }
}

/// Coarse chord family, used to case roman numerals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    HalfDiminished,
    Augmented,
    Suspended,
    Power,
}

/// Closed set of chord qualities and extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ChordKind {
    #[default]
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Power,
    Major6,
    Minor6,
    SixNine,
    Dominant7,
    Major7,
    Minor7,
    MinorMajor7,
    HalfDiminished7,
    Diminished7,
    Augmented7,
    Dominant7Sus4,
    Add9,
    MinorAdd9,
    Dominant9,
    Major9,
    Minor9,
    Dominant11,
    Minor11,
    Dominant13,
    Dominant7Flat9,
    Dominant7Sharp9,
    Dominant7Flat5,
    Dominant7Sharp11,
    Altered,
}

impl ChordKind {
    pub const ALL: [ChordKind; 31] = [
        ChordKind::Major,
        ChordKind::Minor,
        ChordKind::Diminished,
        ChordKind::Augmented,
        ChordKind::Sus2,
        ChordKind::Sus4,
        ChordKind::Power,
        ChordKind::Major6,
        ChordKind::Minor6,
        ChordKind::SixNine,
        ChordKind::Dominant7,
        ChordKind::Major7,
        ChordKind::Minor7,
        ChordKind::MinorMajor7,
        ChordKind::HalfDiminished7,
        ChordKind::Diminished7,
        ChordKind::Augmented7,
        ChordKind::Dominant7Sus4,
        ChordKind::Add9,
        ChordKind::MinorAdd9,
        ChordKind::Dominant9,
        ChordKind::Major9,
        ChordKind::Minor9,
        ChordKind::Dominant11,
        ChordKind::Minor11,
        ChordKind::Dominant13,
        ChordKind::Dominant7Flat9,
        ChordKind::Dominant7Sharp9,
        ChordKind::Dominant7Flat5,
        ChordKind::Dominant7Sharp11,
        ChordKind::Altered,
    ];

    /// Canonical display suffix
    pub fn suffix(self) -> &'static str {
        self.aliases()[0]
    }

    /// Accepted suffix spellings; the first entry is canonical.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ChordKind::Major => &["", "M", "maj", "Maj", "major"],
            ChordKind::Minor => &["m", "min", "mi", "-", "minor"],
            ChordKind::Diminished => &["dim", "°", "o"],
            ChordKind::Augmented => &["aug", "+", "+5", "#5"],
            ChordKind::Sus2 => &["sus2"],
            ChordKind::Sus4 => &["sus4", "sus"],
            ChordKind::Power => &["5"],
            ChordKind::Major6 => &["6", "M6", "maj6"],
            ChordKind::Minor6 => &["m6", "min6", "-6"],
            ChordKind::SixNine => &["69", "6add9"],
            ChordKind::Dominant7 => &["7", "dom7", "dom"],
            ChordKind::Major7 => &["maj7", "M7", "Maj7", "ma7"],
            ChordKind::Minor7 => &["m7", "min7", "mi7", "-7"],
            ChordKind::MinorMajor7 => &["mMaj7", "mmaj7", "mM7", "minmaj7", "-maj7"],
            ChordKind::HalfDiminished7 => &["m7b5", "m7-5", "min7b5", "-7b5", "ø", "ø7", "Ø", "Ø7"],
            ChordKind::Diminished7 => &["dim7", "°7", "o7"],
            ChordKind::Augmented7 => &["aug7", "+7", "7#5", "7+5", "7+"],
            ChordKind::Dominant7Sus4 => &["7sus4", "7sus"],
            ChordKind::Add9 => &["add9", "add2"],
            ChordKind::MinorAdd9 => &["madd9", "madd2", "minadd9"],
            ChordKind::Dominant9 => &["9"],
            ChordKind::Major9 => &["maj9", "M9", "Maj9"],
            ChordKind::Minor9 => &["m9", "min9", "-9"],
            ChordKind::Dominant11 => &["11"],
            ChordKind::Minor11 => &["m11", "min11"],
            ChordKind::Dominant13 => &["13"],
            ChordKind::Dominant7Flat9 => &["7b9"],
            ChordKind::Dominant7Sharp9 => &["7#9"],
            ChordKind::Dominant7Flat5 => &["7b5", "7-5"],
            ChordKind::Dominant7Sharp11 => &["7#11", "7+11"],
            ChordKind::Altered => &["7alt", "alt"],
        }
    }

    /// Chord tones in root-position order.
    pub fn tones(self) -> &'static [ChordTone] {
        match self {
            ChordKind::Major => const { &[t(0, 1), t(4, 3), t(7, 5)] },
            ChordKind::Minor => const { &[t(0, 1), t(3, 3), t(7, 5)] },
            ChordKind::Diminished => const { &[t(0, 1), t(3, 3), t(6, 5)] },
            ChordKind::Augmented => const { &[t(0, 1), t(4, 3), t(8, 5)] },
            ChordKind::Sus2 => const { &[t(0, 1), t(2, 2), t(7, 5)] },
            ChordKind::Sus4 => const { &[t(0, 1), t(5, 4), t(7, 5)] },
            ChordKind::Power => const { &[t(0, 1), t(7, 5)] },
            ChordKind::Major6 => const { &[t(0, 1), t(4, 3), t(7, 5), t(9, 6)] },
            ChordKind::Minor6 => const { &[t(0, 1), t(3, 3), t(7, 5), t(9, 6)] },
            ChordKind::SixNine => const { &[t(0, 1), t(4, 3), t(7, 5), t(9, 6), t(14, 9)] },
            ChordKind::Dominant7 => const { &[t(0, 1), t(4, 3), t(7, 5), t(10, 7)] },
            ChordKind::Major7 => const { &[t(0, 1), t(4, 3), t(7, 5), t(11, 7)] },
            ChordKind::Minor7 => const { &[t(0, 1), t(3, 3), t(7, 5), t(10, 7)] },
            ChordKind::MinorMajor7 => const { &[t(0, 1), t(3, 3), t(7, 5), t(11, 7)] },
            ChordKind::HalfDiminished7 => const { &[t(0, 1), t(3, 3), t(6, 5), t(10, 7)] },
            ChordKind::Diminished7 => const { &[t(0, 1), t(3, 3), t(6, 5), t(9, 7)] },
            ChordKind::Augmented7 => const { &[t(0, 1), t(4, 3), t(8, 5), t(10, 7)] },
            ChordKind::Dominant7Sus4 => const { &[t(0, 1), t(5, 4), t(7, 5), t(10, 7)] },
            ChordKind::Add9 => const { &[t(0, 1), t(4, 3), t(7, 5), t(14, 9)] },
            ChordKind::MinorAdd9 => const { &[t(0, 1), t(3, 3), t(7, 5), t(14, 9)] },
            ChordKind::Dominant9 => const { &[t(0, 1), t(4, 3), t(7, 5), t(10, 7), t(14, 9)] },
            ChordKind::Major9 => const { &[t(0, 1), t(4, 3), t(7, 5), t(11, 7), t(14, 9)] },
            ChordKind::Minor9 => const { &[t(0, 1), t(3, 3), t(7, 5), t(10, 7), t(14, 9)] },
            ChordKind::Dominant11 => const { &[t(0, 1), t(4, 3), t(7, 5), t(10, 7), t(14, 9), t(17, 11)] },
            ChordKind::Minor11 => const { &[t(0, 1), t(3, 3), t(7, 5), t(10, 7), t(14, 9), t(17, 11)] },
            ChordKind::Dominant13 => const { &[t(0, 1), t(4, 3), t(7, 5), t(10, 7), t(14, 9), t(21, 13)] },
            ChordKind::Dominant7Flat9 => const { &[t(0, 1), t(4, 3), t(7, 5), t(10, 7), t(13, 9)] },
            ChordKind::Dominant7Sharp9 => const { &[t(0, 1), t(4, 3), t(7, 5), t(10, 7), t(15, 9)] },
            ChordKind::Dominant7Flat5 => const { &[t(0, 1), t(4, 3), t(6, 5), t(10, 7)] },
            ChordKind::Dominant7Sharp11 => const { &[t(0, 1), t(4, 3), t(7, 5), t(10, 7), t(18, 11)] },
            // 1 3 b7 b9 #9 #11 b13
            ChordKind::Altered => const { &[t(0, 1), t(4, 3), t(10, 7), t(13, 9), t(15, 9), t(18, 11), t(20, 13)] },
        }
    }

    pub fn quality(self) -> ChordQuality {
        match self {
            ChordKind::Minor
            | ChordKind::Minor6
            | ChordKind::Minor7
            | ChordKind::MinorMajor7
            | ChordKind::MinorAdd9
            | ChordKind::Minor9
            | ChordKind::Minor11 => ChordQuality::Minor,
            ChordKind::Diminished | ChordKind::Diminished7 => ChordQuality::Diminished,
            ChordKind::HalfDiminished7 => ChordQuality::HalfDiminished,
            ChordKind::Augmented | ChordKind::Augmented7 => ChordQuality::Augmented,
            ChordKind::Sus2 | ChordKind::Sus4 | ChordKind::Dominant7Sus4 => ChordQuality::Suspended,
            ChordKind::Power => ChordQuality::Power,
            _ => ChordQuality::Major,
        }
    }

    /// Look up a suffix exactly as written (case-sensitive: `M7` and `m7` differ).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.aliases().contains(&suffix))
    }
}

impl fmt::Display for ChordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl From<ChordKind> for String {
    fn from(kind: ChordKind) -> Self {
        kind.suffix().to_string()
    }
}

impl TryFrom<String> for ChordKind {
    type Error = ChordflowError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ChordKind::from_suffix(&s).ok_or(ChordflowError::InvalidChord(s))
    }
}

/// A concrete chord. A chord without a resolvable root is never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordSymbol {
    pub root: PitchClass,
    pub kind: ChordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bass: Option<PitchClass>,
}

impl ChordSymbol {
    pub const fn new(root: PitchClass, kind: ChordKind) -> Self {
        Self { root, kind, bass: None }
    }

    pub fn with_bass(mut self, bass: Option<PitchClass>) -> Self {
        self.bass = bass;
        self
    }

    pub fn quality(&self) -> ChordQuality {
        self.kind.quality()
    }

    /// Spelled chord tones in root-position order, without the slash bass.
    /// Tones that share a pitch class are listed once.
    pub fn tones(&self) -> Vec<PitchClass> {
        let mut tones: Vec<PitchClass> = Vec::new();
        for tone in self.kind.tones() {
            let spelled = self.root.spell_interval(tone.semitones, tone.degree);
            if !tones.contains(&spelled) {
                tones.push(spelled);
            }
        }
        tones
    }

    /// Distinct semitone offsets above the root (0-11), in table order.
    pub fn offsets(&self) -> Vec<u8> {
        let mut offsets: Vec<u8> = Vec::new();
        for tone in self.kind.tones() {
            let offset = tone.semitones % 12;
            if !offsets.contains(&offset) {
                offsets.push(offset);
            }
        }
        offsets
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.kind.suffix())?;
        if let Some(bass) = self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

impl FromStr for ChordSymbol {
    type Err = ChordflowError;

    /// Normalize, then require the whole symbol (including any bass) to match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_symbol(&normalize(s.trim())).ok_or_else(|| ChordflowError::InvalidChord(s.trim().to_string()))
    }
}

/// Match `ROOT ACCIDENTAL?` at the start of `text`, returning the root and the
/// unconsumed remainder.
pub(crate) fn match_root(text: &str) -> Option<(PitchClass, &str)> {
    let mut chars = text.chars();
    let name = chars.next().and_then(NoteName::from_char)?;
    let rest = chars.as_str();
    let (accidental, rest) = if let Some(rest) = rest.strip_prefix('#') {
        (Accidental::Sharp, rest)
    } else if let Some(rest) = rest.strip_prefix('b') {
        (Accidental::Flat, rest)
    } else {
        (Accidental::Natural, rest)
    };
    Some((PitchClass::new(name, accidental), rest))
}

/// Resolve an already-normalized symbol without a bass part.
pub(crate) fn match_symbol(text: &str) -> Option<ChordSymbol> {
    let (root, suffix) = match_root(text)?;
    let kind = ChordKind::from_suffix(suffix)?;
    Some(ChordSymbol::new(root, kind))
}

/// Strictly parse an already-normalized `symbol[/bass]`. Returns `None` when the
/// symbol or the bass does not resolve.
pub fn parse_symbol(text: &str) -> Option<ChordSymbol> {
    match text.split_once('/') {
        Some((symbol, bass)) => {
            let bass: PitchClass = bass.parse().ok()?;
            Some(match_symbol(symbol)?.with_bass(Some(bass)))
        }
        None => match_symbol(text),
    }
}
