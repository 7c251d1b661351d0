//! # Pitch Types
//!
//! Spelled pitch classes and absolute pitches on the 12-tone equal-tempered scale.
//!
//! ## Key Concepts
//!
//! ### Pitch Class
//! A [`PitchClass`] keeps its spelling (`NoteName` + `Accidental`) for display, but
//! compares and hashes by semitone value: `C#` and `Db` are equal for every harmonic
//! computation.
//!
//! ### Absolute Pitch
//! A [`Pitch`] is a linear MIDI-like integer: `60` = C4, `69` = A4 (440 Hz).
//! Pitch-class arithmetic is modulo 12, absolute arithmetic is linear.
//!
//! ## Example
//! ```rust
//! use chordflow::{Pitch, PitchClass};
//!
//! let db: PitchClass = "Db".parse().unwrap();
//! let cs: PitchClass = "C#".parse().unwrap();
//! assert_eq!(db, cs);
//! assert_eq!(db.to_string(), "Db");
//!
//! let a4: Pitch = "A4".parse().unwrap();
//! assert_eq!(a4.midi(), 69);
//! assert_eq!(a4.frequency(), 440.0);
//! ```

use crate::error::ChordflowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Note names A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteName {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// Letter names in scale order starting from C.
    pub const ALL: [NoteName; 7] = [
        NoteName::C,
        NoteName::D,
        NoteName::E,
        NoteName::F,
        NoteName::G,
        NoteName::A,
        NoteName::B,
    ];

    /// Semitone offset from C
    pub fn semitone(self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    /// Parse an uppercase letter name. Lowercase letters are rejected so that a
    /// trailing `b` is never mistaken for a note.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&n| n == self).unwrap_or(0)
    }

    /// The letter `steps` scale steps above this one (`C.offset(2) == E`).
    pub fn offset(self, steps: usize) -> NoteName {
        Self::ALL[(self.index() + steps) % 7]
    }
}

/// Accidental attached to a letter name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    #[default]
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    pub fn offset(self) -> i32 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    pub fn from_offset(offset: i32) -> Option<Self> {
        match offset {
            -2 => Some(Accidental::DoubleFlat),
            -1 => Some(Accidental::Flat),
            0 => Some(Accidental::Natural),
            1 => Some(Accidental::Sharp),
            2 => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    /// ASCII spelling: `bb`, `b`, empty, `#`, `##`
    pub fn as_str(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }

    fn from_str_exact(s: &str) -> Option<Self> {
        match s {
            "" => Some(Accidental::Natural),
            "b" => Some(Accidental::Flat),
            "bb" => Some(Accidental::DoubleFlat),
            "#" => Some(Accidental::Sharp),
            "##" => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }
}

/// A spelled pitch class.
///
/// Equality and hashing use the semitone value only; the spelling is kept for
/// display.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PitchClass {
    pub name: NoteName,
    pub accidental: Accidental,
}

impl PitchClass {
    pub const fn new(name: NoteName, accidental: Accidental) -> Self {
        Self { name, accidental }
    }

    pub const fn natural(name: NoteName) -> Self {
        Self::new(name, Accidental::Natural)
    }

    /// Semitone value 0-11
    pub fn semitone(self) -> u8 {
        (self.name.semitone() + self.accidental.offset()).rem_euclid(12) as u8
    }

    /// Spell a semitone value, preferring flats or sharps for black keys.
    pub fn from_semitone(semitone: i32, prefer_flats: bool) -> Self {
        // 0=C, 1=C#/Db, 2=D, 3=D#/Eb, 4=E, 5=F, 6=F#/Gb, 7=G, 8=G#/Ab, 9=A, 10=A#/Bb, 11=B
        let (name, acc) = match semitone.rem_euclid(12) {
            0 => (NoteName::C, Accidental::Natural),
            1 => if prefer_flats { (NoteName::D, Accidental::Flat) } else { (NoteName::C, Accidental::Sharp) },
            2 => (NoteName::D, Accidental::Natural),
            3 => if prefer_flats { (NoteName::E, Accidental::Flat) } else { (NoteName::D, Accidental::Sharp) },
            4 => (NoteName::E, Accidental::Natural),
            5 => (NoteName::F, Accidental::Natural),
            6 => if prefer_flats { (NoteName::G, Accidental::Flat) } else { (NoteName::F, Accidental::Sharp) },
            7 => (NoteName::G, Accidental::Natural),
            8 => if prefer_flats { (NoteName::A, Accidental::Flat) } else { (NoteName::G, Accidental::Sharp) },
            9 => (NoteName::A, Accidental::Natural),
            10 => if prefer_flats { (NoteName::B, Accidental::Flat) } else { (NoteName::A, Accidental::Sharp) },
            _ => (NoteName::B, Accidental::Natural),
        };
        Self::new(name, acc)
    }

    /// Shift by `semitones` (mod 12), respelling with the given preference.
    pub fn transpose(self, semitones: i32, prefer_flats: bool) -> Self {
        Self::from_semitone(self.semitone() as i32 + semitones, prefer_flats)
    }

    /// Spell the tone `semitones` above this root on the given scale degree
    /// (1 = unison, 3 = third, 9 = ninth...). Falls back to a plain spelling when
    /// the letter would need more than a double accidental.
    pub fn spell_interval(self, semitones: u8, degree: u8) -> Self {
        let steps = (degree.max(1) as usize - 1) % 7;
        let letter = self.name.offset(steps);
        let target = self.semitone() as i32 + semitones as i32;
        let mut diff = (target - letter.semitone()).rem_euclid(12);
        if diff > 6 {
            diff -= 12;
        }
        match Accidental::from_offset(diff) {
            Some(accidental) => Self::new(letter, accidental),
            None => Self::from_semitone(target, self.accidental != Accidental::Sharp),
        }
    }

    /// True when the spelling uses a flat or double flat.
    pub fn is_flat(self) -> bool {
        matches!(self.accidental, Accidental::Flat | Accidental::DoubleFlat)
    }

    pub fn is_sharp(self) -> bool {
        matches!(self.accidental, Accidental::Sharp | Accidental::DoubleSharp)
    }
}

impl PartialEq for PitchClass {
    fn eq(&self, other: &Self) -> bool {
        self.semitone() == other.semitone()
    }
}

impl Eq for PitchClass {}

impl Hash for PitchClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.semitone().hash(state);
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name.as_char(), self.accidental.as_str())
    }
}

impl FromStr for PitchClass {
    type Err = ChordflowError;

    /// Parse `C`, `F#`, `Bb`, `Ebb`, `G##`. The letter must be uppercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let name = chars
            .next()
            .and_then(NoteName::from_char)
            .ok_or_else(|| ChordflowError::InvalidPitch(trimmed.to_string()))?;
        let accidental = Accidental::from_str_exact(chars.as_str())
            .ok_or_else(|| ChordflowError::InvalidPitch(trimmed.to_string()))?;
        Ok(Self::new(name, accidental))
    }
}

impl From<PitchClass> for String {
    fn from(pc: PitchClass) -> Self {
        pc.to_string()
    }
}

impl TryFrom<String> for PitchClass {
    type Error = ChordflowError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Either a MIDI number or a note name with octave, as written in configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PitchValue {
    Midi(i32),
    Name(String),
}

/// An absolute pitch as a linear MIDI-like integer (`69` = A4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "PitchValue")]
pub struct Pitch(i32);

impl Pitch {
    /// Reference A (440 Hz)
    pub const A4: Pitch = Pitch(69);
    pub const MIDDLE_C: Pitch = Pitch(60);

    pub const fn from_midi(midi: i32) -> Self {
        Self(midi)
    }

    pub const fn midi(self) -> i32 {
        self.0
    }

    /// The C that starts the given octave register (`octave_c(4)` = MIDI 60).
    pub const fn octave_c(octave: i32) -> Self {
        Self((octave + 1) * 12)
    }

    /// Place a spelled pitch class in an octave. `Cb4` is MIDI 59, `B#3` is 60.
    pub fn from_parts(pitch_class: PitchClass, octave: i32) -> Self {
        Self((octave + 1) * 12 + pitch_class.name.semitone() + pitch_class.accidental.offset())
    }

    /// Semitone value 0-11
    pub fn pitch_class(self) -> u8 {
        self.0.rem_euclid(12) as u8
    }

    /// Octave number in scientific pitch notation (C4 = 60).
    pub fn octave(self) -> i32 {
        self.0.div_euclid(12) - 1
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self(self.0 + semitones)
    }

    /// Equal-tempered frequency in Hz, A4 = 440.
    pub fn frequency(self) -> f64 {
        440.0 * 2f64.powf((self.0 - Self::A4.0) as f64 / 12.0)
    }

    /// Note name with octave using a flat spelling for black keys (`Bb3`).
    pub fn name(self) -> String {
        self.name_with(PitchClass::from_semitone(self.0, true))
    }

    /// Note name with octave using the given spelling. The octave number follows
    /// the letter, so `B#` a semitone above B3 prints as `B#3`.
    pub fn name_with(self, spelling: PitchClass) -> String {
        format!("{}{}", spelling, self.spelled_octave(spelling))
    }

    /// Octave number of the letter when this pitch is written with `spelling`.
    pub fn spelled_octave(self, spelling: PitchClass) -> i32 {
        (self.0 - spelling.name.semitone() - spelling.accidental.offset()).div_euclid(12) - 1
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Pitch {
    type Err = ChordflowError;

    /// Parse `C4`, `Bb3`, `F#-1`, or a bare MIDI integer such as `60`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(midi) = trimmed.parse::<i32>() {
            return Ok(Self(midi));
        }
        let split = trimmed
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .ok_or_else(|| ChordflowError::InvalidPitch(trimmed.to_string()))?;
        let pitch_class: PitchClass = trimmed[..split]
            .parse()
            .map_err(|_| ChordflowError::InvalidPitch(trimmed.to_string()))?;
        let octave: i32 = trimmed[split..]
            .parse()
            .map_err(|_| ChordflowError::InvalidPitch(trimmed.to_string()))?;
        Ok(Self::from_parts(pitch_class, octave))
    }
}

impl From<Pitch> for i32 {
    fn from(pitch: Pitch) -> Self {
        pitch.0
    }
}

impl TryFrom<PitchValue> for Pitch {
    type Error = ChordflowError;

    fn try_from(value: PitchValue) -> Result<Self, Self::Error> {
        match value {
            PitchValue::Midi(midi) => Ok(Self(midi)),
            PitchValue::Name(name) => name.parse(),
        }
    }
}
