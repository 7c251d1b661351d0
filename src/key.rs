//! Keys: tonic + major/minor mode.
//!
//! A [`KeySpec`] drives scale-step lookup when resolving roman numerals and is the
//! reference point when deriving a degree label for a concrete chord.

use crate::error::ChordflowError;
use crate::pitch::PitchClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semitone offsets of the seven scale steps in a major key
/// (whole, whole, half, whole, whole, whole, half).
const MAJOR_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Natural minor (whole, half, whole, whole, half, whole, whole).
const MINOR_STEPS: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];

/// The tonic selector set: one spelling per pitch class, preferring flats.
pub const TONIC_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    #[default]
    Major,
    Minor,
}

impl KeyMode {
    pub fn scale_steps(self) -> &'static [u8; 7] {
        match self {
            KeyMode::Major => &MAJOR_STEPS,
            KeyMode::Minor => &MINOR_STEPS,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" | "maj" | "ionian" => Some(KeyMode::Major),
            "minor" | "min" | "m" | "aeolian" => Some(KeyMode::Minor),
            _ => None,
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Major => write!(f, "major"),
            KeyMode::Minor => write!(f, "minor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeySpec {
    pub tonic: PitchClass,
    pub mode: KeyMode,
}

impl KeySpec {
    pub const fn new(tonic: PitchClass, mode: KeyMode) -> Self {
        Self { tonic, mode }
    }

    /// All 12 selectable tonics in chromatic order.
    pub fn tonics() -> Vec<PitchClass> {
        TONIC_NAMES
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }

    /// Pitch class of a 0-indexed scale step (0 = tonic).
    pub fn scale_step(&self, step: usize) -> u8 {
        let offset = self.mode.scale_steps()[step % 7];
        (self.tonic.semitone() + offset) % 12
    }

    /// Position on the circle of fifths of this key's signature
    /// (negative = flats). The tritone tonic follows its own spelling.
    pub fn fifths(&self) -> i8 {
        let major_tonic = match self.mode {
            KeyMode::Major => self.tonic.semitone(),
            KeyMode::Minor => (self.tonic.semitone() + 3) % 12,
        };
        match major_tonic {
            0 => 0,
            1 => -5,
            2 => 2,
            3 => -3,
            4 => 4,
            5 => -1,
            6 => {
                if self.tonic.is_sharp() { 6 } else { -6 }
            }
            7 => 1,
            8 => -4,
            9 => 3,
            10 => -2,
            _ => 5,
        }
    }

    /// Whether chromatic notes in this key are spelled with flats. Keys without
    /// sharps in their signature follow the flat-preferring tonic set.
    pub fn prefers_flats(&self) -> bool {
        self.fifths() <= 0
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic, self.mode)
    }
}

impl FromStr for KeySpec {
    type Err = ChordflowError;

    /// Parse `C`, `Am`, `F#m`, `Eb major`, `G minor`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ChordflowError::InvalidKey(trimmed.to_string());

        if let Some((tonic, mode)) = trimmed.split_once(char::is_whitespace) {
            let tonic: PitchClass = tonic.parse().map_err(|_| invalid())?;
            let mode = KeyMode::parse(mode).ok_or_else(invalid)?;
            return Ok(Self::new(tonic, mode));
        }

        if let Some(tonic) = trimmed.strip_suffix('m') {
            if let Ok(tonic) = tonic.parse::<PitchClass>() {
                return Ok(Self::new(tonic, KeyMode::Minor));
            }
        }

        let tonic: PitchClass = trimmed.parse().map_err(|_| invalid())?;
        Ok(Self::new(tonic, KeyMode::Major))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        let c: KeySpec = "C".parse().unwrap();
        assert_eq!(c.mode, KeyMode::Major);
        assert_eq!(c.tonic.semitone(), 0);

        let am: KeySpec = "Am".parse().unwrap();
        assert_eq!(am.mode, KeyMode::Minor);
        assert_eq!(am.tonic.semitone(), 9);

        let eb: KeySpec = "Eb major".parse().unwrap();
        assert_eq!(eb.tonic.to_string(), "Eb");
        assert_eq!(eb.mode, KeyMode::Major);

        let fsm: KeySpec = "F# minor".parse().unwrap();
        assert_eq!(fsm.mode, KeyMode::Minor);

        assert!("H".parse::<KeySpec>().is_err());
        assert!("C dorian".parse::<KeySpec>().is_err());
    }

    #[test]
    fn test_scale_steps() {
        let c_major: KeySpec = "C".parse().unwrap();
        let steps: Vec<u8> = (0..7).map(|s| c_major.scale_step(s)).collect();
        assert_eq!(steps, vec![0, 2, 4, 5, 7, 9, 11]);

        let a_minor: KeySpec = "Am".parse().unwrap();
        let steps: Vec<u8> = (0..7).map(|s| a_minor.scale_step(s)).collect();
        assert_eq!(steps, vec![9, 11, 0, 2, 4, 5, 7]);
    }

    #[test]
    fn test_spelling_preference() {
        assert!("F".parse::<KeySpec>().unwrap().prefers_flats());
        assert!("C".parse::<KeySpec>().unwrap().prefers_flats());
        assert!(!"D".parse::<KeySpec>().unwrap().prefers_flats());
        assert!(!"Em".parse::<KeySpec>().unwrap().prefers_flats());
        assert!("Cm".parse::<KeySpec>().unwrap().prefers_flats());
        assert!(!"F#".parse::<KeySpec>().unwrap().prefers_flats());
        assert!("Gb".parse::<KeySpec>().unwrap().prefers_flats());
    }

    #[test]
    fn test_tonic_set() {
        let tonics = KeySpec::tonics();
        assert_eq!(tonics.len(), 12);
        for (i, tonic) in tonics.iter().enumerate() {
            assert_eq!(tonic.semitone() as usize, i);
            assert!(!tonic.is_sharp());
        }
    }
}
