//! Voicing type definitions
//!
//! Options, results and tone roles used by the voicing engine.

use crate::error::ChordflowError;
use crate::pitch::{Pitch, PitchClass};
use serde::{Deserialize, Serialize};

/// Most simultaneous notes a voicing may ask for.
pub const MAX_VOICES: usize = 8;

/// Inclusive pitch bounds for every voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchRange {
    pub low: Pitch,
    pub high: Pitch,
}

impl PitchRange {
    pub const fn new(low: Pitch, high: Pitch) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, pitch: Pitch) -> bool {
        pitch >= self.low && pitch <= self.high
    }
}

impl Default for PitchRange {
    /// C3 to C6
    fn default() -> Self {
        Self::new(Pitch::from_midi(48), Pitch::from_midi(84))
    }
}

/// Voicing configuration.
///
/// # Fields
/// - `voice_count`: number of simultaneous notes in every result
/// - `range`: inclusive bounds for every voice (`low`/`high` in configuration)
/// - `include_bass`: sound a slash-chord bass as the first (lowest) placed voice
/// - `include_root`: start from the root when there is no bass to sound
/// - `register_anchor_weight`: pull of the mean pitch toward the center register's C
/// - `leap_penalty_weight` / `leap_threshold`: extra cost per semitone a voice moves
///   beyond `leap_threshold` when a previous voicing exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct VoicingOptions {
    pub voice_count: usize,
    #[serde(flatten)]
    pub range: PitchRange,
    pub include_bass: bool,
    pub include_root: bool,
    pub register_anchor_weight: f64,
    pub leap_penalty_weight: f64,
    pub leap_threshold: i32,
}

impl Default for VoicingOptions {
    fn default() -> Self {
        Self {
            voice_count: 4,
            range: PitchRange::default(),
            include_bass: true,
            include_root: true,
            register_anchor_weight: 0.5,
            leap_penalty_weight: 1.5,
            leap_threshold: 4,
        }
    }
}

impl VoicingOptions {
    /// Check the documented bounds. The engine itself accepts anything, but
    /// configuration coming from users goes through here first.
    pub fn validate(&self) -> Result<(), ChordflowError> {
        if self.voice_count == 0 || self.voice_count > MAX_VOICES {
            return Err(ChordflowError::InvalidOptions(format!(
                "voice-count must be between 1 and {}, got {}",
                MAX_VOICES, self.voice_count
            )));
        }
        if self.range.low > self.range.high {
            return Err(ChordflowError::InvalidOptions(format!(
                "low ({}) is above high ({})",
                self.range.low, self.range.high
            )));
        }
        if self.register_anchor_weight < 0.0 || self.leap_penalty_weight < 0.0 {
            return Err(ChordflowError::InvalidOptions("weights must not be negative".to_string()));
        }
        if self.leap_threshold < 0 {
            return Err(ChordflowError::InvalidOptions("leap-threshold must not be negative".to_string()));
        }
        Ok(())
    }
}

/// Harmonic role of a chord tone, derived from its distance above the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneRole {
    /// Slash-chord bass
    Bass,
    Root,
    Third,
    Fifth,
    Seventh,
    /// 2, 4, 6 / 9, 11, 13
    Tension,
    /// b9, #11/b5, #5/b13, and a minor third next to a major third
    Altered,
    Other,
}

/// Octave-placed pitches for one chord, ascending, with their spellings.
///
/// An empty result means "nothing to play" for that position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicingResult {
    pub pitches: Vec<Pitch>,
    pub pitch_classes: Vec<PitchClass>,
}

impl VoicingResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn midi_notes(&self) -> Vec<i32> {
        self.pitches.iter().map(|p| p.midi()).collect()
    }

    /// Note names with octave, using each voice's chord spelling (`Eb4`, `Bbb3`).
    pub fn note_names(&self) -> Vec<String> {
        self.pitches
            .iter()
            .zip(&self.pitch_classes)
            .map(|(pitch, spelling)| pitch.name_with(*spelling))
            .collect()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.pitches.iter().map(|p| p.frequency()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_deserialize_with_defaults() {
        let yaml = "voice-count: 3\nlow: E2\nhigh: 79\ninclude-bass: false\n";
        let options: VoicingOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(options.voice_count, 3);
        assert_eq!(options.range.low.midi(), 40);
        assert_eq!(options.range.high.midi(), 79);
        assert!(!options.include_bass);
        assert!(options.include_root);
        assert_eq!(options.leap_threshold, 4);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_validation() {
        let zero = VoicingOptions { voice_count: 0, ..VoicingOptions::default() };
        assert!(zero.validate().is_err());

        let inverted = VoicingOptions {
            range: PitchRange::new(Pitch::from_midi(80), Pitch::from_midi(40)),
            ..VoicingOptions::default()
        };
        assert!(inverted.validate().is_err());

        let negative = VoicingOptions { leap_penalty_weight: -1.0, ..VoicingOptions::default() };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_note_names_use_spelling() {
        let result = VoicingResult {
            pitches: vec![Pitch::from_midi(60), Pitch::from_midi(63), Pitch::from_midi(69)],
            pitch_classes: vec!["C".parse().unwrap(), "Eb".parse().unwrap(), "Bbb".parse().unwrap()],
        };
        assert_eq!(result.note_names(), vec!["C4", "Eb4", "Bbb4"]);
        assert_eq!(result.midi_notes(), vec![60, 63, 69]);
    }
}
