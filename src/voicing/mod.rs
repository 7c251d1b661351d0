//! # Voicing Module
//!
//! Turns a [`ChordSymbol`](crate::ChordSymbol) into concrete, octave-placed
//! pitches.
//!
//! ## Sub-modules
//! - `types` - [`VoicingOptions`], [`PitchRange`], [`VoicingResult`], [`ToneRole`]
//! - `engine` - tone selection, close stacking and the candidate search
//!
//! ## Algorithm
//! 1. classify chord tones by role (root, third, seventh, altered, tension, fifth)
//! 2. select `voice_count` tones in role priority, doubling the root if short
//! 3. stack them upward from the center register's C
//! 4. try every inversion at -12, 0 and +12 semitones, drop those outside the
//!    range, and keep the lowest cost (register pull plus voice-leading distance
//!    to the previous voicing)
//!
//! Everything is a pure function of its arguments: the same chord, previous
//! voicing and options always produce the same result.
//!
//! ## Example
//! ```rust
//! use chordflow::{voice_progression, ChordSymbol, VoicingOptions};
//!
//! let chords: Vec<ChordSymbol> = ["Dm7", "G7", "Cmaj7"].iter().map(|c| c.parse().unwrap()).collect();
//! let voicings = voice_progression(&chords, 4, &VoicingOptions::default());
//!
//! assert_eq!(voicings.len(), 3);
//! assert!(voicings.iter().all(|v| v.len() == 4));
//! ```

mod engine;
mod types;


pub use engine::{classify_tones, close_stack, select_tones, voice_chord, voice_progression, ClassifiedTone, SelectedTone};
pub use types::{PitchRange, ToneRole, VoicingOptions, VoicingResult, MAX_VOICES};
