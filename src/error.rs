//! # Error Types
//!
//! Chord and roman-numeral parsing never fail: malformed tokens surface as
//! [`ItemStatus`](crate::ItemStatus) values on each parsed item. The errors in this
//! module cover the configuration surfaces around that core: document frontmatter,
//! key and pitch strings, and voicing options.
//!
//! ## Error Types
//! - `MetadataError` - Invalid YAML frontmatter in a progression document
//! - `InvalidKey` - A key string that names no tonic/mode
//! - `InvalidChord` - A chord symbol string that does not resolve
//! - `InvalidPitch` - A pitch that is neither a note name with octave nor a MIDI number
//! - `InvalidOptions` - Voicing options outside their accepted ranges
//! - `Io` - Reading a document or writing output failed (CLI only)
//!
//! ## Usage
//! ```rust
//! use chordflow::{render, ChordflowError};
//!
//! match render("---\nkey: H\n---\nC F G") {
//!     Ok(data) => println!("{} chords", data.steps.len()),
//!     Err(ChordflowError::InvalidKey(key)) => eprintln!("no such key: {}", key),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordflowError {
    /// Invalid metadata error.
    ///
    /// Occurs when the YAML frontmatter cannot be deserialized or names an
    /// unsupported value.
    ///
    /// # Example
    /// ```
    /// # use chordflow::ChordflowError;
    /// let err = ChordflowError::MetadataError("input must be 'chords' or 'roman'".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: input must be 'chords' or 'roman'");
    /// ```
    #[error("Invalid metadata: {0}")]
    MetadataError(String),

    /// A key string that could not be resolved to a tonic and mode.
    ///
    /// # Example
    /// ```
    /// # use chordflow::ChordflowError;
    /// let err = ChordflowError::InvalidKey("H minor".to_string());
    /// assert_eq!(err.to_string(), "Invalid key: H minor");
    /// ```
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A chord symbol that does not match the root/suffix/bass grammar.
    ///
    /// # Example
    /// ```
    /// # use chordflow::ChordflowError;
    /// let err = ChordflowError::InvalidChord("Xyz123".to_string());
    /// assert_eq!(err.to_string(), "Invalid chord symbol: Xyz123");
    /// ```
    #[error("Invalid chord symbol: {0}")]
    InvalidChord(String),

    /// A pitch string such as `C3` or `60` that could not be parsed.
    #[error("Invalid pitch: {0}")]
    InvalidPitch(String),

    /// Voicing options that violate their documented bounds.
    ///
    /// # Example
    /// ```
    /// # use chordflow::ChordflowError;
    /// let err = ChordflowError::InvalidOptions("voice-count must be between 1 and 8".to_string());
    /// assert_eq!(err.to_string(), "Invalid voicing options: voice-count must be between 1 and 8");
    /// ```
    #[error("Invalid voicing options: {0}")]
    InvalidOptions(String),

    /// File read/write failure, carried as text so the enum stays `Clone`.
    #[error("I/O error: {0}")]
    Io(String),
}
