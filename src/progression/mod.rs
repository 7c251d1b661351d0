//! # Progression Module
//!
//! Document front-end: reads a progression document and renders every token into a
//! labelled, voiced step.
//!
//! ## Sub-modules
//! - `types` - [`Metadata`], [`ProgressionData`], [`ProgressionStep`]
//! - `engine` - frontmatter extraction, validation and rendering
//!
//! ## Document Format
//! Optional YAML frontmatter between `---` lines, then free-text chords:
//!
//! ```text
//! ---
//! title: Turnaround
//! key: Bb
//! input: roman
//! transpose: Eb
//! voicing:
//!   voice-count: 4
//!   low: C3
//!   high: C6
//! ---
//! 251 | vi
//! ```
//!
//! ## Entry Points
//! - [`render()`] - document text to [`ProgressionData`]
//! - [`render_progression()`] - body text with already validated [`Metadata`]
//! - [`parse_document()`] - split a document into [`Metadata`] and body, for callers
//!   that adjust settings before rendering
//!
//! ## Example
//! ```rust
//! use chordflow::{render, ItemStatus};
//!
//! let data = render("Fmaj7 E7 - Am7").unwrap();
//!
//! assert_eq!(data.steps.len(), 4);
//! assert_eq!(data.steps[2].item.status, ItemStatus::Rest);
//! assert!(data.steps[2].voicing.is_empty());
//! assert_eq!(data.steps[3].label, "Am7");
//! ```

mod engine;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{parse_document, parse_metadata, render, render_progression};
pub use types::{Metadata, ProgressionData, ProgressionStep};
