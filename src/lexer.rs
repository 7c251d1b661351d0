//! # Lexer
//!
//! Splits free-text chord or roman-numeral input into tokens.
//!
//! ## Separators
//! - Both modes: whitespace, `,` / `，` / `、`, `|` / `｜`, and arrows
//!   (`→`, `⇒`, `➔`, `➜`, `⟶`, `->`, `=>`)
//! - Chord mode only: hyphen-like characters (`-`, `‐`, `–`, `—`). Roman mode keeps
//!   hyphens because shorthand such as `ii-V-I` or `2-5-1` uses them.
//!
//! A lone `-` between separators is never swallowed: it is the rest spelling.
//!
//! ## Example
//! ```rust
//! use chordflow::lexer::{tokenize, InputKind};
//!
//! let chords = tokenize("C-Am | F → G7", InputKind::Chord);
//! let texts: Vec<&str> = chords.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["C", "Am", "F", "G7"]);
//!
//! let roman = tokenize("ii-V-I, -", InputKind::Roman);
//! let texts: Vec<&str> = roman.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["ii-V-I", "-"]);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Peekable;
use std::str::CharIndices;

/// The designated rest word. Also accepted in half- or full-width parentheses.
pub const REST_WORD: &str = "rest";

/// Which notation the input text is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    /// Chord symbols such as `Fmaj7 E7 Am7`
    #[default]
    #[serde(alias = "chords")]
    Chord,
    /// Roman numerals such as `ii V7 Imaj7`
    Roman,
}

/// A token with its byte offset in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub offset: usize,
}

impl Token {
    /// `-`, the rest word, or the rest word in parentheses (any case).
    pub fn is_rest(&self) -> bool {
        is_rest(&self.text)
    }
}

pub fn is_rest(text: &str) -> bool {
    let text = text.trim();
    if text == "-" {
        return true;
    }
    let inner = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .or_else(|| text.strip_prefix('（').and_then(|t| t.strip_suffix('）')))
        .unwrap_or(text);
    inner.eq_ignore_ascii_case(REST_WORD)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '，' | '、' | '|' | '｜' | '→' | '⇒' | '➔' | '➜' | '⟶')
}

fn is_hyphen(c: char) -> bool {
    matches!(c, '-' | '‐' | '–' | '—')
}

/// Lexer for chord and roman-numeral input
pub struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    kind: InputKind,
    tokens: Vec<Token>,
    current: String,
    start: usize,
    /// The last consumed character was a separator, an arrow, or there was none.
    after_separator: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, kind: InputKind) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            kind,
            tokens: Vec::new(),
            current: String::new(),
            start: 0,
            after_separator: true,
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.tokens.push(Token {
                text: std::mem::take(&mut self.current),
                offset: self.start,
            });
        }
    }

    fn push_char(&mut self, offset: usize, c: char) {
        if self.current.is_empty() {
            self.start = offset;
        }
        self.current.push(c);
    }

    /// True when the next character is a separator, an arrow or the end of input.
    fn at_boundary(&mut self) -> bool {
        match self.chars.peek() {
            None => true,
            Some(&(_, c)) => is_separator(c) || c == '=',
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        while let Some((offset, c)) = self.chars.next() {
            // ASCII arrows `->` and `=>`
            if (c == '-' || c == '=') && matches!(self.chars.peek(), Some(&(_, '>'))) {
                self.chars.next();
                self.flush();
                self.after_separator = true;
                continue;
            }

            if is_separator(c) {
                self.flush();
                self.after_separator = true;
                continue;
            }

            if self.kind == InputKind::Chord && is_hyphen(c) {
                // a lone `-` between separators is a rest; runs of hyphens separate
                if self.after_separator && c == '-' && self.at_boundary() {
                    self.push_char(offset, c);
                }
                self.flush();
                self.after_separator = false;
                continue;
            }

            self.push_char(offset, c);
            self.after_separator = false;
        }
        self.flush();
        self.tokens
    }
}

/// Split `text` into tokens for the given input mode. Empty tokens are dropped.
pub fn tokenize(text: &str, kind: InputKind) -> Vec<Token> {
    Lexer::new(text, kind).tokenize()
}
